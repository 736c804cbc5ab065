pub mod hackathon;
pub mod health;
pub mod invitation;
pub mod member;
pub mod project;
pub mod registration;
pub mod submission;
pub mod team;
