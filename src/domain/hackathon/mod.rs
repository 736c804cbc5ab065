pub mod entity;
pub mod resolver;

pub use resolver::HackathonResolver;
