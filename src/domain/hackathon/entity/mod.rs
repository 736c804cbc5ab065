pub mod hackathon;
