pub mod auth;
pub mod error;
pub mod jwt;
pub mod logging;
pub mod pagination;
pub mod patch;
pub mod response;

pub use response::{BaseResponse, ErrorResponse, Page};
