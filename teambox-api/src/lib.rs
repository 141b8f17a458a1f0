pub mod api;
pub mod error;
pub mod folders;
pub mod http;
pub mod models;
pub mod realtime;
pub mod session;
pub mod timeline;

pub use error::ApiError;
