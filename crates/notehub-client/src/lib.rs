pub mod admin;
pub mod browse;
pub mod dashboard;
pub mod http;

pub use http::{ApiClient, ClientError};
