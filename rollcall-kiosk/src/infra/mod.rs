//! Infrastructure: HTTP client, service adapters and camera sources.

pub mod api_client;
pub mod devices;
pub mod services;

pub use api_client::{ApiClient, ApiError};
