/*
[INPUT]:  HTTP client configuration and backend endpoints
[OUTPUT]: HTTP responses and typed API results
[POS]:    HTTP layer - REST API communication
[UPDATE]: When adding new endpoints or changing client behavior
*/

pub mod client;
pub mod error;
pub mod settings;

pub use error::{LoginError, Result};

pub use client::{ApiClient, ClientConfig, DEFAULT_LOCAL_DEV_URL, is_localhost, resolve_base_url};
