//! HTTP boundary to the RegLens backend. Every remote operation goes through
//! [`ApiClient`] and returns a uniform `Result<T, ApiError>`.

pub mod http;

pub use http::{ApiClient, ApiError, DEFAULT_BASE_URL, Health};
