// JSON API Server Library
//
// Wraps axum routing so handlers return plain data that is serialized to
// JSON, with every handler error mapped to a 500 `{"error": ...}` body.

pub mod error;
pub mod server;

pub use axum::routing::MethodFilter;
pub use error::{ApiError, ServerError};
pub use server::{Api, ApiConfig};
