//! HTTP middleware and extractors
//!
//! - `AuthUser` extractor resolving the bearer token through the identity backend
//! - Observability layer (request ID + metrics)

pub mod auth;
pub mod metrics;

pub use auth::AuthUser;
pub use metrics::ObservabilityLayer;
