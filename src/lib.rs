//! Forum Gateway
//!
//! REST gateway in front of the forum's content, comment, statistics, identity
//! and category services. Aggregates reads across backends, authorizes
//! mutations, and propagates post deletions through in-process retry queues.

pub mod api;
pub mod backend;
pub mod cascade;
pub mod config;
pub mod domain;
pub mod error;
pub mod middleware;
pub mod openapi;
pub mod policy;
pub mod server;
pub mod service;
pub mod state;
pub mod telemetry;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, Result};
