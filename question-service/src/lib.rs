//! Question service: creates questions and has the answer service answer them

#![deny(clippy::all, clippy::pedantic, clippy::nursery, dead_code)]

/// Client for the answer service
pub mod answer_api;

/// HTTP routes
pub mod routes;

/// Server bootstrap
pub mod server;

/// Question operations
pub mod service;

/// Configuration types
pub mod types;
