//! Answer service: creates and looks up answers

#![deny(clippy::all, clippy::pedantic, clippy::nursery, dead_code)]

pub mod routes;
pub mod server;
pub mod service;
pub mod types;
