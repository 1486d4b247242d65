//! Error translation between service code and HTTP responses

#![deny(clippy::all, clippy::pedantic, clippy::nursery, dead_code)]

mod boundary;
mod error;
mod extractors;
mod lookup;
mod middleware;

pub use boundary::Boundary;
pub use error::{AppError, Failure};
pub use extractors::AppJson;
pub use lookup::Lookup;
pub use middleware::middleware_error;
