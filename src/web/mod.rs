//! HTTP API over the scraped diploma listing.

pub mod diplomas;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod status;

pub use routes::*;
