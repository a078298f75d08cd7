//! Skywatch - sky conditions and local weather over HTTP
//!
//! Aggregates an ephemeris-backed astronomy provider and a public weather API
//! behind a read-through TTL cache keyed by handler and rounded location.

pub mod api;
pub mod astronomy;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod shaper;
pub mod sky;
pub mod weather;

pub use api::{create_router, AppState};
pub use config::Config;
