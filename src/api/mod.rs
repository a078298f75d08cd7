//! API Module
//!
//! HTTP handlers and routing for the sky API.
//!
//! # Endpoints
//! - `GET /sky-summary` - Moon, sun and planet overview
//! - `GET /weather` - Current local weather
//! - `GET /moon-details` - Moon position and phase milestones
//! - `GET /moon-illumination` - Moon illumination only
//! - `GET /cache/stats` - Cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
