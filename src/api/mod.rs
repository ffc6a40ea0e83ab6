//! API Module
//!
//! Administrative HTTP surface a host process can mount next to its resolvers.
//!
//! # Endpoints
//! - `GET /health` - Health check endpoint
//! - `GET /stats` - Entry counts and hit/miss counters
//! - `DELETE /cache` - Drop every cached result
//! - `DELETE /cache/:key` - Drop one cached result

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
