//! realty-server: HTTP backend for property listings
//!
//! Houses with their details, amenities, prices, images, and owners, plus
//! free-standing reviews, served as JSON over a PostgreSQL pool.

pub mod config;
pub mod db;
pub mod http;
pub mod models;

pub use config::{ConfigError, RealtyConfig};
pub use db::Database;
pub use http::{build_router, run_server, AppState, ServerConfig, ServerError};
