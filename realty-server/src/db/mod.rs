//! Database layer - connection pool and repositories
//!
//! # Design Principles
//!
//! - One shared pool, injected through application state
//! - Transactions for multi-step writes (house creation, cascading delete)
//! - Multi-table reads run in one REPEATABLE READ snapshot
//! - Rows are correlated through indexes, never by rescanning result sets

pub mod pool;
pub mod repos;

pub use pool::{create_pool, create_pool_with_options, Database};
pub use repos::*;
