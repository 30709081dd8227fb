//! Command implementations for the realty CLI

pub mod serve;

pub use serve::run_serve;
