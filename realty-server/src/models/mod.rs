//! Request models
//!
//! Bodies are decoded into typed structs here; anything the database layer
//! binds comes through one of these types.

pub mod changes;
pub mod listing;
pub mod review;
pub mod validation;

pub use changes::{Changes, FieldValue, HouseChanges, ReviewChanges};
pub use listing::{AmenityFlags, DetailFields, HouseFields, NewListing, PriceFields};
pub use review::NewReview;
pub use validation::ValidationError;
