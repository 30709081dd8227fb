//! Repository implementations for database access
//!
//! Each repository borrows the pool for the duration of a request:
//! `HouseRepo::new(db.pool()).get(id).await`.

pub mod houses;
pub mod listings;
pub mod reviews;

pub use houses::{House, HouseRepo};
pub use listings::{
    Amenities, HouseDetails, Image, ListingRepo, Price, PropertyDetails, PropertySummary, User,
};
pub use reviews::{Review, ReviewRepo};

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },
}

impl DbError {
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }
}
