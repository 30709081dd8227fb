//! Review creation payload

use serde::Deserialize;

/// Body of `POST /reviews`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewReview {
    pub house_id: Option<i32>,
    pub user_id: Option<i32>,
    pub rating: Option<i32>,
    pub comment: Option<String>,
}
