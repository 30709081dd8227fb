//! Review endpoints

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};

use super::houses::MessageResponse;
use crate::db::repos::{Review, ReviewRepo};
use crate::http::error::ApiError;
use crate::http::extractors::{ApiJson, ValidId};
use crate::http::server::AppState;
use crate::models::{NewReview, ReviewChanges};

async fn create_review(
    State(state): State<Arc<AppState>>,
    ApiJson(review): ApiJson<NewReview>,
) -> Result<(StatusCode, Json<Review>), ApiError> {
    let review = ReviewRepo::new(state.db.pool())
        .create(review)
        .await
        .map_err(ApiError::failed("Some error occurred while creating the review."))?;

    tracing::info!(review_id = review.review_id, "Review created");
    Ok((StatusCode::CREATED, Json(review)))
}

async fn list_reviews(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Review>>, ApiError> {
    let reviews = ReviewRepo::new(state.db.pool())
        .list()
        .await
        .map_err(ApiError::failed("Some error occurred while retrieving reviews."))?;
    Ok(Json(reviews))
}

async fn get_review(
    State(state): State<Arc<AppState>>,
    ValidId(review_id): ValidId,
) -> Result<Json<Review>, ApiError> {
    let review = ReviewRepo::new(state.db.pool())
        .get(review_id)
        .await
        .map_err(ApiError::failed("Some error occurred while retrieving the review."))?;
    Ok(Json(review))
}

async fn update_review(
    State(state): State<Arc<AppState>>,
    ValidId(review_id): ValidId,
    ApiJson(body): ApiJson<ReviewChanges>,
) -> Result<Json<Review>, ApiError> {
    let changes = body.into_changes()?;

    let review = ReviewRepo::new(state.db.pool())
        .update(review_id, changes)
        .await
        .map_err(ApiError::failed("Some error occurred while updating the review."))?;

    tracing::info!(review_id, "Review updated");
    Ok(Json(review))
}

async fn delete_review(
    State(state): State<Arc<AppState>>,
    ValidId(review_id): ValidId,
) -> Result<Json<MessageResponse>, ApiError> {
    ReviewRepo::new(state.db.pool())
        .delete(review_id)
        .await
        .map_err(ApiError::failed("Some error occurred while deleting the review."))?;

    tracing::info!(review_id, "Review deleted");
    Ok(Json(MessageResponse {
        message: "Review deleted successfully.",
    }))
}

/// Review routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/reviews", get(list_reviews).post(create_review))
        .route(
            "/reviews/{id}",
            get(get_review).put(update_review).delete(delete_review),
        )
}
