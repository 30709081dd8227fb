//! House endpoints
//!
//! Simple row operations on `houses` plus the assembled property views
//! (`/details`, `/type/{type}`) served by [`ListingRepo`].

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::db::repos::{House, HouseRepo, ListingRepo, PropertyDetails, PropertySummary};
use crate::http::error::ApiError;
use crate::http::extractors::{ApiJson, ValidId};
use crate::http::server::AppState;
use crate::models::{HouseChanges, NewListing};

/// Response for `POST /houses`
#[derive(Serialize)]
pub struct HouseCreated {
    pub message: &'static str,
    pub house_id: i32,
}

/// Plain acknowledgement body
#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// POST /houses - create a house with details, amenities, price, and image
async fn create_house(
    State(state): State<Arc<AppState>>,
    ApiJson(listing): ApiJson<NewListing>,
) -> Result<(StatusCode, Json<HouseCreated>), ApiError> {
    let house_id = HouseRepo::new(state.db.pool())
        .create(listing)
        .await
        .map_err(ApiError::failed("Failed to add house."))?;

    tracing::info!(house_id, "House created");

    Ok((
        StatusCode::CREATED,
        Json(HouseCreated {
            message: "House and related data added successfully!",
            house_id,
        }),
    ))
}

/// GET /houses - every house row
async fn list_houses(State(state): State<Arc<AppState>>) -> Result<Json<Vec<House>>, ApiError> {
    let houses = HouseRepo::new(state.db.pool())
        .list()
        .await
        .map_err(ApiError::failed("Some error occurred while retrieving houses."))?;
    Ok(Json(houses))
}

/// GET /houses/{house_id}
async fn get_house(
    State(state): State<Arc<AppState>>,
    ValidId(house_id): ValidId,
) -> Result<Json<House>, ApiError> {
    let house = HouseRepo::new(state.db.pool())
        .get(house_id)
        .await
        .map_err(ApiError::failed("Some error occurred while retrieving the house."))?;
    Ok(Json(house))
}

/// PUT /houses/{house_id} - update allow-listed columns
async fn update_house(
    State(state): State<Arc<AppState>>,
    ValidId(house_id): ValidId,
    ApiJson(body): ApiJson<HouseChanges>,
) -> Result<Json<House>, ApiError> {
    let changes = body.into_changes()?;

    let house = HouseRepo::new(state.db.pool())
        .update(house_id, changes)
        .await
        .map_err(ApiError::failed("Some error occurred while updating the house."))?;

    tracing::info!(house_id, "House updated");
    Ok(Json(house))
}

/// DELETE /houses/{house_id} - delete the house and its dependent rows
async fn delete_house(
    State(state): State<Arc<AppState>>,
    ValidId(house_id): ValidId,
) -> Result<Json<MessageResponse>, ApiError> {
    HouseRepo::new(state.db.pool())
        .delete(house_id)
        .await
        .map_err(ApiError::failed("Some error occurred while deleting the house."))?;

    tracing::info!(house_id, "House deleted");
    Ok(Json(MessageResponse {
        message: "House deleted successfully.",
    }))
}

/// GET /houses/owner/{user_id}
async fn houses_for_owner(
    State(state): State<Arc<AppState>>,
    ValidId(user_id): ValidId,
) -> Result<Json<Vec<House>>, ApiError> {
    let houses = HouseRepo::new(state.db.pool())
        .list_for_owner(user_id)
        .await
        .map_err(ApiError::failed(
            "Some error occurred while retrieving houses for the user.",
        ))?;
    Ok(Json(houses))
}

/// GET /houses/{house_id}/details - one house with every dependent row
async fn property_details(
    State(state): State<Arc<AppState>>,
    ValidId(house_id): ValidId,
) -> Result<Json<PropertyDetails>, ApiError> {
    let details = ListingRepo::new(state.db.pool())
        .details(house_id)
        .await
        .map_err(ApiError::failed("Failed to fetch property details."))?;
    Ok(Json(details))
}

/// GET /houses/details - every house with dependents and owner
async fn all_property_details(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<PropertySummary>>, ApiError> {
    let listings = ListingRepo::new(state.db.pool())
        .all()
        .await
        .map_err(ApiError::failed("Failed to fetch property details."))?;

    if listings.is_empty() {
        return Err(ApiError::not_found("No properties found."));
    }
    Ok(Json(listings))
}

/// GET /houses/type/{type} - houses whose details match `type`
async fn property_details_by_type(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
) -> Result<Json<Vec<PropertySummary>>, ApiError> {
    let listings = ListingRepo::new(state.db.pool())
        .by_type(&kind)
        .await
        .map_err(ApiError::failed("Failed to fetch property details."))?;

    if listings.is_empty() {
        return Err(ApiError::not_found(format!(
            "No properties found for type \"{}\".",
            kind
        )));
    }
    Ok(Json(listings))
}

/// House routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/houses", get(list_houses).post(create_house))
        .route("/houses/details", get(all_property_details))
        .route("/houses/owner/{user_id}", get(houses_for_owner))
        .route("/houses/type/{type}", get(property_details_by_type))
        .route(
            "/houses/{house_id}",
            get(get_house).put(update_house).delete(delete_house),
        )
        .route("/houses/{house_id}/details", get(property_details))
}
