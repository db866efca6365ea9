//! Public place routes for visitors

use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use tracing::error;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    listing::{ListingFilter, locations, price_bounds},
    models::{FeaturedQuery, Listing, ListingQuery, ListingResponse, PlaceDetail},
    state::AppState,
};

/// Places shown on the home page when no limit is given
pub const DEFAULT_FEATURED: u32 = 3;

/// Upper bound for the featured limit
pub const MAX_FEATURED: u32 = 12;

/// List active places, filtered by guests, location and nightly price
pub async fn list_listings(
    State(state): State<AppState>,
    Query(query): Query<ListingQuery>,
) -> ApiResult<impl IntoResponse> {
    query.validate().map_err(ApiError::BadRequest)?;

    let places = state.place_repository.list_active().await.map_err(|e| {
        error!("Failed to load listings: {}", e);
        ApiError::InternalServerError
    })?;

    let listings: Vec<Listing> = places.iter().map(Listing::from).collect();
    let filter = ListingFilter::from_query(&query, &listings).map_err(ApiError::BadRequest)?;

    let response = ListingResponse {
        items: filter.apply(&listings),
        total: listings.len(),
        locations: locations(&listings),
        price_bounds: price_bounds(&listings),
    };

    Ok(Json(response))
}

/// Newest active places for the home page
pub async fn featured(
    State(state): State<AppState>,
    Query(query): Query<FeaturedQuery>,
) -> ApiResult<impl IntoResponse> {
    let limit = query.limit.unwrap_or(DEFAULT_FEATURED).clamp(1, MAX_FEATURED);

    let places = state
        .place_repository
        .list_featured(i64::from(limit))
        .await
        .map_err(|e| {
            error!("Failed to load featured places: {}", e);
            ApiError::InternalServerError
        })?;

    let listings: Vec<Listing> = places.iter().map(Listing::from).collect();
    Ok(Json(listings))
}

/// Get an active place by ID
pub async fn get_place(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let place = state
        .place_repository
        .find_active_by_id(id)
        .await
        .map_err(|e| {
            error!("Failed to get place {}: {}", id, e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("Place not found".to_string()))?;

    Ok(Json(PlaceDetail::from(place)))
}
