//! API models for request and response payloads

use serde::Serialize;
use uuid::Uuid;

pub mod place;
pub mod profile;
pub mod role;

pub use place::{
    AmenitiesInput, FeaturedQuery, Listing, ListingQuery, ListingResponse, NewPlace, Place,
    PlaceDetail, PlacePayload, PriceBounds, UploadImageRequest, UploadImageResponse,
};
pub use profile::Profile;
pub use role::{AppRole, RoleAssignment, UpdateRoleRequest, UserWithRole};

/// Response for the current session
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub role: AppRole,
    pub is_admin: bool,
}
