//! Place models: the stored record, admin payloads and visitor views

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Photo shown when a place has no image of its own
pub const STOCK_PHOTO_URL: &str =
    "https://images.unsplash.com/photo-1582719478250-c89cae4dc85b?w=800&h=600&fit=crop";

/// Location label used when a place has no city
pub const DEFAULT_LOCATION: &str = "Beachfront";

/// Guest capacity assumed when a place has no maximum set
pub const DEFAULT_CAPACITY: i32 = 2;

/// Rentable listing record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Place {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub price_per_night: Option<f64>,
    pub max_guests: Option<i32>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    /// Primary image
    pub image_url: Option<String>,
    /// Ordered gallery
    pub images: Vec<String>,
    pub amenities: Vec<String>,
    pub rating: Option<f64>,
    pub review_count: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Place {
    /// Rough floor area in square metres, 30 per bedroom
    pub fn estimated_size(&self) -> i32 {
        match self.bedrooms {
            Some(bedrooms) if bedrooms > 0 => bedrooms * 30,
            _ => 45,
        }
    }

    /// Primary image, falling back to the first gallery image, then the stock photo
    pub fn cover_image(&self) -> String {
        self.image_url
            .clone()
            .or_else(|| self.images.first().cloned())
            .unwrap_or_else(|| STOCK_PHOTO_URL.to_string())
    }

    /// Every image to show on the detail page, never empty
    pub fn gallery(&self) -> Vec<String> {
        if !self.images.is_empty() {
            self.images.clone()
        } else if let Some(url) = &self.image_url {
            vec![url.clone()]
        } else {
            vec![STOCK_PHOTO_URL.to_string()]
        }
    }

    /// "City, Country" with the default location when the city is unknown
    pub fn location_label(&self) -> String {
        let city = self.city.as_deref().unwrap_or(DEFAULT_LOCATION);
        match &self.country {
            Some(country) => format!("{}, {}", city, country),
            None => city.to_string(),
        }
    }
}

/// Amenities as sent by the admin form: a list, or one comma-separated string
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AmenitiesInput {
    List(Vec<String>),
    Text(String),
}

/// Request body for creating or updating a place
#[derive(Debug, Clone, Deserialize)]
pub struct PlacePayload {
    pub name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub price_per_night: Option<f64>,
    pub max_guests: Option<i32>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub image_url: Option<String>,
    /// Replaces the gallery when present, left untouched on update otherwise
    pub images: Option<Vec<String>>,
    pub amenities: Option<AmenitiesInput>,
    pub rating: Option<f64>,
    pub review_count: Option<i32>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// Validated, normalized place fields ready to be written
#[derive(Debug, Clone, PartialEq)]
pub struct NewPlace {
    pub name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub price_per_night: Option<f64>,
    pub max_guests: Option<i32>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub image_url: Option<String>,
    pub images: Option<Vec<String>>,
    pub amenities: Vec<String>,
    pub rating: Option<f64>,
    pub review_count: Option<i32>,
    pub is_active: bool,
}

/// Visitor-facing listing card
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Listing {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub capacity: i32,
    pub size: i32,
    pub image: String,
    pub location: String,
    pub features: Vec<String>,
}

impl From<&Place> for Listing {
    fn from(place: &Place) -> Self {
        Self {
            id: place.id,
            name: place.name.clone(),
            description: place.description.clone().unwrap_or_default(),
            price: place.price_per_night.unwrap_or(0.0),
            capacity: place
                .max_guests
                .filter(|guests| *guests > 0)
                .unwrap_or(DEFAULT_CAPACITY),
            size: place.estimated_size(),
            image: place.cover_image(),
            location: place
                .city
                .clone()
                .unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
            features: place.amenities.clone(),
        }
    }
}

/// Visitor-facing detail page
#[derive(Debug, Clone, Serialize)]
pub struct PlaceDetail {
    #[serde(flatten)]
    pub place: Place,
    pub gallery: Vec<String>,
    pub estimated_size: i32,
    pub location_label: String,
}

impl From<Place> for PlaceDetail {
    fn from(place: Place) -> Self {
        Self {
            gallery: place.gallery(),
            estimated_size: place.estimated_size(),
            location_label: place.location_label(),
            place,
        }
    }
}

/// Query parameters for the listing page
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingQuery {
    /// Minimum guest capacity
    pub guests: Option<i32>,
    /// Exact location match; "all" or empty means no filter
    pub location: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

/// Lowest and highest nightly price among the loaded listings
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceBounds {
    pub min: f64,
    pub max: f64,
}

/// Response for the listing page
#[derive(Debug, Clone, Serialize)]
pub struct ListingResponse {
    pub items: Vec<Listing>,
    /// Number of active listings before filtering
    pub total: usize,
    pub locations: Vec<String>,
    pub price_bounds: Option<PriceBounds>,
}

/// Query parameters for the featured strip
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeaturedQuery {
    pub limit: Option<u32>,
}

/// Request for uploading a place image
#[derive(Debug, Clone, Deserialize)]
pub struct UploadImageRequest {
    pub file_name: String,
    pub content_type: String,
    /// Base64 encoded file contents
    pub file_data: String,
}

/// Response for an uploaded image
#[derive(Debug, Clone, Serialize)]
pub struct UploadImageResponse {
    pub key: String,
    pub url: String,
    pub place: Place,
}
