//! Place repository for database operations

use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    activity::PlaceChange,
    models::{NewPlace, Place},
};

const PLACE_COLUMNS: &str = "id, name, description, address, city, country, price_per_night, \
     max_guests, bedrooms, bathrooms, image_url, images, amenities, rating, review_count, \
     is_active, created_at, updated_at";

/// Place repository for database operations
#[derive(Clone)]
pub struct PlaceRepository {
    pool: PgPool,
}

impl PlaceRepository {
    /// Create a new place repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Active places, newest first
    pub async fn list_active(&self) -> Result<Vec<Place>> {
        let places = sqlx::query_as::<_, Place>(&format!(
            "SELECT {PLACE_COLUMNS} FROM places WHERE is_active ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(places)
    }

    /// Newest active places, at most `limit`
    pub async fn list_featured(&self, limit: i64) -> Result<Vec<Place>> {
        let places = sqlx::query_as::<_, Place>(&format!(
            "SELECT {PLACE_COLUMNS} FROM places WHERE is_active ORDER BY created_at DESC LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(places)
    }

    /// An active place; inactive places are treated as missing
    pub async fn find_active_by_id(&self, id: Uuid) -> Result<Option<Place>> {
        let place = sqlx::query_as::<_, Place>(&format!(
            "SELECT {PLACE_COLUMNS} FROM places WHERE id = $1 AND is_active"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(place)
    }

    /// Every place, active or not, newest first
    pub async fn list_all(&self) -> Result<Vec<Place>> {
        let places = sqlx::query_as::<_, Place>(&format!(
            "SELECT {PLACE_COLUMNS} FROM places ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(places)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Place>> {
        let place = sqlx::query_as::<_, Place>(&format!(
            "SELECT {PLACE_COLUMNS} FROM places WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(place)
    }

    /// Insert a place
    pub async fn create(&self, place: &NewPlace) -> Result<Place> {
        let created = sqlx::query_as::<_, Place>(&format!(
            r#"
            INSERT INTO places (
                name, description, address, city, country, price_per_night, max_guests,
                bedrooms, bathrooms, image_url, images, amenities, rating, review_count, is_active
            )
            VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                COALESCE($11, '{{}}'::TEXT[]), $12, $13, COALESCE($14, 0), $15
            )
            RETURNING {PLACE_COLUMNS}
            "#
        ))
        .bind(&place.name)
        .bind(&place.description)
        .bind(&place.address)
        .bind(&place.city)
        .bind(&place.country)
        .bind(place.price_per_night)
        .bind(place.max_guests)
        .bind(place.bedrooms)
        .bind(place.bathrooms)
        .bind(&place.image_url)
        .bind(&place.images)
        .bind(&place.amenities)
        .bind(place.rating)
        .bind(place.review_count)
        .bind(place.is_active)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Overwrite a place's fields. The gallery, rating and review count keep
    /// their stored values when the payload leaves them out.
    pub async fn update(&self, id: Uuid, place: &NewPlace) -> Result<Option<Place>> {
        let updated = sqlx::query_as::<_, Place>(&format!(
            r#"
            UPDATE places SET
                name = $2,
                description = $3,
                address = $4,
                city = $5,
                country = $6,
                price_per_night = $7,
                max_guests = $8,
                bedrooms = $9,
                bathrooms = $10,
                image_url = $11,
                images = COALESCE($12, images),
                amenities = $13,
                rating = COALESCE($14, rating),
                review_count = COALESCE($15, review_count),
                is_active = $16,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {PLACE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&place.name)
        .bind(&place.description)
        .bind(&place.address)
        .bind(&place.city)
        .bind(&place.country)
        .bind(place.price_per_night)
        .bind(place.max_guests)
        .bind(place.bedrooms)
        .bind(place.bathrooms)
        .bind(&place.image_url)
        .bind(&place.images)
        .bind(&place.amenities)
        .bind(place.rating)
        .bind(place.review_count)
        .bind(place.is_active)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }

    /// Delete a place, returning whether it existed
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM places WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Append an uploaded image to the gallery; it also becomes the primary
    /// image when none is set.
    pub async fn append_image(&self, id: Uuid, url: &str) -> Result<Option<Place>> {
        let place = sqlx::query_as::<_, Place>(&format!(
            r#"
            UPDATE places SET
                images = array_append(images, $2),
                image_url = COALESCE(image_url, $2),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {PLACE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(url)
        .fetch_optional(&self.pool)
        .await?;

        Ok(place)
    }

    /// Most recently updated places, for the activity feed
    pub async fn recently_updated(&self, limit: i64) -> Result<Vec<PlaceChange>> {
        let changes = sqlx::query_as::<_, PlaceChange>(
            r#"
            SELECT id, name, created_at, updated_at
            FROM places
            ORDER BY updated_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(changes)
    }

    /// `is_active` of every place
    pub async fn activity_flags(&self) -> Result<Vec<bool>> {
        let flags = sqlx::query_scalar::<_, bool>("SELECT is_active FROM places")
            .fetch_all(&self.pool)
            .await?;

        Ok(flags)
    }

    /// City of every place
    pub async fn cities(&self) -> Result<Vec<Option<String>>> {
        let cities = sqlx::query_scalar::<_, Option<String>>("SELECT city FROM places")
            .fetch_all(&self.pool)
            .await?;

        Ok(cities)
    }
}
