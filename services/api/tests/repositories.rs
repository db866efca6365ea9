//! Repository tests against a live PostgreSQL database.
//!
//! Skipped unless `DATABASE_URL` is set. Each test creates its own rows and
//! removes them afterwards.

use common::database::{DatabaseConfig, init_pool, run_migrations};
use serial_test::serial;
use sqlx::PgPool;
use uuid::Uuid;

use seastay_api::{
    MIGRATOR,
    activity::{ActivityItem, ActivityKind},
    models::{AppRole, NewPlace},
    repositories::{PlaceRepository, ProfileRepository, RoleRepository},
};

async fn pool() -> Option<PgPool> {
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("DATABASE_URL not set, skipping repository test");
        return None;
    }

    let config = DatabaseConfig::from_env().unwrap();
    let pool = init_pool(&config).await.unwrap();
    run_migrations(&pool, &MIGRATOR).await.unwrap();
    Some(pool)
}

fn new_place(name: &str, is_active: bool) -> NewPlace {
    NewPlace {
        name: name.to_string(),
        description: Some("Sea view".to_string()),
        address: None,
        city: Some("Miami".to_string()),
        country: None,
        price_per_night: Some(150.0),
        max_guests: Some(4),
        bedrooms: Some(2),
        bathrooms: Some(1),
        image_url: None,
        images: None,
        amenities: vec!["WiFi".to_string()],
        rating: None,
        review_count: None,
        is_active,
    }
}

#[tokio::test]
#[serial]
async fn test_inactive_place_is_hidden_from_visitors() {
    let Some(pool) = pool().await else { return };
    let places = PlaceRepository::new(pool);

    let hidden = places
        .create(&new_place(&format!("hidden-{}", Uuid::new_v4()), false))
        .await
        .unwrap();

    assert!(places.find_active_by_id(hidden.id).await.unwrap().is_none());
    assert!(places.find_by_id(hidden.id).await.unwrap().is_some());
    assert!(
        places
            .list_active()
            .await
            .unwrap()
            .iter()
            .all(|p| p.id != hidden.id)
    );
    assert!(
        places
            .list_featured(100)
            .await
            .unwrap()
            .iter()
            .all(|p| p.id != hidden.id)
    );

    assert!(places.delete(hidden.id).await.unwrap());
    assert!(!places.delete(hidden.id).await.unwrap());
}

#[tokio::test]
#[serial]
async fn test_demoting_admin_leaves_no_rows() {
    let Some(pool) = pool().await else { return };
    let profiles = ProfileRepository::new(pool.clone());
    let roles = RoleRepository::new(pool.clone());

    let id = Uuid::new_v4();
    let profile = profiles
        .ensure_exists(id, Some("owner@example.com"))
        .await
        .unwrap();
    assert_eq!(profile.email.as_deref(), Some("owner@example.com"));

    roles.set_role(id, AppRole::Admin).await.unwrap();
    assert!(roles.has_role(id, AppRole::Admin).await.unwrap());
    assert_eq!(roles.roles_for(id).await.unwrap(), vec![AppRole::Admin]);

    roles.set_role(id, AppRole::Moderator).await.unwrap();
    assert_eq!(roles.roles_for(id).await.unwrap(), vec![AppRole::Moderator]);

    roles.set_role(id, AppRole::User).await.unwrap();
    assert!(roles.roles_for(id).await.unwrap().is_empty());
    assert_eq!(
        AppRole::effective(roles.roles_for(id).await.unwrap()),
        AppRole::User
    );

    sqlx::query("DELETE FROM profiles WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await
        .unwrap();
}

#[tokio::test]
#[serial]
async fn test_existing_email_is_kept() {
    let Some(pool) = pool().await else { return };
    let profiles = ProfileRepository::new(pool.clone());

    let id = Uuid::new_v4();
    profiles.ensure_exists(id, Some("first@example.com")).await.unwrap();
    let again = profiles
        .ensure_exists(id, Some("second@example.com"))
        .await
        .unwrap();
    assert_eq!(again.email.as_deref(), Some("first@example.com"));

    sqlx::query("DELETE FROM profiles WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await
        .unwrap();
}

#[tokio::test]
#[serial]
async fn test_new_place_is_added_then_updated() {
    let Some(pool) = pool().await else { return };
    let places = PlaceRepository::new(pool);

    let created = places
        .create(&new_place(&format!("loft-{}", Uuid::new_v4()), true))
        .await
        .unwrap();
    assert_eq!(created.created_at, created.updated_at);

    let change = places
        .recently_updated(100)
        .await
        .unwrap()
        .into_iter()
        .find(|c| c.id == created.id)
        .unwrap();
    assert_eq!(ActivityItem::place_changed(&change).kind, ActivityKind::PlaceAdded);

    let mut edit = new_place(&created.name, true);
    edit.price_per_night = Some(180.0);
    let updated = places.update(created.id, &edit).await.unwrap().unwrap();
    assert_eq!(updated.price_per_night, Some(180.0));
    assert!(updated.updated_at > updated.created_at);

    let change = places
        .recently_updated(100)
        .await
        .unwrap()
        .into_iter()
        .find(|c| c.id == created.id)
        .unwrap();
    assert_eq!(
        ActivityItem::place_changed(&change).kind,
        ActivityKind::PlaceUpdated
    );

    places.delete(created.id).await.unwrap();
}

#[tokio::test]
#[serial]
async fn test_append_image_sets_cover_once() {
    let Some(pool) = pool().await else { return };
    let places = PlaceRepository::new(pool);

    let created = places
        .create(&new_place(&format!("villa-{}", Uuid::new_v4()), true))
        .await
        .unwrap();
    assert!(created.images.is_empty());

    let first = places
        .append_image(created.id, "https://cdn.example.com/1.jpg")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(first.image_url.as_deref(), Some("https://cdn.example.com/1.jpg"));

    let second = places
        .append_image(created.id, "https://cdn.example.com/2.jpg")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(second.image_url.as_deref(), Some("https://cdn.example.com/1.jpg"));
    assert_eq!(
        second.images,
        vec![
            "https://cdn.example.com/1.jpg".to_string(),
            "https://cdn.example.com/2.jpg".to_string()
        ]
    );

    // an update without images keeps the gallery
    let kept = places
        .update(created.id, &new_place(&created.name, true))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(kept.images.len(), 2);

    assert!(
        places
            .append_image(Uuid::new_v4(), "https://cdn.example.com/x.jpg")
            .await
            .unwrap()
            .is_none()
    );

    places.delete(created.id).await.unwrap();
}
