//! SeaStay API service
//!
//! Public listing pages for visitors and the admin back-office: place
//! management, image uploads, user roles, dashboard statistics and the
//! recent-activity feed.

use sqlx::migrate::Migrator;

pub mod activity;
pub mod config;
pub mod error;
pub mod listing;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod session;
pub mod state;
pub mod stats;
pub mod storage;
pub mod validation;

pub use state::AppState;

/// Schema migrations owned by this service
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");
