//! Recent activity feed for the admin dashboard
//!
//! Merges the newest profiles and the most recently touched places into one
//! feed, newest first. A source that failed to load contributes nothing and
//! leaves a warning on the feed instead of failing the whole request.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use tracing::warn;
use uuid::Uuid;

use crate::models::Profile;

/// Maximum number of items in the feed, and of rows read from each source
pub const FEED_LIMIT: usize = 5;

/// What happened. Declaration order is the tie-break order for equal timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    UserJoined,
    PlaceAdded,
    PlaceUpdated,
}

impl ActivityKind {
    pub fn color(self) -> &'static str {
        match self {
            ActivityKind::UserJoined => "green",
            ActivityKind::PlaceAdded => "blue",
            ActivityKind::PlaceUpdated => "purple",
        }
    }
}

/// Creation and update times of a place
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct PlaceChange {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One line of the feed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityItem {
    pub kind: ActivityKind,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub color: &'static str,
}

impl ActivityItem {
    fn new(kind: ActivityKind, message: String, timestamp: DateTime<Utc>) -> Self {
        Self {
            kind,
            message,
            timestamp,
            color: kind.color(),
        }
    }

    pub fn user_joined(profile: &Profile) -> Self {
        Self::new(
            ActivityKind::UserJoined,
            format!("New user registered: {}", profile.display_name()),
            profile.created_at,
        )
    }

    /// "added" while the place has never been edited, "updated" afterwards
    pub fn place_changed(change: &PlaceChange) -> Self {
        if change.created_at == change.updated_at {
            Self::new(
                ActivityKind::PlaceAdded,
                format!("Place added: {}", change.name),
                change.updated_at,
            )
        } else {
            Self::new(
                ActivityKind::PlaceUpdated,
                format!("Place updated: {}", change.name),
                change.updated_at,
            )
        }
    }
}

/// The merged feed plus a warning for every source that failed to load
#[derive(Debug, Clone, Default, Serialize)]
pub struct ActivityFeed {
    pub items: Vec<ActivityItem>,
    pub warnings: Vec<String>,
}

/// Merge recent profiles and place changes into at most [`FEED_LIMIT`] items,
/// newest first. Equal timestamps are ordered by kind, then by message.
pub fn recent_activity(
    profiles: Result<Vec<Profile>>,
    places: Result<Vec<PlaceChange>>,
) -> ActivityFeed {
    let mut feed = ActivityFeed::default();

    match profiles {
        Ok(profiles) => feed
            .items
            .extend(profiles.iter().map(ActivityItem::user_joined)),
        Err(e) => {
            warn!("Recent profiles unavailable for activity feed: {}", e);
            feed.warnings
                .push("Recent user registrations could not be loaded".to_string());
        }
    }

    match places {
        Ok(places) => feed
            .items
            .extend(places.iter().map(ActivityItem::place_changed)),
        Err(e) => {
            warn!("Recent place changes unavailable for activity feed: {}", e);
            feed.warnings
                .push("Recent place changes could not be loaded".to_string());
        }
    }

    feed.items.sort_by(|a, b| {
        b.timestamp
            .cmp(&a.timestamp)
            .then(a.kind.cmp(&b.kind))
            .then_with(|| a.message.cmp(&b.message))
    });
    feed.items.truncate(FEED_LIMIT);

    feed
}
