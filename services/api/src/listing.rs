//! In-memory filtering of visitor listings
//!
//! The listing page loads every active place once and narrows the list with
//! three independent predicates: a guest-capacity floor, an exact location
//! match and a closed nightly-price interval. A listing is kept only when all
//! three hold.

use std::collections::BTreeSet;

use crate::models::{Listing, ListingQuery, PriceBounds};

/// Location selector value meaning "no location filter"
const ALL_LOCATIONS: &str = "all";

/// Filter applied to the loaded listings
#[derive(Debug, Clone, PartialEq)]
pub struct ListingFilter {
    pub min_guests: Option<i32>,
    pub location: Option<String>,
    pub min_price: f64,
    pub max_price: f64,
}

impl ListingQuery {
    /// Reject queries that cannot describe a filter, before anything is loaded
    pub fn validate(&self) -> Result<(), String> {
        if let Some(guests) = self.guests {
            if guests < 0 {
                return Err("guests must not be negative".to_string());
            }
        }

        for (name, value) in [("min_price", self.min_price), ("max_price", self.max_price)] {
            if let Some(price) = value {
                if !price.is_finite() || price < 0.0 {
                    return Err(format!("{} must be a non-negative number", name));
                }
            }
        }

        if let (Some(min), Some(max)) = (self.min_price, self.max_price) {
            if min > max {
                return Err("min_price must not exceed max_price".to_string());
            }
        }

        Ok(())
    }
}

impl ListingFilter {
    /// Build the filter for a query over the given listings.
    ///
    /// Missing price bounds default to the cheapest and most expensive
    /// listing, so an unbounded query excludes nothing on price.
    pub fn from_query(query: &ListingQuery, listings: &[Listing]) -> Result<Self, String> {
        query.validate()?;

        let bounds = price_bounds(listings);
        let (min_price, max_price) = match (query.min_price, query.max_price, bounds) {
            (Some(min), Some(max), _) => (min, max),
            (Some(min), None, Some(b)) => (min, b.max.max(min)),
            (None, Some(max), Some(b)) => (b.min.min(max), max),
            (None, None, Some(b)) => (b.min, b.max),
            (min, max, None) => (min.unwrap_or(0.0), max.unwrap_or(f64::INFINITY)),
        };

        let location = query
            .location
            .as_deref()
            .map(str::trim)
            .filter(|loc| !loc.is_empty() && !loc.eq_ignore_ascii_case(ALL_LOCATIONS))
            .map(str::to_string);

        Ok(Self {
            min_guests: query.guests.filter(|guests| *guests > 0),
            location,
            min_price,
            max_price,
        })
    }

    pub fn matches_capacity(&self, listing: &Listing) -> bool {
        self.min_guests
            .is_none_or(|guests| listing.capacity >= guests)
    }

    pub fn matches_location(&self, listing: &Listing) -> bool {
        self.location
            .as_deref()
            .is_none_or(|location| listing.location == location)
    }

    pub fn matches_price(&self, listing: &Listing) -> bool {
        listing.price >= self.min_price && listing.price <= self.max_price
    }

    pub fn matches(&self, listing: &Listing) -> bool {
        self.matches_capacity(listing)
            && self.matches_location(listing)
            && self.matches_price(listing)
    }

    /// Listings satisfying every predicate, in their original order
    pub fn apply(&self, listings: &[Listing]) -> Vec<Listing> {
        listings
            .iter()
            .filter(|listing| self.matches(listing))
            .cloned()
            .collect()
    }
}

/// Cheapest and most expensive nightly price, `None` for an empty list
pub fn price_bounds(listings: &[Listing]) -> Option<PriceBounds> {
    listings.iter().map(|listing| listing.price).fold(None, |acc, price| {
        Some(match acc {
            None => PriceBounds {
                min: price,
                max: price,
            },
            Some(bounds) => PriceBounds {
                min: bounds.min.min(price),
                max: bounds.max.max(price),
            },
        })
    })
}

/// Distinct locations, sorted, for the location selector
pub fn locations(listings: &[Listing]) -> Vec<String> {
    listings
        .iter()
        .map(|listing| listing.location.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
