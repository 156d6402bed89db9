use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Listing, PropertyType};

/// Errors surfaced by a listing store
#[derive(Debug, Error)]
pub enum LookupError {
    /// No connection to the store could be obtained
    #[error("Listing store unavailable: {0}")]
    Unavailable(String),

    /// The store was reached but the query failed
    #[error("Listing query failed: {0}")]
    Query(String),
}

/// Filter clauses for a listing lookup. Every clause that is set is ANDed;
/// results are always ordered by creation time, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingQuery {
    pub region_id: Option<i64>,
    /// Case-insensitive substring of the region name
    pub region_name_contains: Option<String>,
    /// Allowed property types; empty means any
    pub property_types: Vec<PropertyType>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub created_by: Option<i64>,
    pub limit: Option<i64>,
}

impl ListingQuery {
    /// The `limit` most recent listings, unfiltered
    pub fn recent(limit: i64) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    /// Listings owned by one landlord
    pub fn owned_by(user_id: i64) -> Self {
        Self {
            created_by: Some(user_id),
            ..Self::default()
        }
    }

    /// Whether `listing` satisfies every clause (the limit is not a clause)
    pub fn matches(&self, listing: &Listing) -> bool {
        if self.region_id.is_some() && listing.region_id != self.region_id {
            return false;
        }
        if let Some(fragment) = &self.region_name_contains {
            let fragment = fragment.to_lowercase();
            let hit = listing
                .region_name
                .as_deref()
                .is_some_and(|name| name.to_lowercase().contains(&fragment));
            if !hit {
                return false;
            }
        }
        if !self.property_types.is_empty() && !self.property_types.contains(&listing.property_type) {
            return false;
        }
        if self.min_price.is_some_and(|min| listing.price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| listing.price > max) {
            return false;
        }
        if self.created_by.is_some() && listing.created_by != self.created_by {
            return false;
        }
        true
    }
}

/// Read access to the listing store
#[async_trait]
pub trait ListingLookup: Send + Sync {
    /// Listings matching `query`, newest first. Zero rows is not an error.
    async fn find_listings(&self, query: &ListingQuery) -> Result<Vec<Listing>, LookupError>;
}
