//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A stored short link.
///
/// `code`, `long_url`, `created_at` and `expires_at` never change after
/// insertion. `clicks` only grows, one step per successful resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub id: i64,
    pub code: String,
    pub long_url: String,
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub owner_id: Option<i64>,
}

impl Link {
    /// Creates a new Link instance.
    pub fn new(
        id: i64,
        code: String,
        long_url: String,
        clicks: i64,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
        owner_id: Option<i64>,
    ) -> Self {
        Self {
            id,
            code,
            long_url,
            clicks,
            created_at,
            expires_at,
            owner_id,
        }
    }

    /// Returns true if the link has expired at `now`.
    ///
    /// A link whose expiry equals `now` is already expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Returns true if the link has passed its expiry time.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

/// Input data for creating a new link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLink {
    pub code: String,
    pub long_url: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub owner_id: Option<i64>,
}

impl NewLink {
    /// Materializes the record a store persists for this input.
    pub fn into_link(self, id: i64) -> Link {
        Link::new(
            id,
            self.code,
            self.long_url,
            0,
            self.created_at,
            self.expires_at,
            self.owner_id,
        )
    }
}
