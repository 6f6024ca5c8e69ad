#![allow(dead_code)]

use chrono::{Duration, Utc};
use shortcode_engine::domain::entities::NewLink;

/// A link created an hour ago that lives for `expires_in` from now.
pub fn new_link(code: &str, expires_in: Duration, owner_id: Option<i64>) -> NewLink {
    let now = Utc::now();
    NewLink {
        code: code.to_string(),
        long_url: format!("https://example.com/{code}"),
        created_at: now - Duration::hours(1),
        expires_at: now + expires_in,
        owner_id,
    }
}

/// A link whose expiry is already in the past.
pub fn expired_link(code: &str) -> NewLink {
    let now = Utc::now();
    NewLink {
        code: code.to_string(),
        long_url: format!("https://example.com/{code}"),
        created_at: now - Duration::days(2),
        expires_at: now - Duration::days(1),
        owner_id: None,
    }
}
