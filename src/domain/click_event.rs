//! Click event model for asynchronous click counting.

use chrono::{DateTime, TimeDelta, Utc};

/// A successful resolution waiting to be counted.
///
/// Sent from [`crate::application::services::ResolutionService`] to the
/// background worker so the redirect does not wait on the counter update.
///
/// # Usage Flow
///
/// 1. Created after a live link has been resolved
/// 2. Sent to the click channel (awaiting capacity, never dropped)
/// 3. Processed by [`crate::domain::click_worker::run_click_worker`]
/// 4. Applied via [`crate::domain::repositories::LinkRepository::increment_clicks`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    pub link_id: i64,
    pub code: String,
    pub clicked_at: DateTime<Utc>,
}

impl ClickEvent {
    /// Creates a click event stamped with the current time.
    pub fn new(link_id: i64, code: impl Into<String>) -> Self {
        Self {
            link_id,
            code: code.into(),
            clicked_at: Utc::now(),
        }
    }

    /// Time elapsed since the resolution that produced this event.
    pub fn age(&self) -> TimeDelta {
        Utc::now() - self.clicked_at
    }
}
