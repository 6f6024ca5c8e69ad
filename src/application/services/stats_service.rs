//! Per-owner link listing.

use std::sync::Arc;

use crate::domain::entities::Link;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// Service for reading back links and their click counts.
pub struct StatsService<L: LinkRepository> {
    link_repository: Arc<L>,
}

impl<L: LinkRepository> StatsService<L> {
    /// Creates a new statistics service.
    pub fn new(link_repository: Arc<L>) -> Self {
        Self { link_repository }
    }

    /// Lists every link created by `owner_id`, newest first.
    ///
    /// Expired links are included so their final click count stays visible.
    /// An owner with no links gets an empty list.
    ///
    /// # Errors
    ///
    /// Storage failures are propagated.
    pub async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Link>, AppError> {
        self.link_repository.list_by_owner(owner_id).await
    }
}
