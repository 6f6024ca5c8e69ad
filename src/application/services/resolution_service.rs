//! Short code resolution service.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::domain::click_event::ClickEvent;
use crate::domain::entities::Link;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::is_well_formed_code;

/// How a successful resolution gets counted.
#[derive(Debug, Clone)]
pub enum ClickTracking {
    /// Await the increment before returning the URL.
    Inline,
    /// Hand the click to [`crate::domain::click_worker::run_click_worker`].
    Queued(mpsc::Sender<ClickEvent>),
}

/// Service resolving short codes back to their original URL.
///
/// Missing and expired codes both fail; callers must treat
/// [`AppError::Expired`] exactly like [`AppError::NotFound`]
/// (see [`AppError::is_not_found`]).
pub struct ResolutionService<L: LinkRepository> {
    link_repository: Arc<L>,
    click_tracking: ClickTracking,
}

impl<L: LinkRepository> ResolutionService<L> {
    /// Creates a resolution service that counts clicks inline.
    pub fn new(link_repository: Arc<L>) -> Self {
        Self {
            link_repository,
            click_tracking: ClickTracking::Inline,
        }
    }

    /// Creates a resolution service that queues clicks for the background worker.
    pub fn with_click_queue(link_repository: Arc<L>, click_sender: mpsc::Sender<ClickEvent>) -> Self {
        Self {
            link_repository,
            click_tracking: ClickTracking::Queued(click_sender),
        }
    }

    /// Resolves `code` to its original URL and counts one click.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this code.
    /// Returns [`AppError::Expired`] if the link expired.
    /// Storage failures are propagated.
    pub async fn resolve(&self, code: &str) -> Result<String, AppError> {
        self.resolve_at(code, Utc::now()).await
    }

    /// Like [`Self::resolve`], judging expiry against `now`.
    pub async fn resolve_at(&self, code: &str, now: DateTime<Utc>) -> Result<String, AppError> {
        if !is_well_formed_code(code) {
            debug!(code, "Rejected malformed short code");
            return Err(AppError::NotFound);
        }

        let link = self
            .link_repository
            .find_by_code(code)
            .await?
            .ok_or(AppError::NotFound)?;

        if link.is_expired_at(now) {
            debug!(code, expires_at = %link.expires_at, "Short link expired");
            return Err(AppError::Expired);
        }

        self.record_click(&link).await?;

        Ok(link.long_url)
    }

    async fn record_click(&self, link: &Link) -> Result<(), AppError> {
        match &self.click_tracking {
            ClickTracking::Inline => self.link_repository.increment_clicks(link.id).await,
            ClickTracking::Queued(sender) => {
                let event = ClickEvent::new(link.id, link.code.as_str());

                // A closed queue means the worker is gone; count inline instead.
                if let Err(mpsc::error::SendError(event)) = sender.send(event).await {
                    warn!(code = %event.code, "Click queue closed, counting inline");
                    self.link_repository.increment_clicks(event.link_id).await?;
                }

                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockLinkRepository;
    use chrono::Duration;

    fn link(id: i64, code: &str, expires_in: Duration) -> Link {
        let now = Utc::now();
        Link::new(
            id,
            code.to_string(),
            "https://example.com".to_string(),
            0,
            now - Duration::hours(1),
            now + expires_in,
            None,
        )
    }

    #[tokio::test]
    async fn test_resolve_counts_click_inline() {
        let mut repo = MockLinkRepository::new();
        let found = link(4, "aB3xYz9", Duration::hours(1));
        repo.expect_find_by_code()
            .withf(|code| code == "aB3xYz9")
            .times(1)
            .returning(move |_| Ok(Some(found.clone())));
        repo.expect_increment_clicks()
            .withf(|id| *id == 4)
            .times(1)
            .returning(|_| Ok(()));

        let service = ResolutionService::new(Arc::new(repo));

        let url = service.resolve("aB3xYz9").await.unwrap();
        assert_eq!(url, "https://example.com");
    }

    #[tokio::test]
    async fn test_resolve_missing_code() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code().times(1).returning(|_| Ok(None));
        repo.expect_increment_clicks().times(0);

        let service = ResolutionService::new(Arc::new(repo));

        let err = service.resolve("zzzzzzz").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }

    #[tokio::test]
    async fn test_resolve_malformed_code_skips_store() {
        let repo = MockLinkRepository::new();
        let service = ResolutionService::new(Arc::new(repo));

        for code in ["", "abc", "aB3xYz0", "../etc/passwd", "aB3xYz9x"] {
            let err = service.resolve(code).await.unwrap_err();
            assert!(err.is_not_found(), "{code}");
        }
    }

    #[tokio::test]
    async fn test_resolve_expired_does_not_count() {
        let mut repo = MockLinkRepository::new();
        let found = link(4, "aB3xYz9", Duration::seconds(-1));
        repo.expect_find_by_code()
            .returning(move |_| Ok(Some(found.clone())));
        repo.expect_increment_clicks().times(0);

        let service = ResolutionService::new(Arc::new(repo));

        let err = service.resolve("aB3xYz9").await.unwrap_err();
        assert!(matches!(err, AppError::Expired));
        assert_eq!(err.to_string(), AppError::NotFound.to_string());
    }

    #[tokio::test]
    async fn test_resolve_at_expiry_boundary() {
        let mut repo = MockLinkRepository::new();
        let found = link(4, "aB3xYz9", Duration::hours(1));
        let expires_at = found.expires_at;
        repo.expect_find_by_code()
            .returning(move |_| Ok(Some(found.clone())));
        repo.expect_increment_clicks().times(1).returning(|_| Ok(()));

        let service = ResolutionService::new(Arc::new(repo));

        let just_before = expires_at - Duration::milliseconds(1);
        assert!(service.resolve_at("aB3xYz9", just_before).await.is_ok());

        let err = service.resolve_at("aB3xYz9", expires_at).await.unwrap_err();
        assert!(matches!(err, AppError::Expired));
    }

    #[tokio::test]
    async fn test_resolve_propagates_storage_error() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code()
            .returning(|_| Err(AppError::Storage("unavailable".to_string())));

        let service = ResolutionService::new(Arc::new(repo));

        let err = service.resolve("aB3xYz9").await.unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));
    }

    #[tokio::test]
    async fn test_resolve_queues_click() {
        let mut repo = MockLinkRepository::new();
        let found = link(8, "aB3xYz9", Duration::hours(1));
        repo.expect_find_by_code()
            .returning(move |_| Ok(Some(found.clone())));
        repo.expect_increment_clicks().times(0);

        let (tx, mut rx) = mpsc::channel(4);
        let service = ResolutionService::with_click_queue(Arc::new(repo), tx);

        service.resolve("aB3xYz9").await.unwrap();

        let event = rx.recv().await.unwrap();
        assert_eq!(event.link_id, 8);
        assert_eq!(event.code, "aB3xYz9");
    }

    #[tokio::test]
    async fn test_resolve_falls_back_when_queue_closed() {
        let mut repo = MockLinkRepository::new();
        let found = link(8, "aB3xYz9", Duration::hours(1));
        repo.expect_find_by_code()
            .returning(move |_| Ok(Some(found.clone())));
        repo.expect_increment_clicks()
            .withf(|id| *id == 8)
            .times(1)
            .returning(|_| Ok(()));

        let (tx, rx) = mpsc::channel(4);
        drop(rx);
        let service = ResolutionService::with_click_queue(Arc::new(repo), tx);

        assert_eq!(service.resolve("aB3xYz9").await.unwrap(), "https://example.com");
    }
}
