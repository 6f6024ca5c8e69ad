//! Repository trait for short link storage.

use crate::domain::entities::{Link, NewLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Durable mapping from short code to link record.
///
/// The repository owns code uniqueness and the atomicity of the click
/// counter. Callers never read-modify-write `clicks` themselves.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryLinkRepository`] - Process-local implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync + 'static {
    /// Inserts a new link and returns the stored record with its id.
    ///
    /// Two concurrent inserts with the same code never both succeed.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::DuplicateCode`] if the code is already stored.
    /// Returns [`AppError::Database`] or [`AppError::Storage`] on backend failures.
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Finds a link by its bare short code.
    ///
    /// Expired links are returned as well; expiry is decided by the caller.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Database`] or [`AppError::Storage`] on backend failures.
    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError>;

    /// Atomically increments the click counter of a link by one.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this id.
    async fn increment_clicks(&self, id: i64) -> Result<(), AppError>;

    /// Lists every link owned by `owner_id`, newest first.
    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Link>, AppError>;
}
