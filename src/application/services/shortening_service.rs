//! Short link creation service.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::config::DEFAULT_CODE_MAX_ATTEMPTS;
use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::{CodeGenerator, RandomCodeGenerator};
use crate::utils::expiry::compute_expiry;
use crate::utils::url_normalizer::normalize_url;

/// Service for creating short links.
///
/// Validates and normalizes the URL, computes the expiration time, then
/// allocates a code by inserting random candidates until the store accepts
/// one. Collisions are retried up to `max_attempts` times.
pub struct ShorteningService<L: LinkRepository, G: CodeGenerator = RandomCodeGenerator> {
    link_repository: Arc<L>,
    generator: G,
    max_attempts: usize,
}

impl<L: LinkRepository> ShorteningService<L> {
    /// Creates a shortening service with the random code generator.
    pub fn new(link_repository: Arc<L>) -> Self {
        Self::with_generator(link_repository, RandomCodeGenerator::new())
    }
}

impl<L: LinkRepository, G: CodeGenerator> ShorteningService<L, G> {
    /// Creates a shortening service with a custom code generator.
    pub fn with_generator(link_repository: Arc<L>, generator: G) -> Self {
        Self {
            link_repository,
            generator,
            max_attempts: DEFAULT_CODE_MAX_ATTEMPTS,
        }
    }

    /// Overrides the allocation retry ceiling. Values below 1 are raised to 1.
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Creates a short link for `raw_url`, valid for `expiry_token`.
    ///
    /// Validation happens before any code is generated or the store is
    /// touched. On success exactly one record has been created; on failure
    /// none has.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidUrl`] or [`AppError::InvalidExpiryToken`]
    /// for bad input.
    /// Returns [`AppError::AllocationExhausted`] if every candidate collided.
    /// Storage failures are propagated without retry.
    pub async fn shorten(
        &self,
        raw_url: &str,
        expiry_token: &str,
        owner_id: Option<i64>,
    ) -> Result<Link, AppError> {
        let long_url = normalize_url(raw_url)?;

        let created_at = Utc::now();
        let expires_at = compute_expiry(created_at, expiry_token)?;

        for attempt in 1..=self.max_attempts {
            let new_link = NewLink {
                code: self.generator.generate(),
                long_url: long_url.clone(),
                created_at,
                expires_at,
                owner_id,
            };

            match self.link_repository.create(new_link).await {
                Ok(link) => {
                    info!(
                        code = %link.code,
                        expires_at = %link.expires_at,
                        attempt,
                        "Short link created"
                    );
                    return Ok(link);
                }
                Err(AppError::DuplicateCode(code)) => {
                    debug!(%code, attempt, "Short code collision, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        warn!(
            attempts = self.max_attempts,
            "Gave up allocating a short code"
        );
        Err(AppError::AllocationExhausted {
            attempts: self.max_attempts,
        })
    }
}
