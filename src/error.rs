//! Error taxonomy shared by the engine, the stores and the command-line tool.

use thiserror::Error;

/// Message used for both missing and expired links.
///
/// Expired links must be indistinguishable from unknown codes to callers.
const NOT_FOUND_MESSAGE: &str = "Short link not found";

#[derive(Debug, Error)]
pub enum AppError {
    /// The submitted URL does not look like an http(s) URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The expiry token is not `<positive integer><m|h|d|M|y>`.
    #[error("Invalid expiry token: {0}")]
    InvalidExpiryToken(String),

    /// The store already holds a record with this code.
    ///
    /// Recovered internally by [`crate::application::services::ShorteningService`].
    #[error("Short code already exists: {0}")]
    DuplicateCode(String),

    /// Every generated candidate collided with a stored code.
    #[error("Failed to allocate a unique short code after {attempts} attempts")]
    AllocationExhausted { attempts: usize },

    #[error("{}", NOT_FOUND_MESSAGE)]
    NotFound,

    #[error("{}", NOT_FOUND_MESSAGE)]
    Expired,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl AppError {
    /// Stable category string for outward-facing layers.
    ///
    /// `Expired` reports as `not_found` so the existence of an expired
    /// link never leaks.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidUrl(_) | AppError::InvalidExpiryToken(_) => "validation_error",
            AppError::NotFound | AppError::Expired => "not_found",
            AppError::DuplicateCode(_) => "conflict",
            AppError::AllocationExhausted { .. } => "service_busy",
            AppError::Database(_) | AppError::Storage(_) => "internal_error",
        }
    }

    /// Returns true for every outcome a caller must treat as "no such link".
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound | AppError::Expired)
    }

    /// Returns true for input validation failures.
    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::InvalidUrl(_) | AppError::InvalidExpiryToken(_))
    }
}
