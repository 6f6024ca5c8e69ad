//! Validation and generation helpers used by the engine services.
//!
//! - [`code_generator`] - Random short code generation
//! - [`url_normalizer`] - URL validation and scheme normalization
//! - [`expiry`] - Expiry token parsing and calendar-aware arithmetic
//! - [`db_error`] - PostgreSQL error classification

pub mod code_generator;
pub mod db_error;
pub mod expiry;
pub mod url_normalizer;
