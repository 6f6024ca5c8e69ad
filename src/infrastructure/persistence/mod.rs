//! Link repository implementations.
//!
//! - [`PgLinkRepository`] - PostgreSQL storage with constraint-backed uniqueness
//! - [`InMemoryLinkRepository`] - Mutex-guarded index with atomic counters
//! - [`pool`] - Pool construction and migrations

pub mod memory_link_repository;
pub mod pg_link_repository;
pub mod pool;

pub use memory_link_repository::InMemoryLinkRepository;
pub use pg_link_repository::PgLinkRepository;
