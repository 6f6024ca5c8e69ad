//! Application layer services implementing the engine operations.
//!
//! Services validate input, apply the expiration and allocation rules, and
//! talk to storage only through the [`LinkRepository`](crate::domain::repositories::LinkRepository)
//! trait, so the same code runs against PostgreSQL and the in-memory store.
//!
//! # Available Services
//!
//! - [`services::shortening_service::ShorteningService`] - Short link creation
//! - [`services::resolution_service::ResolutionService`] - Code resolution and click counting
//! - [`services::stats_service::StatsService`] - Per-owner listing

pub mod services;
