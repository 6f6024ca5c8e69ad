//! Domain layer containing business entities and storage contracts.
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`click_event`] - Click counting event model
//! - [`click_worker`] - Asynchronous click processing worker
//!
//! # Click Processing Flow
//!
//! 1. [`crate::application::services::ResolutionService`] resolves a live link
//! 2. [`click_event::ClickEvent`] is sent to an async channel
//! 3. [`click_worker::run_click_worker`] applies the increment with retry logic
//! 4. The counter is updated via [`repositories::LinkRepository::increment_clicks`]

pub mod click_event;
pub mod click_worker;
pub mod entities;
pub mod repositories;
