//! Engine services for the application layer.

pub mod resolution_service;
pub mod shortening_service;
pub mod stats_service;

pub use resolution_service::{ClickTracking, ResolutionService};
pub use shortening_service::ShorteningService;
pub use stats_service::StatsService;
