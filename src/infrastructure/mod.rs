//! Infrastructure layer implementing the domain storage contracts.
//!
//! - [`persistence`] - PostgreSQL and in-memory link repositories

pub mod persistence;
