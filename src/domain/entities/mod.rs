//! Core domain entities.
//!
//! - [`Link`] - A stored short link with its click counter
//! - [`NewLink`] - Insert-time data for a link

pub mod link;

pub use link::{Link, NewLink};
