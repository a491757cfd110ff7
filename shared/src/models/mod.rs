//! Data models
//!
//! Read-only reference data and feed entries shared with front-ends.

pub mod dish;
pub mod notification;

// Re-exports
pub use dish::*;
pub use notification::*;
