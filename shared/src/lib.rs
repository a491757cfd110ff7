//! Shared types for the restaurant order engine
//!
//! Serializable domain types used by the engine and by the screens that
//! render its output: order stages, snapshots, commands, events, the dish
//! reference model and notifications.

pub mod models;
pub mod order;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
