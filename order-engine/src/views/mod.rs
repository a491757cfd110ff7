//! Screen view-models
//!
//! Serializable read models for the kitchen queue, the waiter dashboard and
//! the customer tracker. Each is rebuilt from snapshots on every request.

pub mod kitchen;
pub mod tracker;
pub mod waiter;

pub use kitchen::{KitchenFilter, KitchenQueue, KitchenTicket, KitchenTicketItem};
pub use tracker::{OrderTracker, TrackerStep};
pub use waiter::{WaiterAction, WaiterBadge, WaiterDashboard, WaiterOrderCard, WaiterStageCounts};
