//! Order Event Sourcing Module
//!
//! This module provides types for the order event sourcing system:
//! - Stages: lifecycle statuses, the canonical progress sequence and its display table
//! - Commands: Requests from clients to modify orders
//! - Events: Immutable facts recorded after command processing
//! - Snapshots: Computed order state from event stream

pub mod command;
pub mod event;
pub mod snapshot;
pub mod stage;
pub mod types;

// Re-exports
pub use command::{OrderCommand, OrderCommandPayload, OrderItemInput};
pub use event::{EventPayload, OrderEvent, OrderEventType};
pub use snapshot::{OrderItem, OrderSnapshot};
pub use stage::{KitchenState, OrderStatus, PaymentMethod, Stage, StageInfo, Transition};
pub use types::*;
