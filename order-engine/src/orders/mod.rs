//! Order Event Sourcing Module
//!
//! This module implements order progress tracking using event sourcing:
//!
//! - **progress**: Pure derivations (stage, completion, timing, priority)
//! - **transitions**: Transition gating for orders and kitchen items
//! - **manager**: Core OrdersManager for command processing and event generation
//! - **storage**: In-memory store for events, snapshots and processed commands
//! - **reducer**: Event replay and snapshot computation
//! - **dispatch**: Deferred courier → delivered transition
//! - **retention**: Periodic pruning of delivered orders
//!
//! # Architecture
//!
//! ```text
//! Command → OrdersManager → Event → Storage
//!                 ↓                   ↓
//!              Broadcast       Snapshot Update
//!                 ↓
//!     DeliveryScheduler + Subscribers
//! ```
//!
//! # Data Flow
//!
//! 1. A screen sends an OrderCommand
//! 2. OrdersManager validates it against the transition gate
//! 3. OrderEvent(s) are generated with global sequence numbers
//! 4. Events are applied to the snapshot and stored
//! 5. Notifications are derived from the events
//! 6. Events are broadcast to all subscribers
//! 7. CommandResponse is returned

pub mod actions;
pub mod appliers;
pub mod dispatch;
pub mod manager;
pub mod money;
pub mod progress;
pub mod reducer;
pub mod retention;
pub mod storage;
pub mod traits;
pub mod transitions;

#[cfg(test)]
pub(crate) mod testing;

// Re-exports
pub use dispatch::{DeliveryScheduler, DeliveryTimers, deliver_if_still_enroute};
pub use manager::{ManagerError, ManagerResult, OrdersManager};
pub use progress::{MessageTone, Priority, StageCompletion, StatusMessage};
pub use retention::RetentionWorker;
pub use storage::OrderStorage;
pub use traits::OrderError;

// Re-export shared types for convenience
pub use shared::order::{
    CommandError, CommandErrorCode, CommandResponse, EventPayload, KitchenState, OrderCommand,
    OrderCommandPayload, OrderEvent, OrderEventType, OrderSnapshot, OrderStatus, PaymentMethod,
    Stage, Transition,
};
