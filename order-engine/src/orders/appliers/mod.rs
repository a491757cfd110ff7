//! Event applier implementations
//!
//! Each applier implements the `EventApplier` trait and handles
//! one specific event type. Appliers are PURE functions.

use enum_dispatch::enum_dispatch;

use shared::order::{EventPayload, OrderEvent};

mod item_state_changed;
mod order_placed;
mod payment_validated;
mod status_advanced;

pub use item_state_changed::ItemStateChangedApplier;
pub use order_placed::OrderPlacedApplier;
pub use payment_validated::PaymentValidatedApplier;
pub use status_advanced::StatusAdvancedApplier;

/// EventAction enum - dispatches to concrete applier implementations
///
/// Uses enum_dispatch for zero-cost static dispatch.
#[enum_dispatch(EventApplier)]
pub enum EventAction {
    OrderPlaced(OrderPlacedApplier),
    PaymentValidated(PaymentValidatedApplier),
    StatusAdvanced(StatusAdvancedApplier),
    ItemStateChanged(ItemStateChangedApplier),
}

/// Convert OrderEvent reference to EventAction
///
/// This is the ONLY place with a match on EventPayload.
impl From<&OrderEvent> for EventAction {
    fn from(event: &OrderEvent) -> Self {
        match &event.payload {
            EventPayload::OrderPlaced { .. } => EventAction::OrderPlaced(OrderPlacedApplier),
            EventPayload::PaymentValidated { .. } => {
                EventAction::PaymentValidated(PaymentValidatedApplier)
            }
            EventPayload::StatusAdvanced { .. } => EventAction::StatusAdvanced(StatusAdvancedApplier),
            EventPayload::ItemStateChanged { .. } => {
                EventAction::ItemStateChanged(ItemStateChangedApplier)
            }
        }
    }
}
