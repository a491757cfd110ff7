//! Command action implementations
//!
//! Each action implements the `CommandHandler` trait and handles
//! one specific command type.

use crate::orders::traits::{CommandContext, CommandHandler, CommandMetadata, OrderError};
use shared::order::{OrderCommandPayload, OrderEvent};

mod advance_status;
mod place_order;
mod update_item_state;
mod validate_payment;

pub use advance_status::AdvanceStatusAction;
pub use place_order::PlaceOrderAction;
pub use update_item_state::UpdateItemStateAction;
pub use validate_payment::ValidatePaymentAction;

/// CommandAction enum - dispatches to concrete action implementations
#[derive(Debug, Clone)]
pub enum CommandAction {
    PlaceOrder(PlaceOrderAction),
    ValidatePayment(ValidatePaymentAction),
    AdvanceStatus(AdvanceStatusAction),
    UpdateItemState(UpdateItemStateAction),
}

impl CommandHandler for CommandAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        match self {
            CommandAction::PlaceOrder(action) => action.execute(ctx, metadata),
            CommandAction::ValidatePayment(action) => action.execute(ctx, metadata),
            CommandAction::AdvanceStatus(action) => action.execute(ctx, metadata),
            CommandAction::UpdateItemState(action) => action.execute(ctx, metadata),
        }
    }
}

impl CommandAction {
    /// Build the action for a payload
    ///
    /// `order_id` is the payload's own order ID, or the server-generated one
    /// for `PlaceOrder`. This is the ONLY place with a match on
    /// OrderCommandPayload.
    pub fn for_order(order_id: &str, payload: &OrderCommandPayload) -> Self {
        match payload {
            OrderCommandPayload::PlaceOrder {
                table_id,
                items,
                payment_method,
                notes,
                waiter_id,
            } => CommandAction::PlaceOrder(PlaceOrderAction {
                order_id: order_id.to_string(),
                table_id: *table_id,
                items: items.clone(),
                payment_method: *payment_method,
                notes: notes.clone(),
                waiter_id: *waiter_id,
            }),
            OrderCommandPayload::ValidatePayment { order_id } => {
                CommandAction::ValidatePayment(ValidatePaymentAction {
                    order_id: order_id.clone(),
                })
            }
            OrderCommandPayload::AdvanceStatus { order_id, target } => {
                CommandAction::AdvanceStatus(AdvanceStatusAction {
                    order_id: order_id.clone(),
                    target: *target,
                })
            }
            OrderCommandPayload::UpdateItemState {
                order_id,
                item_index,
                state,
            } => CommandAction::UpdateItemState(UpdateItemStateAction {
                order_id: order_id.clone(),
                item_index: *item_index,
                state: *state,
            }),
        }
    }
}
