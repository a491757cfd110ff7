//! Transition gating
//!
//! Decides which transitions an order accepts from its current state. Actions
//! call the `check_*` functions before emitting events, so a rejected request
//! never changes anything.

use shared::order::{KitchenState, OrderSnapshot, OrderStatus, Transition};

use super::progress::{all_items_ready, current_stage};
use super::traits::OrderError;

/// Transitions a caller may apply right now
///
/// The set has at most one member: the lifecycle is linear.
pub fn legal_transitions(order: &OrderSnapshot) -> Vec<Transition> {
    if order.awaiting_cash_payment() {
        return vec![Transition::ValidatePayment];
    }

    match order.status {
        OrderStatus::New => vec![Transition::Advance(OrderStatus::Confirmed)],
        OrderStatus::Confirmed => vec![Transition::Advance(OrderStatus::Preparing)],
        OrderStatus::Preparing if all_items_ready(order) => {
            vec![Transition::Advance(OrderStatus::Ready)]
        }
        OrderStatus::Preparing => vec![],
        OrderStatus::Ready => vec![Transition::Advance(OrderStatus::CourierEnroute)],
        OrderStatus::CourierEnroute => vec![Transition::Advance(OrderStatus::Delivered)],
        OrderStatus::Delivered => vec![],
    }
}

pub fn is_legal(order: &OrderSnapshot, transition: Transition) -> bool {
    legal_transitions(order).contains(&transition)
}

/// Reject anything outside [`legal_transitions`]
///
/// `ValidatePayment` on an order whose payment is already validated passes:
/// the caller treats it as a no-op.
pub fn check_transition(order: &OrderSnapshot, requested: Transition) -> Result<(), OrderError> {
    if requested == Transition::ValidatePayment && order.payment_validated {
        return Ok(());
    }
    if is_legal(order, requested) {
        return Ok(());
    }
    Err(OrderError::IllegalTransition {
        current: current_stage(order),
        requested,
    })
}

/// Validate a kitchen state change and return the item's current state
///
/// Items move one step at a time, and only while the order sits in the kitchen
/// (payment validated, status `Confirmed` or `Preparing`).
pub fn check_item_transition(
    order: &OrderSnapshot,
    item_index: usize,
    to: KitchenState,
) -> Result<KitchenState, OrderError> {
    let item = order
        .item(item_index)
        .ok_or(OrderError::ItemNotFound(item_index))?;

    let in_kitchen = matches!(order.status, OrderStatus::Confirmed | OrderStatus::Preparing);
    if !order.payment_validated || !in_kitchen {
        return Err(OrderError::InvalidOperation(format!(
            "Order {} is not in the kitchen queue (status {}, payment validated: {})",
            order.order_id, order.status, order.payment_validated
        )));
    }

    let from = item.kitchen_state;
    if from.next() != Some(to) {
        return Err(OrderError::IllegalItemTransition {
            item_index,
            from,
            to,
        });
    }
    Ok(from)
}

/// Whether an item change also moves the order itself to `Preparing`
///
/// The first item the kitchen starts on a `Confirmed` order does.
pub fn starts_preparation(order: &OrderSnapshot, from: KitchenState, to: KitchenState) -> bool {
    order.status == OrderStatus::Confirmed
        && from == KitchenState::Queued
        && to == KitchenState::Preparing
}
