use super::*;
use crate::orders::progress::{current_stage, progress_percent};
use crate::orders::transitions::legal_transitions;
use shared::models::{NotificationKind, Recipient};
use shared::order::{
    CommandErrorCode, KitchenState, OrderCommandPayload, OrderEventType, OrderItemInput,
    PaymentMethod, Stage, Transition,
};

mod test_properties;

fn create_test_manager() -> OrdersManager {
    OrdersManager::new(256)
}

fn item(dish_id: &str, quantity: i32, unit_price: f64) -> OrderItemInput {
    OrderItemInput {
        dish_id: dish_id.to_string(),
        name: dish_id.to_uppercase(),
        quantity,
        unit_price,
        notes: None,
    }
}

fn cmd(payload: OrderCommandPayload) -> OrderCommand {
    OrderCommand::new(1, "Test Operator".to_string(), payload)
}

fn place_order(
    manager: &OrdersManager,
    payment_method: PaymentMethod,
    items: Vec<OrderItemInput>,
) -> String {
    let resp = manager.execute_command(cmd(OrderCommandPayload::PlaceOrder {
        table_id: 5,
        items,
        payment_method,
        notes: None,
        waiter_id: Some(2),
    }));
    assert!(resp.success, "PlaceOrder should succeed: {:?}", resp.error);
    resp.order_id.unwrap()
}

fn validate_payment(manager: &OrdersManager, order_id: &str) -> CommandResponse {
    manager.execute_command(cmd(OrderCommandPayload::ValidatePayment {
        order_id: order_id.to_string(),
    }))
}

fn advance(manager: &OrdersManager, order_id: &str, target: OrderStatus) -> CommandResponse {
    manager.execute_command(cmd(OrderCommandPayload::AdvanceStatus {
        order_id: order_id.to_string(),
        target,
    }))
}

fn set_item(
    manager: &OrdersManager,
    order_id: &str,
    item_index: usize,
    state: KitchenState,
) -> CommandResponse {
    manager.execute_command(cmd(OrderCommandPayload::UpdateItemState {
        order_id: order_id.to_string(),
        item_index,
        state,
    }))
}

/// Cash order taken through payment and confirmation
fn confirmed_cash_order(manager: &OrdersManager, items: Vec<OrderItemInput>) -> String {
    let order_id = place_order(manager, PaymentMethod::Cash, items);
    assert!(validate_payment(manager, &order_id).success);
    assert!(advance(manager, &order_id, OrderStatus::Confirmed).success);
    order_id
}
