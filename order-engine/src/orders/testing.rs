//! Shared fixtures for unit tests

use std::collections::HashMap;

use shared::models::Dish;
use shared::order::{KitchenState, OrderItem, OrderSnapshot, OrderStatus, PaymentMethod, Stage};

use super::traits::CommandMetadata;

/// dish-a takes 20 minutes, dish-b takes 10
pub fn dish_catalog() -> HashMap<String, Dish> {
    [Dish::new("dish-a", "Dish A", 20), Dish::new("dish-b", "Dish B", 10)]
        .into_iter()
        .map(|d| (d.id.clone(), d))
        .collect()
}

/// Cash order at `status` with queued items
pub fn order_with_items(
    status: OrderStatus,
    payment_validated: bool,
    items: &[(&str, i32)],
) -> OrderSnapshot {
    let mut snapshot = OrderSnapshot::new("order-1".to_string());
    snapshot.table_id = 7;
    snapshot.status = status;
    snapshot.payment_validated = payment_validated;
    snapshot.payment_method = PaymentMethod::Cash;
    snapshot.items = items
        .iter()
        .map(|(dish_id, quantity)| OrderItem {
            dish_id: dish_id.to_string(),
            name: dish_id.to_string(),
            quantity: *quantity,
            unit_price: 10.0,
            kitchen_state: KitchenState::Queued,
            notes: None,
            kitchen_updated_at: None,
        })
        .collect();
    snapshot.mark_stage(Stage::New, snapshot.created_at);
    snapshot
}

pub fn create_test_metadata() -> CommandMetadata {
    CommandMetadata {
        command_id: "cmd-1".to_string(),
        operator_id: 1,
        operator_name: "Test User".to_string(),
        timestamp: 1234567890,
    }
}
