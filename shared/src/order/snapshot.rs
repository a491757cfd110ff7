//! Order snapshot - computed state from event stream

use super::stage::{KitchenState, OrderStatus, PaymentMethod, Stage};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One line of an order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    /// Dish reference in the external catalog
    pub dish_id: String,
    /// Dish name snapshot
    pub name: String,
    pub quantity: i32,
    /// Unit price snapshotted at order time
    pub unit_price: f64,
    pub kitchen_state: KitchenState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Last kitchen state change (Unix millis)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kitchen_updated_at: Option<i64>,
}

impl OrderItem {
    pub fn is_ready(&self) -> bool {
        self.kitchen_state == KitchenState::Ready
    }
}

/// Order snapshot - computed from event stream
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderSnapshot {
    /// Order ID (assigned by server)
    pub order_id: String,
    pub table_id: i64,
    /// Items in entry order
    pub items: Vec<OrderItem>,
    /// Stored status (never regresses)
    pub status: OrderStatus,
    /// Payment gate flag (monotonic)
    pub payment_validated: bool,
    pub payment_method: PaymentMethod,
    /// Total amount
    pub total: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Assigned waiter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waiter_id: Option<i64>,
    /// When each stage was reached (Unix millis)
    #[serde(default)]
    pub stage_timestamps: BTreeMap<Stage, i64>,
    /// Creation timestamp, immutable
    pub created_at: i64,
    /// Last update timestamp
    pub updated_at: i64,
    /// Last applied event sequence
    pub last_sequence: u64,
}

impl OrderSnapshot {
    /// Create an empty order shell, filled in by the `OrderPlaced` event
    pub fn new(order_id: String) -> Self {
        let now = crate::util::now_millis();
        Self {
            order_id,
            table_id: 0,
            items: Vec::new(),
            status: OrderStatus::New,
            payment_validated: false,
            payment_method: PaymentMethod::Cash,
            total: 0.0,
            notes: None,
            waiter_id: None,
            stage_timestamps: BTreeMap::new(),
            created_at: now,
            updated_at: now,
            last_sequence: 0,
        }
    }

    pub fn is_delivered(&self) -> bool {
        self.status == OrderStatus::Delivered
    }

    /// Cash order still waiting for the waiter to collect payment
    pub fn awaiting_cash_payment(&self) -> bool {
        !self.payment_validated && self.payment_method.is_cash()
    }

    pub fn item(&self, index: usize) -> Option<&OrderItem> {
        self.items.get(index)
    }

    /// Record the first time a stage was reached, later writes are ignored
    pub fn mark_stage(&mut self, stage: Stage, timestamp: i64) {
        self.stage_timestamps.entry(stage).or_insert(timestamp);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_snapshot_defaults() {
        let snapshot = OrderSnapshot::new("order-1".to_string());
        assert_eq!(snapshot.status, OrderStatus::New);
        assert!(!snapshot.payment_validated);
        assert!(snapshot.items.is_empty());
        assert_eq!(snapshot.created_at, snapshot.updated_at);
    }

    #[test]
    fn test_mark_stage_keeps_first_timestamp() {
        let mut snapshot = OrderSnapshot::new("order-1".to_string());
        snapshot.mark_stage(Stage::Confirmed, 100);
        snapshot.mark_stage(Stage::Confirmed, 200);
        assert_eq!(snapshot.stage_timestamps.get(&Stage::Confirmed), Some(&100));
    }

    #[test]
    fn test_stage_timestamps_serialize_with_stage_keys() {
        let mut snapshot = OrderSnapshot::new("order-1".to_string());
        snapshot.mark_stage(Stage::PaymentValidated, 42);
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["stage_timestamps"]["PAYMENT_VALIDATED"], 42);

        let back: OrderSnapshot = serde_json::from_value(json).unwrap();
        assert_eq!(back, snapshot);
    }

    #[test]
    fn test_awaiting_cash_payment() {
        let mut snapshot = OrderSnapshot::new("order-1".to_string());
        assert!(snapshot.awaiting_cash_payment());
        snapshot.payment_method = PaymentMethod::Card;
        assert!(!snapshot.awaiting_cash_payment());
        snapshot.payment_method = PaymentMethod::Cash;
        snapshot.payment_validated = true;
        assert!(!snapshot.awaiting_cash_payment());
    }
}
