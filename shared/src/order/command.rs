//! Order commands - requests from clients to modify orders

use super::stage::{KitchenState, OrderStatus, PaymentMethod};
use serde::{Deserialize, Serialize};

/// Operator ID used for engine-initiated commands (scheduled delivery)
pub const SYSTEM_OPERATOR_ID: i64 = 0;

/// Operator name used for engine-initiated commands
pub const SYSTEM_OPERATOR_NAME: &str = "system";

/// Order command envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCommand {
    /// Client-generated command ID (idempotency key)
    pub command_id: String,
    pub operator_id: i64,
    pub operator_name: String,
    /// Client timestamp (Unix milliseconds)
    pub timestamp: i64,
    pub payload: OrderCommandPayload,
}

impl OrderCommand {
    pub fn new(operator_id: i64, operator_name: String, payload: OrderCommandPayload) -> Self {
        Self {
            command_id: uuid::Uuid::new_v4().to_string(),
            operator_id,
            operator_name,
            timestamp: crate::util::now_millis(),
            payload,
        }
    }

    /// Command issued by the engine itself
    pub fn system(payload: OrderCommandPayload) -> Self {
        Self::new(SYSTEM_OPERATOR_ID, SYSTEM_OPERATOR_NAME.to_string(), payload)
    }

    pub fn is_system(&self) -> bool {
        self.operator_id == SYSTEM_OPERATOR_ID
    }
}

/// Item input for `PlaceOrder`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemInput {
    pub dish_id: String,
    pub name: String,
    pub quantity: i32,
    /// Unit price at order time
    pub unit_price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Command payload variants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderCommandPayload {
    /// Create a new order with status `New`
    PlaceOrder {
        table_id: i64,
        items: Vec<OrderItemInput>,
        payment_method: PaymentMethod,
        #[serde(skip_serializing_if = "Option::is_none")]
        notes: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        waiter_id: Option<i64>,
    },
    /// Clear the cash payment gate
    ValidatePayment { order_id: String },
    /// Move the order status forward
    AdvanceStatus {
        order_id: String,
        target: OrderStatus,
    },
    /// Move one item through the kitchen
    UpdateItemState {
        order_id: String,
        item_index: usize,
        state: KitchenState,
    },
}

impl OrderCommandPayload {
    /// Target order ID, `None` for `PlaceOrder`
    pub fn order_id(&self) -> Option<&str> {
        match self {
            OrderCommandPayload::PlaceOrder { .. } => None,
            OrderCommandPayload::ValidatePayment { order_id }
            | OrderCommandPayload::AdvanceStatus { order_id, .. }
            | OrderCommandPayload::UpdateItemState { order_id, .. } => Some(order_id),
        }
    }
}
