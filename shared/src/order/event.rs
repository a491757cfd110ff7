//! Order events - immutable facts recorded after command processing

use super::snapshot::OrderItem;
use super::stage::{KitchenState, OrderStatus, PaymentMethod};
use serde::{Deserialize, Serialize};

/// Order event - immutable audit record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderEvent {
    /// Event unique ID
    pub event_id: String,
    /// Global sequence number, strictly increasing across all orders
    pub sequence: u64,
    /// Order this event belongs to
    pub order_id: String,
    /// Server timestamp (Unix milliseconds) - AUTHORITATIVE for state evolution
    pub timestamp: i64,
    /// Client timestamp (Unix milliseconds), kept for audit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_timestamp: Option<i64>,
    /// Operator who triggered this event
    pub operator_id: i64,
    /// Operator name (snapshot for audit)
    pub operator_name: String,
    /// Command that triggered this event
    pub command_id: String,
    pub event_type: OrderEventType,
    pub payload: EventPayload,
}

impl OrderEvent {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        sequence: u64,
        order_id: String,
        operator_id: i64,
        operator_name: String,
        command_id: String,
        client_timestamp: Option<i64>,
        event_type: OrderEventType,
        payload: EventPayload,
    ) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            sequence,
            order_id,
            timestamp: crate::util::now_millis(),
            client_timestamp,
            operator_id,
            operator_name,
            command_id,
            event_type,
            payload,
        }
    }
}

/// Event type enumeration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderEventType {
    OrderPlaced,
    PaymentValidated,
    StatusAdvanced,
    ItemStateChanged,
}

impl std::fmt::Display for OrderEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderEventType::OrderPlaced => write!(f, "ORDER_PLACED"),
            OrderEventType::PaymentValidated => write!(f, "PAYMENT_VALIDATED"),
            OrderEventType::StatusAdvanced => write!(f, "STATUS_ADVANCED"),
            OrderEventType::ItemStateChanged => write!(f, "ITEM_STATE_CHANGED"),
        }
    }
}

/// Event payload variants
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventPayload {
    OrderPlaced {
        table_id: i64,
        items: Vec<OrderItem>,
        payment_method: PaymentMethod,
        /// Electronic payments arrive already confirmed
        payment_validated: bool,
        total: f64,
        #[serde(skip_serializing_if = "Option::is_none")]
        notes: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        waiter_id: Option<i64>,
    },

    PaymentValidated {
        payment_method: PaymentMethod,
    },

    StatusAdvanced {
        from: OrderStatus,
        to: OrderStatus,
        /// Set when the engine advanced the order on its own
        automatic: bool,
    },

    ItemStateChanged {
        item_index: usize,
        dish_id: String,
        from: KitchenState,
        to: KitchenState,
    },
}

impl EventPayload {
    pub fn event_type(&self) -> OrderEventType {
        match self {
            EventPayload::OrderPlaced { .. } => OrderEventType::OrderPlaced,
            EventPayload::PaymentValidated { .. } => OrderEventType::PaymentValidated,
            EventPayload::StatusAdvanced { .. } => OrderEventType::StatusAdvanced,
            EventPayload::ItemStateChanged { .. } => OrderEventType::ItemStateChanged,
        }
    }
}
