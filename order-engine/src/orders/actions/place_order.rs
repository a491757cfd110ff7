//! PlaceOrder command handler
//!
//! Creates a new order with status `New`. Cash orders start behind the
//! payment gate, electronic payments arrive already validated.

use crate::orders::money::{order_total, validate_item_input};
use crate::orders::traits::{CommandContext, CommandHandler, CommandMetadata, OrderError};
use shared::order::{
    EventPayload, KitchenState, OrderEvent, OrderEventType, OrderItem, OrderItemInput,
    PaymentMethod,
};

/// PlaceOrder action
#[derive(Debug, Clone)]
pub struct PlaceOrderAction {
    /// Server-generated order ID
    pub order_id: String,
    pub table_id: i64,
    pub items: Vec<OrderItemInput>,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
    pub waiter_id: Option<i64>,
}

impl CommandHandler for PlaceOrderAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        // 1. Order IDs are never reused
        if ctx.order_exists(&self.order_id) {
            return Err(OrderError::OrderAlreadyExists(self.order_id.clone()));
        }

        // 2. Validate lines
        if self.items.is_empty() {
            return Err(OrderError::InvalidOperation(
                "Order must contain at least one item".to_string(),
            ));
        }
        for (index, item) in self.items.iter().enumerate() {
            validate_item_input(index, item)?;
        }

        // 3. Build items, all queued
        let items: Vec<OrderItem> = self
            .items
            .iter()
            .map(|input| OrderItem {
                dish_id: input.dish_id.clone(),
                name: input.name.clone(),
                quantity: input.quantity,
                unit_price: input.unit_price,
                kitchen_state: KitchenState::Queued,
                notes: input.notes.clone(),
                kitchen_updated_at: None,
            })
            .collect();

        let seq = ctx.next_sequence();
        let event = OrderEvent::new(
            seq,
            self.order_id.clone(),
            metadata.operator_id,
            metadata.operator_name.clone(),
            metadata.command_id.clone(),
            Some(metadata.timestamp),
            OrderEventType::OrderPlaced,
            EventPayload::OrderPlaced {
                table_id: self.table_id,
                items,
                payment_method: self.payment_method,
                payment_validated: !self.payment_method.is_cash(),
                total: order_total(&self.items),
                notes: self.notes.clone(),
                waiter_id: self.waiter_id,
            },
        );

        Ok(vec![event])
    }
}
