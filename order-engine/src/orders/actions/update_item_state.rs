//! UpdateItemState command handler
//!
//! Moves one item through the kitchen (Queued -> Preparing -> Ready). The
//! first item started on a `Confirmed` order also moves the order to
//! `Preparing`.

use crate::orders::traits::{CommandContext, CommandHandler, CommandMetadata, OrderError};
use crate::orders::transitions::{check_item_transition, starts_preparation};
use shared::order::command::{SYSTEM_OPERATOR_ID, SYSTEM_OPERATOR_NAME};
use shared::order::{EventPayload, KitchenState, OrderEvent, OrderEventType, OrderStatus};

/// UpdateItemState action
#[derive(Debug, Clone)]
pub struct UpdateItemStateAction {
    pub order_id: String,
    pub item_index: usize,
    pub state: KitchenState,
}

impl CommandHandler for UpdateItemStateAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        let snapshot = ctx.load_snapshot(&self.order_id)?;

        let from = check_item_transition(&snapshot, self.item_index, self.state)?;
        let dish_id = snapshot.items[self.item_index].dish_id.clone();

        let seq = ctx.next_sequence();
        let mut events = vec![OrderEvent::new(
            seq,
            self.order_id.clone(),
            metadata.operator_id,
            metadata.operator_name.clone(),
            metadata.command_id.clone(),
            Some(metadata.timestamp),
            OrderEventType::ItemStateChanged,
            EventPayload::ItemStateChanged {
                item_index: self.item_index,
                dish_id,
                from,
                to: self.state,
            },
        )];

        if starts_preparation(&snapshot, from, self.state) {
            let seq = ctx.next_sequence();
            events.push(OrderEvent::new(
                seq,
                self.order_id.clone(),
                SYSTEM_OPERATOR_ID,
                SYSTEM_OPERATOR_NAME.to_string(),
                metadata.command_id.clone(),
                Some(metadata.timestamp),
                OrderEventType::StatusAdvanced,
                EventPayload::StatusAdvanced {
                    from: OrderStatus::Confirmed,
                    to: OrderStatus::Preparing,
                    automatic: true,
                },
            ));
        }

        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::storage::OrderStorage;
    use crate::orders::testing::{create_test_metadata, order_with_items};

    fn action(item_index: usize, state: KitchenState) -> UpdateItemStateAction {
        UpdateItemStateAction {
            order_id: "order-1".to_string(),
            item_index,
            state,
        }
    }

    #[test]
    fn test_first_item_started_moves_order_to_preparing() {
        let storage = OrderStorage::new();
        storage.store_snapshot(order_with_items(
            OrderStatus::Confirmed,
            true,
            &[("dish-a", 1), ("dish-b", 1)],
        ));
        let mut ctx = CommandContext::new(&storage);

        let events = action(0, KitchenState::Preparing)
            .execute(&mut ctx, &create_test_metadata())
            .unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event_type, OrderEventType::ItemStateChanged);
        assert_eq!(
            events[1].payload,
            EventPayload::StatusAdvanced {
                from: OrderStatus::Confirmed,
                to: OrderStatus::Preparing,
                automatic: true,
            }
        );
        assert!(events[1].sequence > events[0].sequence);
    }

    #[test]
    fn test_item_change_while_preparing_emits_one_event() {
        let storage = OrderStorage::new();
        let mut snapshot = order_with_items(OrderStatus::Preparing, true, &[("dish-a", 1)]);
        snapshot.items[0].kitchen_state = KitchenState::Preparing;
        storage.store_snapshot(snapshot);
        let mut ctx = CommandContext::new(&storage);

        let events = action(0, KitchenState::Ready)
            .execute(&mut ctx, &create_test_metadata())
            .unwrap();

        assert_eq!(events.len(), 1);
        if let EventPayload::ItemStateChanged {
            dish_id, from, to, ..
        } = &events[0].payload
        {
            assert_eq!(dish_id, "dish-a");
            assert_eq!(*from, KitchenState::Preparing);
            assert_eq!(*to, KitchenState::Ready);
        } else {
            panic!("Expected ItemStateChanged payload");
        }
    }

    #[test]
    fn test_item_cannot_skip_preparing() {
        let storage = OrderStorage::new();
        storage.store_snapshot(order_with_items(OrderStatus::Confirmed, true, &[("dish-a", 1)]));
        let mut ctx = CommandContext::new(&storage);

        let result = action(0, KitchenState::Ready).execute(&mut ctx, &create_test_metadata());
        assert!(matches!(
            result,
            Err(OrderError::IllegalItemTransition { .. })
        ));
    }

    #[test]
    fn test_unknown_item_index() {
        let storage = OrderStorage::new();
        storage.store_snapshot(order_with_items(OrderStatus::Confirmed, true, &[("dish-a", 1)]));
        let mut ctx = CommandContext::new(&storage);

        let result = action(5, KitchenState::Preparing).execute(&mut ctx, &create_test_metadata());
        assert_eq!(result.unwrap_err(), OrderError::ItemNotFound(5));
    }
}
