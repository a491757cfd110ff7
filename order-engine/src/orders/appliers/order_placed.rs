//! OrderPlaced event applier
//!
//! Fills the empty order shell. The event timestamp becomes `created_at`.

use crate::orders::traits::EventApplier;
use shared::order::{EventPayload, OrderEvent, OrderSnapshot, OrderStatus, Stage};

/// OrderPlaced applier
pub struct OrderPlacedApplier;

impl EventApplier for OrderPlacedApplier {
    fn apply(&self, snapshot: &mut OrderSnapshot, event: &OrderEvent) {
        if let EventPayload::OrderPlaced {
            table_id,
            items,
            payment_method,
            payment_validated,
            total,
            notes,
            waiter_id,
        } = &event.payload
        {
            snapshot.table_id = *table_id;
            snapshot.items = items.clone();
            snapshot.status = OrderStatus::New;
            snapshot.payment_method = *payment_method;
            snapshot.payment_validated = *payment_validated;
            snapshot.total = *total;
            snapshot.notes = notes.clone();
            snapshot.waiter_id = *waiter_id;
            snapshot.created_at = event.timestamp;

            snapshot.mark_stage(Stage::New, event.timestamp);
            if *payment_validated {
                snapshot.mark_stage(Stage::PaymentValidated, event.timestamp);
            }

            snapshot.last_sequence = event.sequence;
            snapshot.updated_at = event.timestamp;
        }
    }
}
