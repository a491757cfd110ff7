//! ItemStateChanged event applier

use crate::orders::traits::EventApplier;
use shared::order::{EventPayload, OrderEvent, OrderSnapshot};

/// ItemStateChanged applier
pub struct ItemStateChangedApplier;

impl EventApplier for ItemStateChangedApplier {
    fn apply(&self, snapshot: &mut OrderSnapshot, event: &OrderEvent) {
        if let EventPayload::ItemStateChanged { item_index, to, .. } = &event.payload {
            if let Some(item) = snapshot.items.get_mut(*item_index) {
                item.kitchen_state = *to;
                item.kitchen_updated_at = Some(event.timestamp);
            } else {
                tracing::warn!(
                    order_id = %snapshot.order_id,
                    item_index,
                    "ItemStateChanged refers to a missing item"
                );
            }

            snapshot.last_sequence = event.sequence;
            snapshot.updated_at = event.timestamp;
        }
    }
}
