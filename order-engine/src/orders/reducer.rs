//! Snapshot reconstruction from the event stream
//!
//! Event application itself lives in the appliers module. This is the fold
//! over a whole stream, used to verify stored snapshots.

use shared::order::{OrderEvent, OrderSnapshot};

use super::appliers::EventAction;
use super::traits::EventApplier;

/// Rebuild an order by applying its events in sequence order
///
/// Returns `None` when the stream is empty.
pub fn replay(order_id: &str, events: &[OrderEvent]) -> Option<OrderSnapshot> {
    if events.is_empty() {
        return None;
    }

    let mut ordered: Vec<&OrderEvent> = events.iter().collect();
    ordered.sort_by_key(|e| e.sequence);

    let mut snapshot = OrderSnapshot::new(order_id.to_string());
    for event in ordered {
        let applier: EventAction = event.into();
        applier.apply(&mut snapshot, event);
    }
    Some(snapshot)
}
