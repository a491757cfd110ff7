//! PaymentValidated event applier

use crate::orders::traits::EventApplier;
use shared::order::{EventPayload, OrderEvent, OrderSnapshot, Stage};

/// PaymentValidated applier
pub struct PaymentValidatedApplier;

impl EventApplier for PaymentValidatedApplier {
    fn apply(&self, snapshot: &mut OrderSnapshot, event: &OrderEvent) {
        if let EventPayload::PaymentValidated { .. } = &event.payload {
            snapshot.payment_validated = true;
            snapshot.mark_stage(Stage::PaymentValidated, event.timestamp);

            snapshot.last_sequence = event.sequence;
            snapshot.updated_at = event.timestamp;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::order::{OrderEventType, PaymentMethod};

    #[test]
    fn test_apply_payment_validated() {
        let mut snapshot = OrderSnapshot::new("order-1".to_string());
        let event = OrderEvent::new(
            4,
            "order-1".to_string(),
            1,
            "Test User".to_string(),
            "cmd-1".to_string(),
            None,
            OrderEventType::PaymentValidated,
            EventPayload::PaymentValidated {
                payment_method: PaymentMethod::Cash,
            },
        );

        PaymentValidatedApplier.apply(&mut snapshot, &event);

        assert!(snapshot.payment_validated);
        assert_eq!(snapshot.last_sequence, 4);
        assert_eq!(
            snapshot.stage_timestamps.get(&Stage::PaymentValidated),
            Some(&event.timestamp)
        );
    }
}
