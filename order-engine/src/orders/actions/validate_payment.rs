//! ValidatePayment command handler
//!
//! Clears the cash payment gate. Validating an order that is already
//! validated succeeds without emitting anything.

use crate::orders::traits::{CommandContext, CommandHandler, CommandMetadata, OrderError};
use crate::orders::transitions::check_transition;
use shared::order::{EventPayload, OrderEvent, OrderEventType, Transition};

/// ValidatePayment action
#[derive(Debug, Clone)]
pub struct ValidatePaymentAction {
    pub order_id: String,
}

impl CommandHandler for ValidatePaymentAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        let snapshot = ctx.load_snapshot(&self.order_id)?;

        if snapshot.payment_validated {
            tracing::debug!(order_id = %self.order_id, "Payment already validated, nothing to do");
            return Ok(vec![]);
        }
        check_transition(&snapshot, Transition::ValidatePayment)?;

        let seq = ctx.next_sequence();
        let event = OrderEvent::new(
            seq,
            self.order_id.clone(),
            metadata.operator_id,
            metadata.operator_name.clone(),
            metadata.command_id.clone(),
            Some(metadata.timestamp),
            OrderEventType::PaymentValidated,
            EventPayload::PaymentValidated {
                payment_method: snapshot.payment_method,
            },
        );

        Ok(vec![event])
    }
}
