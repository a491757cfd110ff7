//! AdvanceStatus command handler
//!
//! Moves the order one step along New -> Confirmed -> Preparing -> Ready ->
//! CourierEnroute -> Delivered. Commands issued by the system operator are
//! recorded as automatic.

use crate::orders::traits::{CommandContext, CommandHandler, CommandMetadata, OrderError};
use crate::orders::transitions::check_transition;
use shared::order::command::SYSTEM_OPERATOR_ID;
use shared::order::{EventPayload, OrderEvent, OrderEventType, OrderStatus, Transition};

/// AdvanceStatus action
#[derive(Debug, Clone)]
pub struct AdvanceStatusAction {
    pub order_id: String,
    pub target: OrderStatus,
}

impl CommandHandler for AdvanceStatusAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError> {
        let snapshot = ctx.load_snapshot(&self.order_id)?;

        check_transition(&snapshot, Transition::Advance(self.target))?;

        let seq = ctx.next_sequence();
        let event = OrderEvent::new(
            seq,
            self.order_id.clone(),
            metadata.operator_id,
            metadata.operator_name.clone(),
            metadata.command_id.clone(),
            Some(metadata.timestamp),
            OrderEventType::StatusAdvanced,
            EventPayload::StatusAdvanced {
                from: snapshot.status,
                to: self.target,
                automatic: metadata.operator_id == SYSTEM_OPERATOR_ID,
            },
        );

        Ok(vec![event])
    }
}
