//! StatusAdvanced event applier
//!
//! Sets the new status and stamps the stage it reached.

use crate::orders::traits::EventApplier;
use shared::order::{EventPayload, OrderEvent, OrderSnapshot};

/// StatusAdvanced applier
pub struct StatusAdvancedApplier;

impl EventApplier for StatusAdvancedApplier {
    fn apply(&self, snapshot: &mut OrderSnapshot, event: &OrderEvent) {
        if let EventPayload::StatusAdvanced { to, .. } = &event.payload {
            snapshot.status = *to;
            snapshot.mark_stage(to.stage(), event.timestamp);

            snapshot.last_sequence = event.sequence;
            snapshot.updated_at = event.timestamp;
        }
    }
}
