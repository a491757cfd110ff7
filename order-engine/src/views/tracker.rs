//! Customer order tracker
//!
//! The seven-step checklist the customer watches, built from the canonical
//! stage table. "Completed N minutes ago" comes from the stage timestamps the
//! order recorded, so a stage reached before timestamps existed shows none.

use serde::Serialize;
use shared::order::{OrderSnapshot, Stage};

use crate::catalog::DishLookup;
use crate::orders::progress::{
    StatusMessage, current_stage, elapsed_minutes, estimated_minutes, items_ready_count,
    minutes_since_stage, progress_percent, stage_completion, status_message, total_items_count,
};

/// One step of the checklist
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TrackerStep {
    pub stage: Stage,
    pub label: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
    pub description: String,
    pub completed: bool,
    pub current: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_minutes_ago: Option<i64>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OrderTracker {
    pub order_id: String,
    pub table_id: i64,
    pub current_stage: Stage,
    pub steps: Vec<TrackerStep>,
    pub elapsed_minutes: i64,
    pub estimated_minutes: i64,
    pub items_ready: usize,
    pub items_total: usize,
    pub progress_percent: f64,
    pub message: StatusMessage,
}

impl OrderTracker {
    pub fn build<D>(order: &OrderSnapshot, now: i64, dishes: &D) -> Self
    where
        D: DishLookup + ?Sized,
    {
        let current = current_stage(order);
        let completion = stage_completion(order);

        let steps = completion
            .iter()
            .map(|(stage, completed)| {
                let info = stage.info();
                TrackerStep {
                    stage,
                    label: info.label,
                    icon: step_icon(order, stage, info.icon),
                    color: info.color,
                    description: step_description(order, stage, info.description),
                    completed,
                    current: stage == current,
                    completed_minutes_ago: if completed {
                        minutes_since_stage(order, stage, now)
                    } else {
                        None
                    },
                }
            })
            .collect();

        Self {
            order_id: order.order_id.clone(),
            table_id: order.table_id,
            current_stage: current,
            steps,
            elapsed_minutes: elapsed_minutes(order, now),
            estimated_minutes: estimated_minutes(order, dishes),
            items_ready: items_ready_count(order),
            items_total: total_items_count(order),
            progress_percent: progress_percent(order),
            message: status_message(order),
        }
    }

    pub fn step(&self, stage: Stage) -> Option<&TrackerStep> {
        self.steps.iter().find(|s| s.stage == stage)
    }
}

fn step_description(order: &OrderSnapshot, stage: Stage, default: &str) -> String {
    match stage {
        Stage::PaymentValidated if order.payment_method.is_cash() => {
            "The waiter will validate your cash payment".to_string()
        }
        Stage::PaymentValidated => "Payment confirmed automatically".to_string(),
        _ => default.to_string(),
    }
}

fn step_icon(order: &OrderSnapshot, stage: Stage, default: &'static str) -> &'static str {
    match stage {
        Stage::PaymentValidated if order.payment_method.is_cash() => "cash",
        _ => default,
    }
}
