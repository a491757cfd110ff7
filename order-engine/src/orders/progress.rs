//! Progress derivations
//!
//! Pure functions over an [`OrderSnapshot`]. Every value is recomputed from
//! the snapshot handed in; nothing here is cached between calls.

use serde::Serialize;
use shared::models::DEFAULT_PREP_TIME_MINUTES;
use shared::order::{KitchenState, OrderSnapshot, OrderStatus, Stage};
use shared::util::whole_minutes_between;

use crate::catalog::DishLookup;

/// Stage the order is currently shown at
///
/// An order with an unvalidated payment always sits at the payment gate,
/// whatever its stored status says.
pub fn current_stage(order: &OrderSnapshot) -> Stage {
    if !order.payment_validated {
        return Stage::PaymentValidated;
    }
    order.status.stage()
}

/// Completion flag per canonical stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageCompletion {
    completed: [bool; Stage::CANONICAL.len()],
}

impl StageCompletion {
    pub fn is_completed(&self, stage: Stage) -> bool {
        self.completed[stage.position()]
    }

    /// `(stage, completed)` pairs in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (Stage, bool)> + '_ {
        Stage::CANONICAL
            .iter()
            .map(|stage| (*stage, self.completed[stage.position()]))
    }

    pub fn completed_count(&self) -> usize {
        self.completed.iter().filter(|c| **c).count()
    }
}

/// Which canonical stages the order has reached
///
/// Derived only from the position of `status` and the payment flag, so a
/// completed stage always has every earlier stage completed too.
pub fn stage_completion(order: &OrderSnapshot) -> StageCompletion {
    let reached = order.status.stage().position();
    let mut completed = [false; Stage::CANONICAL.len()];
    for stage in Stage::CANONICAL {
        completed[stage.position()] = match stage {
            Stage::New => true,
            Stage::PaymentValidated => order.payment_validated,
            _ => order.payment_validated && reached >= stage.position(),
        };
    }
    StageCompletion { completed }
}

/// Whole minutes since the order was created, never negative
pub fn elapsed_minutes(order: &OrderSnapshot, now: i64) -> i64 {
    whole_minutes_between(order.created_at, now)
}

/// Expected preparation time in minutes
///
/// Items of one order are cooked in parallel, so the estimate is the longest
/// single line (`prep time × quantity`), not the sum. Dishes missing from the
/// catalog count as [`DEFAULT_PREP_TIME_MINUTES`].
pub fn estimated_minutes<D>(order: &OrderSnapshot, dishes: &D) -> i64
where
    D: DishLookup + ?Sized,
{
    order
        .items
        .iter()
        .map(|item| {
            let prep = dishes.prep_time_minutes(&item.dish_id).unwrap_or_else(|| {
                tracing::debug!(order_id = %order.order_id, dish_id = %item.dish_id, "Dish not in catalog, using default prep time");
                DEFAULT_PREP_TIME_MINUTES
            });
            prep.saturating_mul(i64::from(item.quantity))
        })
        .max()
        .unwrap_or(0)
}

/// Kitchen urgency
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Normal,
    Medium,
    High,
    Critical,
}

impl Priority {
    /// Classify `elapsed - estimated` minutes
    pub fn from_delta(delta: i64) -> Self {
        match delta {
            d if d > 10 => Priority::Critical,
            d if d > 5 => Priority::High,
            d if d > 0 => Priority::Medium,
            _ => Priority::Normal,
        }
    }

    /// More than five minutes over the estimate
    pub fn is_urgent(self) -> bool {
        self >= Priority::High
    }

    pub fn color(self) -> &'static str {
        match self {
            Priority::Normal => "green",
            Priority::Medium => "yellow",
            Priority::High => "orange",
            Priority::Critical => "red",
        }
    }
}

/// Minutes over (positive) or under (negative) the estimate
pub fn delay_minutes<D>(order: &OrderSnapshot, now: i64, dishes: &D) -> i64
where
    D: DishLookup + ?Sized,
{
    elapsed_minutes(order, now).saturating_sub(estimated_minutes(order, dishes))
}

pub fn priority<D>(order: &OrderSnapshot, now: i64, dishes: &D) -> Priority
where
    D: DishLookup + ?Sized,
{
    Priority::from_delta(delay_minutes(order, now, dishes))
}

pub fn items_ready_count(order: &OrderSnapshot) -> usize {
    count_items_in(order, KitchenState::Ready)
}

pub fn items_preparing_count(order: &OrderSnapshot) -> usize {
    count_items_in(order, KitchenState::Preparing)
}

pub fn total_items_count(order: &OrderSnapshot) -> usize {
    order.items.len()
}

fn count_items_in(order: &OrderSnapshot, state: KitchenState) -> usize {
    order
        .items
        .iter()
        .filter(|item| item.kitchen_state == state)
        .count()
}

/// True when every item is ready (vacuously true for an empty order)
pub fn all_items_ready(order: &OrderSnapshot) -> bool {
    order.items.iter().all(|item| item.is_ready())
}

/// Ready items as a percentage, 0 for an empty order
pub fn progress_percent(order: &OrderSnapshot) -> f64 {
    let total = total_items_count(order);
    if total == 0 {
        return 0.0;
    }
    items_ready_count(order) as f64 / total as f64 * 100.0
}

/// Minutes since `stage` was reached, `None` if it was never reached
pub fn minutes_since_stage(order: &OrderSnapshot, stage: Stage, now: i64) -> Option<i64> {
    order
        .stage_timestamps
        .get(&stage)
        .map(|reached_at| whole_minutes_between(*reached_at, now))
}

/// Tone of a status message
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageTone {
    Info,
    Warning,
    Progress,
    Success,
    Celebration,
}

/// Headline shown to the customer for the order's current state
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StatusMessage {
    pub tone: MessageTone,
    pub title: String,
    pub body: String,
    pub color: &'static str,
}

impl StatusMessage {
    fn new(tone: MessageTone, title: &str, body: impl Into<String>, color: &'static str) -> Self {
        Self {
            tone,
            title: title.to_string(),
            body: body.into(),
            color,
        }
    }
}

pub fn status_message(order: &OrderSnapshot) -> StatusMessage {
    if order.awaiting_cash_payment() {
        return StatusMessage::new(
            MessageTone::Warning,
            "Waiting for payment validation",
            "The waiter will validate your cash payment before sending the order to the kitchen. Keep the money ready!",
            "orange",
        );
    }

    match order.status {
        OrderStatus::New => StatusMessage::new(
            MessageTone::Info,
            "Order registered",
            "Your order was registered successfully. The waiter will review it shortly.",
            "blue",
        ),
        OrderStatus::Confirmed => StatusMessage::new(
            MessageTone::Info,
            "Sent to the kitchen",
            "The waiter confirmed your order and it is now in our chefs' hands.",
            "blue",
        ),
        OrderStatus::Preparing => StatusMessage::new(
            MessageTone::Progress,
            "Cooking",
            format!(
                "Our chefs are preparing your food. Progress: {}/{} dishes ready.",
                items_ready_count(order),
                total_items_count(order)
            ),
            "yellow",
        ),
        OrderStatus::Ready => StatusMessage::new(
            MessageTone::Success,
            "Your order is ready!",
            "Your food is ready. The waiter will bring it to your table shortly.",
            "green",
        ),
        OrderStatus::CourierEnroute => StatusMessage::new(
            MessageTone::Success,
            "Waiter on the way!",
            "Your waiter is bringing the order to your table.",
            "green",
        ),
        OrderStatus::Delivered => StatusMessage::new(
            MessageTone::Celebration,
            "Enjoy your meal!",
            "Your order has been delivered.",
            "green",
        ),
    }
}
