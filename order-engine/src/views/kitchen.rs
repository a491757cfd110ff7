//! Kitchen queue
//!
//! Paid orders waiting for or under preparation, oldest first, with timing and
//! urgency per ticket.

use serde::Serialize;
use shared::order::{KitchenState, OrderSnapshot, OrderStatus};

use crate::catalog::DishLookup;
use crate::orders::progress::{
    Priority, elapsed_minutes, estimated_minutes, items_preparing_count, items_ready_count,
    priority, total_items_count,
};

/// Extra minutes over the estimate before a ticket counts as urgent
pub const URGENT_AFTER_MINUTES: i64 = 5;

/// Queue filter tabs
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KitchenFilter {
    #[default]
    All,
    /// Confirmed, nothing started yet
    New,
    Preparing,
    /// More than five minutes over the estimate
    Urgent,
}

impl KitchenFilter {
    pub const ALL: [KitchenFilter; 4] = [
        KitchenFilter::All,
        KitchenFilter::New,
        KitchenFilter::Preparing,
        KitchenFilter::Urgent,
    ];

    pub fn matches(self, ticket: &KitchenTicket) -> bool {
        match self {
            KitchenFilter::All => true,
            KitchenFilter::New => ticket.status == OrderStatus::Confirmed,
            KitchenFilter::Preparing => ticket.status == OrderStatus::Preparing,
            KitchenFilter::Urgent => ticket.is_urgent(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct KitchenTicketItem {
    pub index: usize,
    pub dish_id: String,
    pub name: String,
    pub quantity: i32,
    pub state: KitchenState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// One order on the kitchen screen
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct KitchenTicket {
    pub order_id: String,
    pub table_id: i64,
    pub status: OrderStatus,
    pub elapsed_minutes: i64,
    pub estimated_minutes: i64,
    pub priority: Priority,
    pub items_ready: usize,
    pub items_preparing: usize,
    pub items_total: usize,
    pub items: Vec<KitchenTicketItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl KitchenTicket {
    pub fn build<D>(order: &OrderSnapshot, now: i64, dishes: &D) -> Self
    where
        D: DishLookup + ?Sized,
    {
        Self {
            order_id: order.order_id.clone(),
            table_id: order.table_id,
            status: order.status,
            elapsed_minutes: elapsed_minutes(order, now),
            estimated_minutes: estimated_minutes(order, dishes),
            priority: priority(order, now, dishes),
            items_ready: items_ready_count(order),
            items_preparing: items_preparing_count(order),
            items_total: total_items_count(order),
            items: order
                .items
                .iter()
                .enumerate()
                .map(|(index, item)| KitchenTicketItem {
                    index,
                    dish_id: item.dish_id.clone(),
                    name: item.name.clone(),
                    quantity: item.quantity,
                    state: item.kitchen_state,
                    notes: item.notes.clone(),
                })
                .collect(),
            notes: order.notes.clone(),
        }
    }

    pub fn is_urgent(&self) -> bool {
        self.elapsed_minutes > self.estimated_minutes.saturating_add(URGENT_AFTER_MINUTES)
    }
}

/// Whether an order belongs on the kitchen screen
pub fn in_kitchen(order: &OrderSnapshot) -> bool {
    order.payment_validated
        && matches!(order.status, OrderStatus::Confirmed | OrderStatus::Preparing)
}

/// The whole kitchen screen
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct KitchenQueue {
    /// Oldest first
    pub tickets: Vec<KitchenTicket>,
    pub generated_at: i64,
}

impl KitchenQueue {
    pub fn build<D>(orders: &[OrderSnapshot], now: i64, dishes: &D) -> Self
    where
        D: DishLookup + ?Sized,
    {
        let mut queued: Vec<&OrderSnapshot> = orders.iter().filter(|o| in_kitchen(o)).collect();
        queued.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.order_id.cmp(&b.order_id))
        });

        Self {
            tickets: queued
                .into_iter()
                .map(|o| KitchenTicket::build(o, now, dishes))
                .collect(),
            generated_at: now,
        }
    }

    pub fn filtered(&self, filter: KitchenFilter) -> Vec<&KitchenTicket> {
        self.tickets.iter().filter(|t| filter.matches(t)).collect()
    }

    pub fn count(&self, filter: KitchenFilter) -> usize {
        self.tickets.iter().filter(|t| filter.matches(t)).count()
    }

    /// `(filter, count)` for every tab
    pub fn filter_counts(&self) -> Vec<(KitchenFilter, usize)> {
        KitchenFilter::ALL
            .iter()
            .map(|f| (*f, self.count(*f)))
            .collect()
    }

    pub fn critical_count(&self) -> usize {
        self.tickets
            .iter()
            .filter(|t| t.priority == Priority::Critical)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }
}
