//! Waiter dashboard
//!
//! One waiter's orders that are not yet delivered, with the actions the
//! waiter can take on each and the unread waiter notifications.

use serde::Serialize;
use shared::models::{Notification, Recipient};
use shared::order::{OrderSnapshot, OrderStatus, Transition};

use crate::notifications::NotificationFeed;
use crate::orders::progress::{elapsed_minutes, items_ready_count, total_items_count};
use crate::orders::transitions::legal_transitions;

/// Badge shown on an order card
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WaiterBadge {
    PaymentPending,
    NewOrder,
    InKitchen,
    Preparing,
    ReadyToServe,
    OnTheWay,
    Delivered,
}

impl WaiterBadge {
    pub fn of(order: &OrderSnapshot) -> Self {
        if !order.payment_validated && order.status == OrderStatus::New {
            return WaiterBadge::PaymentPending;
        }
        match order.status {
            OrderStatus::New => WaiterBadge::NewOrder,
            OrderStatus::Confirmed => WaiterBadge::InKitchen,
            OrderStatus::Preparing => WaiterBadge::Preparing,
            OrderStatus::Ready => WaiterBadge::ReadyToServe,
            OrderStatus::CourierEnroute => WaiterBadge::OnTheWay,
            OrderStatus::Delivered => WaiterBadge::Delivered,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WaiterBadge::PaymentPending => "Payment pending",
            WaiterBadge::NewOrder => "New order",
            WaiterBadge::InKitchen => "In the kitchen",
            WaiterBadge::Preparing => "Preparing",
            WaiterBadge::ReadyToServe => "Ready to serve",
            WaiterBadge::OnTheWay => "On the way",
            WaiterBadge::Delivered => "Delivered",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            WaiterBadge::PaymentPending => "red",
            WaiterBadge::NewOrder | WaiterBadge::OnTheWay => "blue",
            WaiterBadge::InKitchen => "orange",
            WaiterBadge::Preparing => "yellow",
            WaiterBadge::ReadyToServe | WaiterBadge::Delivered => "green",
        }
    }
}

/// A button on the order card
///
/// The kitchen starts preparation and the delivery scheduler finishes
/// delivery, so those transitions never show up here.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WaiterAction {
    ValidatePayment,
    Confirm,
    Deliver,
}

impl WaiterAction {
    pub fn from_transition(transition: Transition) -> Option<Self> {
        match transition {
            Transition::ValidatePayment => Some(WaiterAction::ValidatePayment),
            Transition::Advance(OrderStatus::Confirmed) => Some(WaiterAction::Confirm),
            Transition::Advance(OrderStatus::CourierEnroute) => Some(WaiterAction::Deliver),
            Transition::Advance(_) => None,
        }
    }

    /// The transition this button requests
    pub fn transition(self) -> Transition {
        match self {
            WaiterAction::ValidatePayment => Transition::ValidatePayment,
            WaiterAction::Confirm => Transition::Advance(OrderStatus::Confirmed),
            WaiterAction::Deliver => Transition::Advance(OrderStatus::CourierEnroute),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WaiterOrderCard {
    pub order_id: String,
    pub table_id: i64,
    pub status: OrderStatus,
    pub badge: WaiterBadge,
    pub elapsed_minutes: i64,
    pub items_ready: usize,
    pub items_total: usize,
    pub total: f64,
    pub actions: Vec<WaiterAction>,
}

impl WaiterOrderCard {
    pub fn build(order: &OrderSnapshot, now: i64) -> Self {
        Self {
            order_id: order.order_id.clone(),
            table_id: order.table_id,
            status: order.status,
            badge: WaiterBadge::of(order),
            elapsed_minutes: elapsed_minutes(order, now),
            items_ready: items_ready_count(order),
            items_total: total_items_count(order),
            total: order.total,
            actions: legal_transitions(order)
                .into_iter()
                .filter_map(WaiterAction::from_transition)
                .collect(),
        }
    }
}

/// Orders per dashboard counter
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
pub struct WaiterStageCounts {
    pub payment_pending: usize,
    pub new: usize,
    pub in_kitchen: usize,
    pub preparing: usize,
    pub ready: usize,
    pub on_the_way: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WaiterDashboard {
    pub waiter_id: i64,
    /// Oldest first
    pub orders: Vec<WaiterOrderCard>,
    pub pending_cash_payments: Vec<String>,
    pub ready_to_serve: Vec<String>,
    pub counts: WaiterStageCounts,
    pub notifications: Vec<Notification>,
}

impl WaiterDashboard {
    pub fn build(
        waiter_id: i64,
        orders: &[OrderSnapshot],
        feed: &NotificationFeed,
        now: i64,
    ) -> Self {
        let mine: Vec<&OrderSnapshot> = orders
            .iter()
            .filter(|o| o.waiter_id == Some(waiter_id) && !o.is_delivered())
            .collect();

        let mut counts = WaiterStageCounts::default();
        for order in &mine {
            if !order.payment_validated {
                counts.payment_pending += 1;
                continue;
            }
            match order.status {
                OrderStatus::New => counts.new += 1,
                OrderStatus::Confirmed => counts.in_kitchen += 1,
                OrderStatus::Preparing => counts.preparing += 1,
                OrderStatus::Ready => counts.ready += 1,
                OrderStatus::CourierEnroute => counts.on_the_way += 1,
                OrderStatus::Delivered => {}
            }
        }

        let order_ids: Vec<&str> = mine.iter().map(|o| o.order_id.as_str()).collect();
        let notifications = feed
            .unread(Recipient::Waiter)
            .into_iter()
            .filter(|n| order_ids.contains(&n.order_id.as_str()))
            .collect();

        Self {
            waiter_id,
            pending_cash_payments: mine
                .iter()
                .filter(|o| o.awaiting_cash_payment())
                .map(|o| o.order_id.clone())
                .collect(),
            ready_to_serve: mine
                .iter()
                .filter(|o| o.status == OrderStatus::Ready)
                .map(|o| o.order_id.clone())
                .collect(),
            orders: mine.iter().map(|o| WaiterOrderCard::build(o, now)).collect(),
            counts,
            notifications,
        }
    }
}
