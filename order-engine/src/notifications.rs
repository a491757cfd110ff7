//! Role-addressed notification feed
//!
//! Notifications are derived from committed order events. Delivery to
//! devices (push, SMS) is left to the host application, which reads this feed
//! or subscribes to the event broadcast itself.

use parking_lot::RwLock;
use shared::models::{Notification, NotificationKind, Recipient};
use shared::order::{EventPayload, OrderEvent, OrderSnapshot, OrderStatus};

/// In-memory notification feed
#[derive(Debug, Default)]
pub struct NotificationFeed {
    entries: RwLock<Vec<Notification>>,
}

impl NotificationFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an unread notification
    pub fn push(
        &self,
        order_id: &str,
        recipient: Recipient,
        kind: NotificationKind,
        message: impl Into<String>,
        created_at: i64,
    ) -> Notification {
        let notification = Notification {
            id: uuid::Uuid::new_v4().to_string(),
            order_id: order_id.to_string(),
            recipient,
            kind,
            message: message.into(),
            read: false,
            created_at,
        };
        tracing::debug!(order_id = %order_id, ?recipient, ?kind, "Notification queued");
        self.entries.write().push(notification.clone());
        notification
    }

    /// Notifications for a recipient, newest first, optionally filtered by read flag
    pub fn list(&self, recipient: Recipient, read: Option<bool>) -> Vec<Notification> {
        let entries = self.entries.read();
        entries
            .iter()
            .rev()
            .filter(|n| n.recipient == recipient)
            .filter(|n| read.is_none_or(|r| n.read == r))
            .cloned()
            .collect()
    }

    pub fn unread(&self, recipient: Recipient) -> Vec<Notification> {
        self.list(recipient, Some(false))
    }

    pub fn unread_count(&self, recipient: Recipient) -> usize {
        self.entries
            .read()
            .iter()
            .filter(|n| n.recipient == recipient && !n.read)
            .count()
    }

    pub fn for_order(&self, order_id: &str) -> Vec<Notification> {
        self.entries
            .read()
            .iter()
            .filter(|n| n.order_id == order_id)
            .cloned()
            .collect()
    }

    /// Mark one notification read. Returns `false` for an unknown ID.
    pub fn mark_read(&self, notification_id: &str) -> bool {
        let mut entries = self.entries.write();
        match entries.iter_mut().find(|n| n.id == notification_id) {
            Some(n) => {
                n.read = true;
                true
            }
            None => false,
        }
    }

    /// Mark an order's notifications for `recipient` read, limited to `kind`
    /// when given. Returns how many changed.
    pub fn mark_order_read(
        &self,
        order_id: &str,
        recipient: Recipient,
        kind: Option<NotificationKind>,
    ) -> usize {
        let mut changed = 0;
        for n in self.entries.write().iter_mut() {
            if n.order_id == order_id
                && n.recipient == recipient
                && kind.is_none_or(|k| n.kind == k)
                && !n.read
            {
                n.read = true;
                changed += 1;
            }
        }
        changed
    }

    /// Drop every notification of an order, returns how many were removed
    pub fn remove_order(&self, order_id: &str) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|n| n.order_id != order_id);
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Derive notifications from a committed event
    ///
    /// `snapshot` is the order after the event was applied.
    pub fn handle_event(&self, event: &OrderEvent, snapshot: &OrderSnapshot) {
        let order_id = event.order_id.as_str();
        let table = snapshot.table_id;
        let at = event.timestamp;

        match &event.payload {
            EventPayload::OrderPlaced {
                payment_validated,
                payment_method,
                total,
                items,
                ..
            } => {
                self.push(
                    order_id,
                    Recipient::Waiter,
                    NotificationKind::NewOrder,
                    format!("New order for table {} ({} items)", table, items.len()),
                    at,
                );
                if !payment_validated && payment_method.is_cash() {
                    self.push(
                        order_id,
                        Recipient::Waiter,
                        NotificationKind::PaymentPending,
                        format!("Collect cash payment of {:.2} at table {}", total, table),
                        at,
                    );
                }
            }
            EventPayload::PaymentValidated { .. } => {
                self.mark_order_read(
                    order_id,
                    Recipient::Waiter,
                    Some(NotificationKind::PaymentPending),
                );
            }
            EventPayload::StatusAdvanced { to, .. } => match to {
                OrderStatus::Confirmed => {
                    self.mark_order_read(
                        order_id,
                        Recipient::Waiter,
                        Some(NotificationKind::NewOrder),
                    );
                    self.push(
                        order_id,
                        Recipient::Kitchen,
                        NotificationKind::KitchenTicket,
                        format!(
                            "New ticket for table {}: {} items",
                            table,
                            snapshot.items.len()
                        ),
                        at,
                    );
                }
                OrderStatus::Ready => {
                    self.push(
                        order_id,
                        Recipient::Waiter,
                        NotificationKind::OrderReady,
                        format!("Order for table {} is ready to serve", table),
                        at,
                    );
                }
                OrderStatus::Delivered => {
                    self.mark_order_read(order_id, Recipient::Waiter, None);
                    self.push(
                        order_id,
                        Recipient::Customer,
                        NotificationKind::OrderDelivered,
                        "Your order has been delivered. Enjoy your meal!",
                        at,
                    );
                }
                _ => {}
            },
            EventPayload::ItemStateChanged { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::order::{OrderEventType, PaymentMethod};

    fn snapshot() -> OrderSnapshot {
        let mut s = OrderSnapshot::new("order-1".to_string());
        s.table_id = 12;
        s
    }

    fn event(payload: EventPayload) -> OrderEvent {
        OrderEvent::new(
            1,
            "order-1".to_string(),
            1,
            "Test User".to_string(),
            "cmd-1".to_string(),
            None,
            payload.event_type(),
            payload,
        )
    }

    fn placed(payment_method: PaymentMethod) -> OrderEvent {
        event(EventPayload::OrderPlaced {
            table_id: 12,
            items: vec![],
            payment_method,
            payment_validated: !payment_method.is_cash(),
            total: 18.5,
            notes: None,
            waiter_id: Some(3),
        })
    }

    fn advanced(from: OrderStatus, to: OrderStatus) -> OrderEvent {
        event(EventPayload::StatusAdvanced {
            from,
            to,
            automatic: false,
        })
    }

    #[test]
    fn test_cash_order_notifies_waiter_twice() {
        let feed = NotificationFeed::new();
        feed.handle_event(&placed(PaymentMethod::Cash), &snapshot());

        let kinds: Vec<NotificationKind> =
            feed.unread(Recipient::Waiter).iter().map(|n| n.kind).collect();
        assert_eq!(
            kinds,
            vec![NotificationKind::PaymentPending, NotificationKind::NewOrder]
        );
    }

    #[test]
    fn test_card_order_has_no_payment_pending() {
        let feed = NotificationFeed::new();
        feed.handle_event(&placed(PaymentMethod::Card), &snapshot());
        assert_eq!(feed.unread_count(Recipient::Waiter), 1);
    }

    #[test]
    fn test_payment_validated_marks_pending_read() {
        let feed = NotificationFeed::new();
        feed.handle_event(&placed(PaymentMethod::Cash), &snapshot());
        feed.handle_event(
            &event(EventPayload::PaymentValidated {
                payment_method: PaymentMethod::Cash,
            }),
            &snapshot(),
        );

        let unread = feed.unread(Recipient::Waiter);
        assert_eq!(unread.len(), 1);
        assert_eq!(unread[0].kind, NotificationKind::NewOrder);
        assert_eq!(feed.list(Recipient::Waiter, Some(true)).len(), 1);
    }

    #[test]
    fn test_remove_order_keeps_other_orders() {
        let feed = NotificationFeed::new();
        feed.handle_event(&placed(PaymentMethod::Cash), &snapshot());
        feed.push("order-2", Recipient::Kitchen, NotificationKind::KitchenTicket, "ticket", 5);

        assert_eq!(feed.remove_order("order-1"), 2);
        assert_eq!(feed.len(), 1);
        assert!(feed.for_order("order-1").is_empty());
    }

    #[test]
    fn test_confirmed_creates_kitchen_ticket() {
        let feed = NotificationFeed::new();
        feed.handle_event(&placed(PaymentMethod::Card), &snapshot());
        feed.handle_event(
            &advanced(OrderStatus::New, OrderStatus::Confirmed),
            &snapshot(),
        );

        assert_eq!(feed.unread_count(Recipient::Waiter), 0);
        let kitchen = feed.unread(Recipient::Kitchen);
        assert_eq!(kitchen.len(), 1);
        assert_eq!(kitchen[0].kind, NotificationKind::KitchenTicket);
    }

    #[test]
    fn test_ready_then_delivered() {
        let feed = NotificationFeed::new();
        feed.handle_event(&advanced(OrderStatus::Preparing, OrderStatus::Ready), &snapshot());
        assert_eq!(feed.unread(Recipient::Waiter)[0].kind, NotificationKind::OrderReady);

        feed.handle_event(
            &advanced(OrderStatus::CourierEnroute, OrderStatus::Delivered),
            &snapshot(),
        );
        assert_eq!(feed.unread_count(Recipient::Waiter), 0);
        assert_eq!(
            feed.unread(Recipient::Customer)[0].kind,
            NotificationKind::OrderDelivered
        );
    }

    #[test]
    fn test_mark_read_by_id() {
        let feed = NotificationFeed::new();
        let n = feed.push("order-9", Recipient::Kitchen, NotificationKind::KitchenTicket, "x", 0);
        assert!(feed.mark_read(&n.id));
        assert!(!feed.mark_read("missing"));
        assert_eq!(feed.unread_count(Recipient::Kitchen), 0);
        assert_eq!(feed.for_order("order-9").len(), 1);
        assert_eq!(feed.len(), 1);
    }

    #[test]
    fn test_item_changes_are_silent() {
        let feed = NotificationFeed::new();
        let e = event(EventPayload::ItemStateChanged {
            item_index: 0,
            dish_id: "dish-a".to_string(),
            from: shared::order::KitchenState::Queued,
            to: shared::order::KitchenState::Preparing,
        });
        assert_eq!(e.event_type, OrderEventType::ItemStateChanged);
        feed.handle_event(&e, &snapshot());
        assert!(feed.is_empty());
    }
}
