//! Deferred delivery
//!
//! Once an order is handed to the courier it is marked `Delivered` after a
//! fixed delay, unless something else moved it first. The countdown is keyed
//! by order ID: re-arming replaces the previous countdown, and any other status
//! change cancels it. An external snapshot sync arms or cancels the countdown
//! to match the synced status.
//!
//! ```text
//! StatusAdvanced → CourierEnroute ──arm──▶ sleep(delay) ──▶ still enroute? ──▶ AdvanceStatus(Delivered)
//!                                            ▲                    │ no
//! StatusAdvanced → anything else ──cancel────┘                    └──▶ suppressed
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use dashmap::DashMap;
use shared::order::{
    CommandResponse, EventPayload, OrderCommand, OrderCommandPayload, OrderEvent, OrderStatus,
};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use super::manager::OrdersManager;

#[derive(Debug)]
struct PendingDelivery {
    generation: u64,
    token: CancellationToken,
}

/// Pending delivery countdowns, one per order
#[derive(Debug, Default)]
pub struct DeliveryTimers {
    timers: DashMap<String, PendingDelivery>,
    generation: AtomicU64,
}

impl DeliveryTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a countdown for `order_id`, cancelling any previous one
    ///
    /// Returns the generation the countdown must present to [`Self::disarm`].
    pub fn arm(&self, order_id: &str, token: CancellationToken) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(previous) = self
            .timers
            .insert(order_id.to_string(), PendingDelivery { generation, token })
        {
            previous.token.cancel();
        }
        generation
    }

    /// Cancel the pending countdown. Returns `true` if one existed.
    pub fn cancel(&self, order_id: &str) -> bool {
        match self.timers.remove(order_id) {
            Some((_, pending)) => {
                pending.token.cancel();
                tracing::debug!(order_id = %order_id, "Delivery countdown cancelled");
                true
            }
            None => false,
        }
    }

    /// Drop the entry of a countdown that fired, unless it was re-armed since
    pub fn disarm(&self, order_id: &str, generation: u64) {
        self.timers
            .remove_if(order_id, |_, pending| pending.generation == generation);
    }

    pub fn is_armed(&self, order_id: &str) -> bool {
        self.timers.contains_key(order_id)
    }

    pub fn cancel_all(&self) {
        for entry in self.timers.iter() {
            entry.value().token.cancel();
        }
        self.timers.clear();
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}

/// Apply the deferred `Delivered` transition if the order is still enroute
///
/// Returns `None` when the transition was suppressed.
pub fn deliver_if_still_enroute(manager: &OrdersManager, order_id: &str) -> Option<CommandResponse> {
    let status = manager.get_snapshot(order_id).map(|s| s.status);
    if status != Some(OrderStatus::CourierEnroute) {
        tracing::debug!(order_id = %order_id, status = ?status, "Order left CourierEnroute, delivery suppressed");
        return None;
    }

    let cmd = OrderCommand::system(OrderCommandPayload::AdvanceStatus {
        order_id: order_id.to_string(),
        target: OrderStatus::Delivered,
    });
    let response = manager.execute_command(cmd);
    if response.success {
        tracing::info!(order_id = %order_id, "Order delivered");
    } else {
        tracing::warn!(order_id = %order_id, error = ?response.error, "Deferred delivery rejected");
    }
    Some(response)
}

/// Background listener that drives the deferred delivery transition
///
/// Registered as `TaskKind::Listener` in `start_background_tasks()`.
pub struct DeliveryScheduler {
    manager: Arc<OrdersManager>,
    rx: broadcast::Receiver<OrderEvent>,
    synced_rx: broadcast::Receiver<String>,
    delay: Duration,
    shutdown: CancellationToken,
}

impl DeliveryScheduler {
    /// Subscribes immediately, so no event committed after this call is missed
    pub fn new(manager: Arc<OrdersManager>, delay: Duration, shutdown: CancellationToken) -> Self {
        let rx = manager.subscribe();
        let synced_rx = manager.subscribe_synced();
        Self {
            manager,
            rx,
            synced_rx,
            delay,
            shutdown,
        }
    }

    /// Main loop: resync → listen until shutdown
    pub async fn run(mut self) {
        tracing::info!(delay_ms = self.delay.as_millis() as u64, "Delivery scheduler started");
        self.resync();

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    self.manager.delivery_timers().cancel_all();
                    tracing::info!("Delivery scheduler received shutdown signal");
                    break;
                }
                received = self.rx.recv() => match received {
                    Ok(event) => self.handle_event(&event),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Delivery scheduler lagged behind, resyncing");
                        self.resync();
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        tracing::info!("Event channel closed, stopping delivery scheduler");
                        break;
                    }
                },
                synced = self.synced_rx.recv() => match synced {
                    Ok(order_id) => self.handle_synced(&order_id),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Sync notices lagged behind, resyncing");
                        self.resync();
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        tracing::info!("Sync channel closed, stopping delivery scheduler");
                        break;
                    }
                },
            }
        }
    }

    fn handle_event(&self, event: &OrderEvent) {
        if let EventPayload::StatusAdvanced { to, .. } = &event.payload {
            if *to == OrderStatus::CourierEnroute {
                self.schedule(&event.order_id);
            } else {
                self.manager.delivery_timers().cancel(&event.order_id);
            }
        }
    }

    /// Follow a snapshot replaced by an external sync
    fn handle_synced(&self, order_id: &str) {
        let enroute = self
            .manager
            .get_snapshot(order_id)
            .is_some_and(|s| s.status == OrderStatus::CourierEnroute);
        let timers = self.manager.delivery_timers();
        if enroute {
            if !timers.is_armed(order_id) {
                self.schedule(order_id);
            }
        } else {
            timers.cancel(order_id);
        }
    }

    /// Align countdowns with the stored orders
    fn resync(&self) {
        let timers = self.manager.delivery_timers();
        for order in self.manager.all_orders() {
            if order.status == OrderStatus::CourierEnroute {
                if !timers.is_armed(&order.order_id) {
                    self.schedule(&order.order_id);
                }
            } else {
                timers.cancel(&order.order_id);
            }
        }
    }

    fn schedule(&self, order_id: &str) {
        let token = self.shutdown.child_token();
        let generation = self
            .manager
            .delivery_timers()
            .arm(order_id, token.clone());
        tracing::debug!(order_id = %order_id, generation, "Delivery countdown armed");

        let manager = self.manager.clone();
        let order_id = order_id.to_string();
        let delay = self.delay;
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    manager.delivery_timers().disarm(&order_id, generation);
                    deliver_if_still_enroute(&manager, &order_id);
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arm_replaces_previous_countdown() {
        let timers = DeliveryTimers::new();
        let first = CancellationToken::new();
        let second = CancellationToken::new();

        let gen1 = timers.arm("order-1", first.clone());
        let gen2 = timers.arm("order-1", second.clone());

        assert!(gen2 > gen1);
        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
        assert_eq!(timers.len(), 1);
    }

    #[test]
    fn test_stale_disarm_keeps_new_countdown() {
        let timers = DeliveryTimers::new();
        let gen1 = timers.arm("order-1", CancellationToken::new());
        timers.arm("order-1", CancellationToken::new());

        timers.disarm("order-1", gen1);
        assert!(timers.is_armed("order-1"));
    }

    #[test]
    fn test_cancel_and_cancel_all() {
        let timers = DeliveryTimers::new();
        let a = CancellationToken::new();
        let b = CancellationToken::new();
        timers.arm("a", a.clone());
        timers.arm("b", b.clone());

        assert!(timers.cancel("a"));
        assert!(!timers.cancel("a"));
        assert!(a.is_cancelled());

        timers.cancel_all();
        assert!(b.is_cancelled());
        assert!(timers.is_empty());
    }
}
