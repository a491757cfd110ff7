//! OrdersManager - Core command processing and event generation
//!
//! This module handles:
//! - Command validation and processing
//! - Event generation with global sequence numbers
//! - Snapshot updates under a per-order lock
//! - Notification feed updates
//! - Event broadcasting
//!
//! # Command Flow
//!
//! ```text
//! execute_command(cmd)
//!     ├─ 1. Take the command gate (one execution per command_id at a time)
//!     ├─ 2. Idempotency check (already committed → success, no events)
//!     ├─ 3. Resolve order ID (generated for PlaceOrder)
//!     ├─ 4. Take the per-order lock
//!     ├─ 5. Convert command to action and execute
//!     ├─ 6. Apply events to the snapshot via EventApplier
//!     ├─ 7. Store events and snapshot, mark command processed
//!     ├─ 8. Feed notifications
//!     ├─ 9. Release the locks
//!     ├─ 10. Broadcast event(s)
//!     └─ 11. Return response
//! ```

mod error;
pub use error::*;

use super::actions::CommandAction;
use super::appliers::EventAction;
use super::dispatch::DeliveryTimers;
use super::reducer;
use super::storage::OrderStorage;
use super::traits::{CommandContext, CommandHandler, CommandMetadata, EventApplier};
use crate::notifications::NotificationFeed;
use dashmap::DashMap;
use parking_lot::Mutex;
use shared::order::{CommandResponse, OrderCommand, OrderEvent, OrderSnapshot, OrderStatus};
use shared::util::now_millis;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Default event broadcast channel capacity
pub const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 4096;

/// OrdersManager for command processing
///
/// The `epoch` field is a unique identifier generated on each startup.
/// Clients use it to detect restarts and trigger full resync.
pub struct OrdersManager {
    storage: Arc<OrderStorage>,
    event_tx: broadcast::Sender<OrderEvent>,
    /// Synced order IDs, so the scheduler can follow external snapshots
    synced_tx: broadcast::Sender<String>,
    /// One lock per order, held from validation to storage
    order_locks: Arc<DashMap<String, Arc<Mutex<()>>>>,
    /// One lock per in-flight command ID
    command_gates: Arc<DashMap<String, Arc<Mutex<()>>>>,
    notifications: Arc<NotificationFeed>,
    delivery_timers: Arc<DeliveryTimers>,
    /// Engine instance epoch - unique ID generated on startup
    epoch: String,
}

impl std::fmt::Debug for OrdersManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrdersManager")
            .field("storage", &"<OrderStorage>")
            .field("event_tx", &"<broadcast::Sender>")
            .field("epoch", &self.epoch)
            .finish()
    }
}

impl Default for OrdersManager {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CHANNEL_CAPACITY)
    }
}

impl OrdersManager {
    /// Create a new OrdersManager with the given broadcast capacity
    pub fn new(event_channel_capacity: usize) -> Self {
        Self::with_storage(OrderStorage::new(), event_channel_capacity)
    }

    pub fn with_storage(storage: OrderStorage, event_channel_capacity: usize) -> Self {
        let (event_tx, _) = broadcast::channel(event_channel_capacity.max(1));
        let (synced_tx, _) = broadcast::channel(event_channel_capacity.max(1));
        let epoch = uuid::Uuid::new_v4().to_string();
        tracing::info!(epoch = %epoch, "OrdersManager started with new epoch");
        Self {
            storage: Arc::new(storage),
            event_tx,
            synced_tx,
            order_locks: Arc::new(DashMap::new()),
            command_gates: Arc::new(DashMap::new()),
            notifications: Arc::new(NotificationFeed::new()),
            delivery_timers: Arc::new(DeliveryTimers::new()),
            epoch,
        }
    }

    /// Get the engine epoch (unique ID generated on startup)
    pub fn epoch(&self) -> &str {
        &self.epoch
    }

    /// Subscribe to event broadcasts
    pub fn subscribe(&self) -> broadcast::Receiver<OrderEvent> {
        self.event_tx.subscribe()
    }

    /// Subscribe to IDs of snapshots replaced through [`Self::sync_snapshot`]
    pub fn subscribe_synced(&self) -> broadcast::Receiver<String> {
        self.synced_tx.subscribe()
    }

    pub fn storage(&self) -> &OrderStorage {
        &self.storage
    }

    pub fn notifications(&self) -> &NotificationFeed {
        &self.notifications
    }

    pub fn delivery_timers(&self) -> &DeliveryTimers {
        &self.delivery_timers
    }

    /// Execute a command and return the response
    pub fn execute_command(&self, cmd: OrderCommand) -> CommandResponse {
        self.execute_command_with_events(cmd).0
    }

    /// Execute a command and return both the response and generated events
    ///
    /// Events are broadcast internally as well.
    pub fn execute_command_with_events(
        &self,
        cmd: OrderCommand,
    ) -> (CommandResponse, Vec<OrderEvent>) {
        let command_id = cmd.command_id.clone();
        match self.process_command(cmd) {
            Ok((response, events)) => {
                // Broadcast events after the lock is released
                for event in &events {
                    if self.event_tx.send(event.clone()).is_err() {
                        tracing::debug!("Event broadcast skipped: no active receivers");
                        break;
                    }
                }
                (response, events)
            }
            Err(err) => {
                tracing::warn!(command_id = %command_id, error = %err, "Command rejected");
                (CommandResponse::error(command_id, err.into()), vec![])
            }
        }
    }

    fn order_lock(&self, order_id: &str) -> Arc<Mutex<()>> {
        self.order_locks
            .entry(order_id.to_string())
            .or_default()
            .value()
            .clone()
    }

    /// Drop the lock entry once nobody else holds or waits on it
    ///
    /// `lock` is the caller's own handle, released by this call.
    fn release_order_lock(&self, order_id: &str, lock: Arc<Mutex<()>>) {
        drop(lock);
        self.order_locks
            .remove_if(order_id, |_, l| Arc::strong_count(l) == 1);
    }

    fn command_gate(&self, command_id: &str) -> Arc<Mutex<()>> {
        self.command_gates
            .entry(command_id.to_string())
            .or_default()
            .value()
            .clone()
    }

    /// Process command and return response with events
    ///
    /// Executions of one command ID are serialized by its gate. The ID is
    /// marked processed only when its events are stored, so a failed
    /// command can be retried and a duplicate never reports a rejected
    /// command as successful.
    fn process_command(
        &self,
        cmd: OrderCommand,
    ) -> ManagerResult<(CommandResponse, Vec<OrderEvent>)> {
        tracing::debug!(command_id = %cmd.command_id, payload = ?cmd.payload, "Processing command");

        // 1. One execution per command ID at a time
        let gate = self.command_gate(&cmd.command_id);
        let result = {
            let _gate_guard = gate.lock();
            // 2. Idempotency check
            if self.storage.is_command_processed(&cmd.command_id) {
                tracing::warn!(command_id = %cmd.command_id, "Duplicate command");
                Ok((CommandResponse::duplicate(cmd.command_id.clone()), vec![]))
            } else {
                self.apply_command(&cmd)
            }
        };
        drop(gate);
        self.command_gates
            .remove_if(&cmd.command_id, |_, g| Arc::strong_count(g) == 1);
        result
    }

    fn apply_command(
        &self,
        cmd: &OrderCommand,
    ) -> ManagerResult<(CommandResponse, Vec<OrderEvent>)> {
        // 3. Resolve target order
        let order_id = match cmd.payload.order_id() {
            Some(id) => id.to_string(),
            None => uuid::Uuid::new_v4().to_string(),
        };

        // 4. Serialize mutations of this order
        let lock = self.order_lock(&order_id);
        let result = {
            let _guard = lock.lock();
            self.apply_locked(cmd, &order_id)
        };
        self.release_order_lock(&order_id, lock);
        result
    }

    fn apply_locked(
        &self,
        cmd: &OrderCommand,
        order_id: &str,
    ) -> ManagerResult<(CommandResponse, Vec<OrderEvent>)> {
        let order_id = order_id.to_string();

        // 5. Execute action
        let mut ctx = CommandContext::new(&self.storage);
        let metadata = CommandMetadata {
            command_id: cmd.command_id.clone(),
            operator_id: cmd.operator_id,
            operator_name: cmd.operator_name.clone(),
            timestamp: cmd.timestamp,
        };
        let action = CommandAction::for_order(&order_id, &cmd.payload);
        let events = action.execute(&mut ctx, &metadata)?;

        if events.is_empty() {
            self.storage
                .mark_command_processed(&cmd.command_id, now_millis());
            tracing::debug!(command_id = %cmd.command_id, order_id = %order_id, "Command produced no events");
            return Ok((
                CommandResponse::success(cmd.command_id.clone(), Some(order_id)),
                events,
            ));
        }

        // 6. Apply events
        let mut snapshot = self
            .storage
            .get_snapshot(&order_id)
            .unwrap_or_else(|| OrderSnapshot::new(order_id.clone()));
        for event in &events {
            if event.order_id != order_id {
                return Err(ManagerError::Internal(format!(
                    "Event for order {} produced while processing order {}",
                    event.order_id, order_id
                )));
            }
            let applier: EventAction = event.into();
            applier.apply(&mut snapshot, event);
        }

        // 7. Store
        self.storage.append_events(&order_id, &events);
        self.storage.store_snapshot(snapshot.clone());
        self.storage
            .mark_command_processed(&cmd.command_id, now_millis());

        // 8. Notifications
        for event in &events {
            self.notifications.handle_event(event, &snapshot);
        }

        tracing::info!(
            command_id = %cmd.command_id,
            order_id = %order_id,
            status = %snapshot.status,
            event_count = events.len(),
            "Command processed successfully"
        );
        Ok((
            CommandResponse::success(cmd.command_id.clone(), Some(order_id)),
            events,
        ))
    }

    // ========== External Sync ==========

    /// Replace a snapshot with the authoritative copy from the external store
    ///
    /// Cancels a pending delivery countdown when the order is no longer
    /// `CourierEnroute`.
    pub fn sync_snapshot(&self, snapshot: OrderSnapshot) {
        let order_id = snapshot.order_id.clone();
        let lock = self.order_lock(&order_id);
        {
            let _guard = lock.lock();

            if snapshot.status != OrderStatus::CourierEnroute
                && self.delivery_timers.cancel(&order_id)
            {
                tracing::info!(order_id = %order_id, status = %snapshot.status, "Synced order left CourierEnroute, delivery cancelled");
            }
            tracing::debug!(order_id = %order_id, status = %snapshot.status, "Snapshot synced from external store");
            self.storage.store_snapshot(snapshot);
        }
        self.release_order_lock(&order_id, lock);

        // The scheduler arms a countdown for orders synced in at CourierEnroute
        if self.synced_tx.send(order_id).is_err() {
            tracing::debug!("Sync notice skipped: no active receivers");
        }
    }

    // ========== Retention ==========

    /// Forget delivered orders last updated before `cutoff`
    ///
    /// Removes their snapshots, events and notifications, and the processed
    /// command IDs committed before `cutoff`. Returns how many orders were
    /// removed.
    pub fn prune_delivered(&self, cutoff: i64) -> usize {
        let mut removed = 0;
        for order in self.storage.snapshots_with_status(OrderStatus::Delivered) {
            if order.updated_at >= cutoff {
                continue;
            }
            let lock = self.order_lock(&order.order_id);
            {
                let _guard = lock.lock();
                let still_stale = self
                    .storage
                    .get_snapshot(&order.order_id)
                    .is_some_and(|s| s.is_delivered() && s.updated_at < cutoff);
                if still_stale && self.storage.remove_order(&order.order_id) {
                    self.notifications.remove_order(&order.order_id);
                    self.delivery_timers.cancel(&order.order_id);
                    removed += 1;
                }
            }
            self.release_order_lock(&order.order_id, lock);
        }

        let commands = self.storage.prune_processed_commands(cutoff);
        if removed > 0 || commands > 0 {
            tracing::info!(orders = removed, commands, "Pruned delivered orders");
        }
        removed
    }

    /// Number of order locks currently held or awaited
    pub fn lock_count(&self) -> usize {
        self.order_locks.len()
    }

    // ========== Public Query Methods ==========

    /// Get a snapshot by order ID
    pub fn get_snapshot(&self, order_id: &str) -> Option<OrderSnapshot> {
        self.storage.get_snapshot(order_id)
    }

    /// All orders, oldest first
    pub fn all_orders(&self) -> Vec<OrderSnapshot> {
        self.storage.all_snapshots()
    }

    /// Orders not yet delivered, oldest first
    pub fn active_orders(&self) -> Vec<OrderSnapshot> {
        self.storage
            .all_snapshots()
            .into_iter()
            .filter(|o| !o.is_delivered())
            .collect()
    }

    pub fn orders_with_status(&self, status: OrderStatus) -> Vec<OrderSnapshot> {
        self.storage.snapshots_with_status(status)
    }

    /// Get current sequence number
    pub fn current_sequence(&self) -> u64 {
        self.storage.current_sequence()
    }

    /// Get events since a given sequence
    pub fn events_since(&self, since_sequence: u64) -> Vec<OrderEvent> {
        self.storage.events_since(since_sequence)
    }

    /// Get all events for a specific order
    pub fn events_for(&self, order_id: &str) -> Vec<OrderEvent> {
        self.storage.events_for(order_id)
    }

    /// Rebuild a snapshot from events (for verification)
    pub fn rebuild_snapshot(&self, order_id: &str) -> ManagerResult<OrderSnapshot> {
        let events = self.storage.events_for(order_id);
        reducer::replay(order_id, &events)
            .ok_or_else(|| ManagerError::OrderNotFound(order_id.to_string()))
    }
}

// Make OrdersManager Clone-able via Arc
impl Clone for OrdersManager {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            event_tx: self.event_tx.clone(),
            synced_tx: self.synced_tx.clone(),
            order_locks: self.order_locks.clone(),
            command_gates: self.command_gates.clone(),
            notifications: self.notifications.clone(),
            delivery_timers: self.delivery_timers.clone(),
            epoch: self.epoch.clone(),
        }
    }
}

#[cfg(test)]
mod tests;
