//! In-memory order storage
//!
//! Holds snapshots, the per-order event streams and the processed-command set.
//! Durable persistence belongs to the surrounding store, this layer only keeps
//! the engine's working state.

use dashmap::DashMap;
use shared::order::{OrderEvent, OrderSnapshot, OrderStatus};
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct OrderStorage {
    snapshots: DashMap<String, OrderSnapshot>,
    events: DashMap<String, Vec<OrderEvent>>,
    /// Committed command IDs with their commit time
    processed_commands: DashMap<String, i64>,
    sequence: AtomicU64,
}

impl OrderStorage {
    pub fn new() -> Self {
        Self::default()
    }

    // ========== Snapshots ==========

    pub fn get_snapshot(&self, order_id: &str) -> Option<OrderSnapshot> {
        self.snapshots.get(order_id).map(|s| s.value().clone())
    }

    pub fn store_snapshot(&self, snapshot: OrderSnapshot) {
        self.snapshots.insert(snapshot.order_id.clone(), snapshot);
    }

    pub fn contains(&self, order_id: &str) -> bool {
        self.snapshots.contains_key(order_id)
    }

    /// All snapshots, oldest first
    pub fn all_snapshots(&self) -> Vec<OrderSnapshot> {
        let mut all: Vec<OrderSnapshot> = self.snapshots.iter().map(|s| s.value().clone()).collect();
        all.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.order_id.cmp(&b.order_id))
        });
        all
    }

    pub fn snapshots_with_status(&self, status: OrderStatus) -> Vec<OrderSnapshot> {
        self.all_snapshots()
            .into_iter()
            .filter(|s| s.status == status)
            .collect()
    }

    // ========== Events ==========

    pub fn append_events(&self, order_id: &str, events: &[OrderEvent]) {
        self.events
            .entry(order_id.to_string())
            .or_default()
            .extend_from_slice(events);
    }

    pub fn events_for(&self, order_id: &str) -> Vec<OrderEvent> {
        self.events
            .get(order_id)
            .map(|e| e.value().clone())
            .unwrap_or_default()
    }

    /// Events with a sequence greater than `since`, in sequence order
    pub fn events_since(&self, since: u64) -> Vec<OrderEvent> {
        let mut events: Vec<OrderEvent> = self
            .events
            .iter()
            .flat_map(|entry| {
                entry
                    .value()
                    .iter()
                    .filter(|e| e.sequence > since)
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .collect();
        events.sort_by_key(|e| e.sequence);
        events
    }

    // ========== Sequence ==========

    /// Allocate the next sequence number (strictly increasing, not dense)
    pub fn next_sequence(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn current_sequence(&self) -> u64 {
        self.sequence.load(Ordering::SeqCst)
    }

    // ========== Idempotency ==========

    /// Record a committed command. Only called after its events are stored.
    pub fn mark_command_processed(&self, command_id: &str, committed_at: i64) {
        self.processed_commands
            .insert(command_id.to_string(), committed_at);
    }

    pub fn is_command_processed(&self, command_id: &str) -> bool {
        self.processed_commands.contains_key(command_id)
    }

    pub fn processed_command_count(&self) -> usize {
        self.processed_commands.len()
    }

    // ========== Retention ==========

    /// Remove an order's snapshot and event stream. Returns `true` if it existed.
    pub fn remove_order(&self, order_id: &str) -> bool {
        let had_events = self.events.remove(order_id).is_some();
        self.snapshots.remove(order_id).is_some() || had_events
    }

    /// Forget commands committed before `cutoff`, returns how many were dropped
    pub fn prune_processed_commands(&self, cutoff: i64) -> usize {
        let before = self.processed_commands.len();
        self.processed_commands
            .retain(|_, committed_at| *committed_at >= cutoff);
        before.saturating_sub(self.processed_commands.len())
    }
}
