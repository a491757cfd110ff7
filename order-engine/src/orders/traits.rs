//! Command / event processing traits
//!
//! - [`CommandHandler`]: validates a command against the current snapshot and
//!   produces events. Never mutates state.
//! - [`EventApplier`]: folds one event into a snapshot. Pure and deterministic,
//!   so replaying the event stream always reproduces the stored snapshot.

use enum_dispatch::enum_dispatch;
use thiserror::Error;

use super::appliers::{
    EventAction, ItemStateChangedApplier, OrderPlacedApplier, PaymentValidatedApplier,
    StatusAdvancedApplier,
};
use super::storage::OrderStorage;
use shared::order::{KitchenState, OrderEvent, OrderSnapshot, Stage, Transition};

/// Errors raised while validating a command
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Order already exists: {0}")]
    OrderAlreadyExists(String),

    #[error("Item not found: {0}")]
    ItemNotFound(usize),

    #[error("Illegal transition: cannot apply {requested} at stage {current}")]
    IllegalTransition { current: Stage, requested: Transition },

    #[error("Illegal kitchen transition for item {item_index}: {from} -> {to}")]
    IllegalItemTransition {
        item_index: usize,
        from: KitchenState,
        to: KitchenState,
    },

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

/// Metadata copied from the command envelope into every event
#[derive(Debug, Clone)]
pub struct CommandMetadata {
    pub command_id: String,
    pub operator_id: i64,
    pub operator_name: String,
    pub timestamp: i64,
}

/// Read access to storage plus sequence allocation for one command
pub struct CommandContext<'a> {
    storage: &'a OrderStorage,
}

impl<'a> CommandContext<'a> {
    pub fn new(storage: &'a OrderStorage) -> Self {
        Self { storage }
    }

    /// Load a snapshot clone, failing with `OrderNotFound`
    pub fn load_snapshot(&self, order_id: &str) -> Result<OrderSnapshot, OrderError> {
        self.storage
            .get_snapshot(order_id)
            .ok_or_else(|| OrderError::OrderNotFound(order_id.to_string()))
    }

    pub fn order_exists(&self, order_id: &str) -> bool {
        self.storage.contains(order_id)
    }

    /// Allocate the next global event sequence
    pub fn next_sequence(&mut self) -> u64 {
        self.storage.next_sequence()
    }
}

/// Command handler - turns a validated command into events
pub trait CommandHandler {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError>;
}

/// Event applier - folds an event into a snapshot
#[enum_dispatch]
pub trait EventApplier {
    fn apply(&self, snapshot: &mut OrderSnapshot, event: &OrderEvent);
}
