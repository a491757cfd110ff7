use super::super::traits::OrderError;
use shared::order::{CommandError, CommandErrorCode, KitchenState, Stage, Transition};
use thiserror::Error;

/// Manager errors
#[derive(Debug, Error)]
pub enum ManagerError {
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

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ManagerError> for CommandError {
    fn from(err: ManagerError) -> Self {
        let code = match &err {
            ManagerError::OrderNotFound(_) => CommandErrorCode::OrderNotFound,
            ManagerError::OrderAlreadyExists(_) => CommandErrorCode::OrderAlreadyExists,
            ManagerError::ItemNotFound(_) => CommandErrorCode::ItemNotFound,
            ManagerError::IllegalTransition { .. } => CommandErrorCode::IllegalTransition,
            ManagerError::IllegalItemTransition { .. } => CommandErrorCode::IllegalItemTransition,
            ManagerError::InvalidOperation(_) => CommandErrorCode::InvalidOperation,
            ManagerError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error while processing command");
                CommandErrorCode::InternalError
            }
        };
        CommandError::new(code, err.to_string())
    }
}

impl From<OrderError> for ManagerError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::OrderNotFound(id) => ManagerError::OrderNotFound(id),
            OrderError::OrderAlreadyExists(id) => ManagerError::OrderAlreadyExists(id),
            OrderError::ItemNotFound(idx) => ManagerError::ItemNotFound(idx),
            OrderError::IllegalTransition { current, requested } => {
                ManagerError::IllegalTransition { current, requested }
            }
            OrderError::IllegalItemTransition {
                item_index,
                from,
                to,
            } => ManagerError::IllegalItemTransition {
                item_index,
                from,
                to,
            },
            OrderError::InvalidOperation(msg) => ManagerError::InvalidOperation(msg),
        }
    }
}

pub type ManagerResult<T> = Result<T, ManagerError>;
