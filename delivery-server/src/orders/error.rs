//! Lifecycle errors
//!
//! Domain error taxonomy for the order lifecycle. None of these are
//! retried automatically except `Conflict`, which the engine retries once
//! with a fresh read before surfacing.

use thiserror::Error;

use crate::db::RepoError;
use crate::db::models::OrderStatus;
use crate::utils::AppError;

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Invalid transition: {from} -> {to}")]
    InvalidTransition {
        from: OrderStatus,
        to: OrderStatus,
    },

    #[error("Order {0} is already in a terminal state")]
    OrderAlreadyTerminal(String),

    #[error("Order {id} is not accepting driver assignment (status: {status})")]
    OrderNotAcceptingAssignment { id: String, status: OrderStatus },

    #[error("Transition to {0} requires a driver")]
    DriverRequired(OrderStatus),

    #[error("Driver unavailable: {0}")]
    DriverUnavailable(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Concurrent modification: {0}")]
    Conflict(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Store(#[from] RepoError),
}

pub type LifecycleResult<T> = Result<T, LifecycleError>;

impl From<LifecycleError> for AppError {
    fn from(err: LifecycleError) -> Self {
        match err {
            // Cross-tenant lookups deliberately collapse into the same
            // "not found" as missing rows
            LifecycleError::NotFound(msg) => AppError::NotFound(msg),

            LifecycleError::Conflict(msg) => AppError::Conflict(msg),
            LifecycleError::Validation(msg) => AppError::Validation(msg),
            LifecycleError::DriverRequired(status) => {
                AppError::Validation(format!("transition to {status} requires a driver"))
            }

            // State machine rule violations — non-retryable, the message
            // names the offending rule for display
            err @ (LifecycleError::InvalidTransition { .. }
            | LifecycleError::OrderAlreadyTerminal(_)
            | LifecycleError::OrderNotAcceptingAssignment { .. }
            | LifecycleError::DriverUnavailable(_)) => AppError::BusinessRule(err.to_string()),

            LifecycleError::Store(RepoError::Unavailable(msg)) => AppError::Unavailable(msg),
            LifecycleError::Store(RepoError::NotFound(msg)) => AppError::NotFound(msg),
            LifecycleError::Store(e) => AppError::Database(e.to_string()),
        }
    }
}
