//! Server Errors
//!
//! Startup and lifecycle errors; request-level errors live in
//! [`crate::utils::AppError`].

use thiserror::Error;

use crate::db::RepoError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(#[from] RepoError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ServerError>;
