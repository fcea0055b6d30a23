//! Core Module
//!
//! Server assembly: configuration, shared state, error types and the
//! HTTP server lifecycle.

pub mod config;
pub mod error;
pub mod server;
pub mod state;

pub use config::{Config, DbBackend};
pub use error::{Result, ServerError};
pub use server::Server;
pub use state::ServerState;
