//! Database Module
//!
//! Store collaborator interfaces plus their two implementations:
//!
//! - [`repository`] — embedded SurrealDB, the production backend
//! - [`memory`] — in-memory store for tests and the `memory` backend mode
//!
//! Every order/driver call is scoped by `restaurant_id`; no store method
//! can read or write another tenant's rows.

pub mod memory;
pub mod models;
pub mod repository;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use models::{
    Driver, DriverStatus, DriverUpdate, Order, OrderHistoryEntry, OrderStatus, OrderUpdate,
    Restaurant, RestaurantSettingsUpdate,
};

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Store call failed or exceeded its bounded timeout
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Order store collaborator
///
/// `update_order_guarded` carries the optimistic-concurrency contract: the
/// patch applies only while the order still holds `expected` status, and a
/// miss comes back as `Ok(None)` so the engine can re-read and retry.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn insert_order(&self, order: &Order) -> RepoResult<()>;

    async fn get_order(&self, restaurant_id: &str, id: &str) -> RepoResult<Option<Order>>;

    /// Lookup by order number alone — used by the public tracking page,
    /// which has no tenant context. Order numbers are globally unique, so
    /// this can never resolve another tenant's order.
    async fn get_order_by_number(&self, order_number: &str) -> RepoResult<Option<Order>>;

    async fn list_orders(
        &self,
        restaurant_id: &str,
        status: Option<OrderStatus>,
    ) -> RepoResult<Vec<Order>>;

    /// All non-terminal orders for the tenant, newest first
    async fn list_active_orders(&self, restaurant_id: &str) -> RepoResult<Vec<Order>>;

    async fn count_orders(&self, restaurant_id: &str) -> RepoResult<u64>;

    /// Conditional update: applies `patch` iff the order exists in this
    /// tenant and its status still equals `expected`. Returns the updated
    /// order, or `None` when the guard missed.
    async fn update_order_guarded(
        &self,
        restaurant_id: &str,
        id: &str,
        expected: OrderStatus,
        patch: OrderUpdate,
    ) -> RepoResult<Option<Order>>;

    async fn append_history(&self, entry: &OrderHistoryEntry) -> RepoResult<()>;

    async fn list_history(&self, order_id: &str) -> RepoResult<Vec<OrderHistoryEntry>>;
}

/// Driver store collaborator
#[async_trait]
pub trait DriverStore: Send + Sync {
    async fn insert_driver(&self, driver: &Driver) -> RepoResult<()>;

    async fn get_driver(&self, restaurant_id: &str, id: &str) -> RepoResult<Option<Driver>>;

    async fn list_drivers(
        &self,
        restaurant_id: &str,
        status: Option<DriverStatus>,
        include_inactive: bool,
    ) -> RepoResult<Vec<Driver>>;

    async fn update_driver(
        &self,
        restaurant_id: &str,
        id: &str,
        patch: DriverUpdate,
    ) -> RepoResult<Option<Driver>>;

    /// Conditional status flip — same CAS contract as the order update.
    /// Binding reserves `available → busy`; release undoes it.
    async fn update_driver_status_guarded(
        &self,
        restaurant_id: &str,
        id: &str,
        expected: DriverStatus,
        new: DriverStatus,
    ) -> RepoResult<Option<Driver>>;

    async fn set_active(
        &self,
        restaurant_id: &str,
        id: &str,
        active: bool,
    ) -> RepoResult<Option<Driver>>;

    /// Increment the driver's cumulative delivery counter
    async fn record_delivery(&self, restaurant_id: &str, id: &str) -> RepoResult<Option<Driver>>;

    /// Fold a 0–5 rating into the running average
    async fn record_rating(
        &self,
        restaurant_id: &str,
        id: &str,
        rating: f64,
    ) -> RepoResult<Option<Driver>>;
}

/// Restaurant store collaborator
#[async_trait]
pub trait RestaurantStore: Send + Sync {
    async fn insert_restaurant(&self, restaurant: &Restaurant) -> RepoResult<()>;

    async fn get_restaurant(&self, id: &str) -> RepoResult<Option<Restaurant>>;

    async fn update_settings(
        &self,
        id: &str,
        patch: RestaurantSettingsUpdate,
    ) -> RepoResult<Option<Restaurant>>;
}

/// Bundle of the three tenant-partitioned stores
#[derive(Clone)]
pub struct Stores {
    pub orders: Arc<dyn OrderStore>,
    pub drivers: Arc<dyn DriverStore>,
    pub restaurants: Arc<dyn RestaurantStore>,
}

impl Stores {
    /// Open the SurrealDB-backed stores at `data_dir`
    ///
    /// Every call made through the returned stores is bounded by `timeout`
    /// and surfaces as [`RepoError::Unavailable`] when exceeded.
    pub async fn open(data_dir: &Path, timeout: Duration) -> RepoResult<Self> {
        let db = repository::open_database(data_dir).await?;
        tracing::info!(path = %data_dir.display(), "Database connection established");
        Ok(Self {
            orders: Arc::new(repository::OrderRepository::new(db.clone(), timeout)),
            drivers: Arc::new(repository::DriverRepository::new(db.clone(), timeout)),
            restaurants: Arc::new(repository::RestaurantRepository::new(db, timeout)),
        })
    }

    /// Purely in-memory stores — `DB_BACKEND=memory` mode and unit tests
    pub fn in_memory() -> Self {
        let store = Arc::new(memory::MemoryStore::new());
        Self {
            orders: store.clone(),
            drivers: store.clone(),
            restaurants: store,
        }
    }
}
