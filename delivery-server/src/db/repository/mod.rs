//! Repository Module
//!
//! SurrealDB-backed implementations of the store traits. Records carry a
//! `RecordId`; the conversion to the domain models' opaque string ids
//! happens at this boundary and nowhere else.

pub mod driver;
pub mod order;
pub mod restaurant;

pub use driver::DriverRepository;
pub use order::OrderRepository;
pub use restaurant::RestaurantRepository;

use std::future::Future;
use std::path::Path;
use std::time::Duration;

use serde::Serialize;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

use super::{RepoError, RepoResult};

/// Open the embedded database at `data_dir`
pub async fn open_database(data_dir: &Path) -> RepoResult<Surreal<Db>> {
    let db = Surreal::new::<RocksDb>(data_dir).await?;
    db.use_ns("delivery").use_db("delivery").await?;
    Ok(db)
}

/// Base repository with database reference and call timeout
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
    timeout: Duration,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>, timeout: Duration) -> Self {
        Self { db, timeout }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }

    /// Run a store call under the configured timeout
    ///
    /// A hung database call must not block the request forever; timeouts
    /// surface as [`RepoError::Unavailable`] so the caller can retry.
    pub async fn bounded<T, F>(&self, fut: F) -> RepoResult<T>
    where
        F: Future<Output = RepoResult<T>>,
    {
        tokio::time::timeout(self.timeout, fut)
            .await
            .map_err(|_| RepoError::Unavailable("store call timed out".to_string()))?
    }
}

/// Serialize a record for `CONTENT`, dropping the `id` field
///
/// The record id is supplied via `type::thing` in the query itself; a
/// string `id` inside the content would clash with it.
pub(crate) fn content_without_id<T: Serialize>(value: &T) -> RepoResult<serde_json::Value> {
    let mut v = serde_json::to_value(value).map_err(|e| RepoError::Database(e.to_string()))?;
    if let Some(obj) = v.as_object_mut() {
        obj.remove("id");
    }
    Ok(v)
}
