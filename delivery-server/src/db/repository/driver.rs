//! Driver Repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

use super::{BaseRepository, content_without_id};
use crate::db::models::{Driver, DriverStatus, DriverUpdate, VehicleType};
use crate::db::{DriverStore, RepoError, RepoResult};

#[derive(Clone)]
pub struct DriverRepository {
    base: BaseRepository,
}

#[derive(Debug, Serialize, Deserialize)]
struct DriverRecord {
    id: RecordId,
    restaurant_id: String,
    name: String,
    phone: String,
    email: Option<String>,
    vehicle_type: VehicleType,
    license_plate: Option<String>,
    status: DriverStatus,
    is_active: bool,
    total_deliveries: i64,
    average_rating: f64,
    total_rating_count: i64,
    created_at: DateTime<Utc>,
}

impl From<DriverRecord> for Driver {
    fn from(r: DriverRecord) -> Self {
        Driver {
            id: r.id.key().to_string(),
            restaurant_id: r.restaurant_id,
            name: r.name,
            phone: r.phone,
            email: r.email,
            vehicle_type: r.vehicle_type,
            license_plate: r.license_plate,
            status: r.status,
            is_active: r.is_active,
            total_deliveries: r.total_deliveries,
            average_rating: r.average_rating,
            total_rating_count: r.total_rating_count,
            created_at: r.created_at,
        }
    }
}

impl DriverRepository {
    pub fn new(db: Surreal<Db>, timeout: Duration) -> Self {
        Self {
            base: BaseRepository::new(db, timeout),
        }
    }

    fn db(&self) -> &Surreal<Db> {
        self.base.db()
    }

    /// Single-driver update sharing the bounded/take/convert plumbing
    async fn update_one(
        &self,
        sql: String,
        binds: Vec<(&'static str, serde_json::Value)>,
    ) -> RepoResult<Option<Driver>> {
        self.base
            .bounded(async {
                let mut query = self.db().query(sql);
                for (key, value) in binds {
                    query = query.bind((key, value));
                }
                let records: Vec<DriverRecord> = query.await?.take(0)?;
                Ok(records.into_iter().next().map(Driver::from))
            })
            .await
    }
}

fn to_value<T: serde::Serialize>(v: &T) -> RepoResult<serde_json::Value> {
    serde_json::to_value(v).map_err(|e| RepoError::Database(e.to_string()))
}

#[async_trait]
impl DriverStore for DriverRepository {
    async fn insert_driver(&self, driver: &Driver) -> RepoResult<()> {
        let data = content_without_id(driver)?;
        let id = driver.id.clone();
        self.base
            .bounded(async {
                self.db()
                    .query("CREATE type::thing('driver', $id) CONTENT $data RETURN NONE")
                    .bind(("id", id))
                    .bind(("data", data))
                    .await?
                    .check()?;
                Ok(())
            })
            .await
    }

    async fn get_driver(&self, restaurant_id: &str, id: &str) -> RepoResult<Option<Driver>> {
        let id = id.to_string();
        let rid = restaurant_id.to_string();
        self.base
            .bounded(async {
                let records: Vec<DriverRecord> = self
                    .db()
                    .query(
                        "SELECT * FROM driver \
                         WHERE id = type::thing('driver', $id) AND restaurant_id = $rid \
                         LIMIT 1",
                    )
                    .bind(("id", id))
                    .bind(("rid", rid))
                    .await?
                    .take(0)?;
                Ok(records.into_iter().next().map(Driver::from))
            })
            .await
    }

    async fn list_drivers(
        &self,
        restaurant_id: &str,
        status: Option<DriverStatus>,
        include_inactive: bool,
    ) -> RepoResult<Vec<Driver>> {
        let rid = restaurant_id.to_string();
        let mut sql = "SELECT * FROM driver WHERE restaurant_id = $rid".to_string();
        if !include_inactive {
            sql.push_str(" AND is_active = true");
        }
        if status.is_some() {
            sql.push_str(" AND status = $status");
        }
        self.base
            .bounded(async {
                let mut query = self.db().query(sql).bind(("rid", rid));
                if let Some(status) = status {
                    query = query.bind(("status", status));
                }
                let records: Vec<DriverRecord> = query.await?.take(0)?;
                let mut drivers: Vec<Driver> = records.into_iter().map(Driver::from).collect();
                drivers.sort_by(|a, b| a.name.cmp(&b.name));
                Ok(drivers)
            })
            .await
    }

    async fn update_driver(
        &self,
        restaurant_id: &str,
        id: &str,
        patch: DriverUpdate,
    ) -> RepoResult<Option<Driver>> {
        let mut sets: Vec<&'static str> = Vec::new();
        let mut binds: Vec<(&'static str, serde_json::Value)> = vec![
            ("id", to_value(&id)?),
            ("rid", to_value(&restaurant_id)?),
        ];

        if let Some(name) = &patch.name {
            sets.push("name = $name");
            binds.push(("name", to_value(name)?));
        }
        if let Some(phone) = &patch.phone {
            sets.push("phone = $phone");
            binds.push(("phone", to_value(phone)?));
        }
        if let Some(email) = &patch.email {
            sets.push("email = $email");
            binds.push(("email", to_value(email)?));
        }
        if let Some(vehicle_type) = &patch.vehicle_type {
            sets.push("vehicle_type = $vehicle_type");
            binds.push(("vehicle_type", to_value(vehicle_type)?));
        }
        if let Some(license_plate) = &patch.license_plate {
            sets.push("license_plate = $license_plate");
            binds.push(("license_plate", to_value(license_plate)?));
        }

        if sets.is_empty() {
            return self.get_driver(restaurant_id, id).await;
        }

        let sql = format!(
            "UPDATE driver SET {} \
             WHERE id = type::thing('driver', $id) AND restaurant_id = $rid \
             RETURN AFTER",
            sets.join(", ")
        );
        self.update_one(sql, binds).await
    }

    async fn update_driver_status_guarded(
        &self,
        restaurant_id: &str,
        id: &str,
        expected: DriverStatus,
        new: DriverStatus,
    ) -> RepoResult<Option<Driver>> {
        let sql = "UPDATE driver SET status = $new \
                   WHERE id = type::thing('driver', $id) AND restaurant_id = $rid \
                   AND status = $expected RETURN AFTER"
            .to_string();
        let binds = vec![
            ("id", to_value(&id)?),
            ("rid", to_value(&restaurant_id)?),
            ("expected", to_value(&expected)?),
            ("new", to_value(&new)?),
        ];
        self.update_one(sql, binds).await
    }

    async fn set_active(
        &self,
        restaurant_id: &str,
        id: &str,
        active: bool,
    ) -> RepoResult<Option<Driver>> {
        let sql = "UPDATE driver SET is_active = $active \
                   WHERE id = type::thing('driver', $id) AND restaurant_id = $rid \
                   RETURN AFTER"
            .to_string();
        let binds = vec![
            ("id", to_value(&id)?),
            ("rid", to_value(&restaurant_id)?),
            ("active", to_value(&active)?),
        ];
        self.update_one(sql, binds).await
    }

    async fn record_delivery(&self, restaurant_id: &str, id: &str) -> RepoResult<Option<Driver>> {
        let sql = "UPDATE driver SET total_deliveries += 1 \
                   WHERE id = type::thing('driver', $id) AND restaurant_id = $rid \
                   RETURN AFTER"
            .to_string();
        let binds = vec![("id", to_value(&id)?), ("rid", to_value(&restaurant_id)?)];
        self.update_one(sql, binds).await
    }

    async fn record_rating(
        &self,
        restaurant_id: &str,
        id: &str,
        rating: f64,
    ) -> RepoResult<Option<Driver>> {
        // SET clauses apply in order: fold the average against the old
        // count, then bump the count
        let sql = "UPDATE driver SET \
                   average_rating = ((average_rating * total_rating_count) + $rating) \
                       / (total_rating_count + 1), \
                   total_rating_count += 1 \
                   WHERE id = type::thing('driver', $id) AND restaurant_id = $rid \
                   RETURN AFTER"
            .to_string();
        let binds = vec![
            ("id", to_value(&id)?),
            ("rid", to_value(&restaurant_id)?),
            ("rating", to_value(&rating)?),
        ];
        self.update_one(sql, binds).await
    }
}
