//! Restaurant Repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

use super::{BaseRepository, content_without_id};
use crate::db::models::{Restaurant, RestaurantSettingsUpdate};
use crate::db::{RepoError, RepoResult, RestaurantStore};

#[derive(Clone)]
pub struct RestaurantRepository {
    base: BaseRepository,
}

#[derive(Debug, Serialize, Deserialize)]
struct RestaurantRecord {
    id: RecordId,
    name: String,
    average_prep_time: i64,
    delivery_fee: f64,
    created_at: DateTime<Utc>,
}

impl From<RestaurantRecord> for Restaurant {
    fn from(r: RestaurantRecord) -> Self {
        Restaurant {
            id: r.id.key().to_string(),
            name: r.name,
            average_prep_time: r.average_prep_time,
            delivery_fee: r.delivery_fee,
            created_at: r.created_at,
        }
    }
}

impl RestaurantRepository {
    pub fn new(db: Surreal<Db>, timeout: Duration) -> Self {
        Self {
            base: BaseRepository::new(db, timeout),
        }
    }

    fn db(&self) -> &Surreal<Db> {
        self.base.db()
    }
}

#[async_trait]
impl RestaurantStore for RestaurantRepository {
    async fn insert_restaurant(&self, restaurant: &Restaurant) -> RepoResult<()> {
        let data = content_without_id(restaurant)?;
        let id = restaurant.id.clone();
        self.base
            .bounded(async {
                self.db()
                    .query("CREATE type::thing('restaurant', $id) CONTENT $data RETURN NONE")
                    .bind(("id", id))
                    .bind(("data", data))
                    .await?
                    .check()?;
                Ok(())
            })
            .await
    }

    async fn get_restaurant(&self, id: &str) -> RepoResult<Option<Restaurant>> {
        let id = id.to_string();
        self.base
            .bounded(async {
                let records: Vec<RestaurantRecord> = self
                    .db()
                    .query("SELECT * FROM restaurant WHERE id = type::thing('restaurant', $id)")
                    .bind(("id", id))
                    .await?
                    .take(0)?;
                Ok(records.into_iter().next().map(Restaurant::from))
            })
            .await
    }

    async fn update_settings(
        &self,
        id: &str,
        patch: RestaurantSettingsUpdate,
    ) -> RepoResult<Option<Restaurant>> {
        let mut sets: Vec<&'static str> = Vec::new();
        let mut binds: Vec<(&'static str, serde_json::Value)> = Vec::new();

        if let Some(name) = &patch.name {
            sets.push("name = $name");
            binds.push((
                "name",
                serde_json::to_value(name).map_err(|e| RepoError::Database(e.to_string()))?,
            ));
        }
        if let Some(prep) = patch.average_prep_time {
            sets.push("average_prep_time = $average_prep_time");
            binds.push((
                "average_prep_time",
                serde_json::to_value(prep).map_err(|e| RepoError::Database(e.to_string()))?,
            ));
        }
        if let Some(fee) = patch.delivery_fee {
            sets.push("delivery_fee = $delivery_fee");
            binds.push((
                "delivery_fee",
                serde_json::to_value(fee).map_err(|e| RepoError::Database(e.to_string()))?,
            ));
        }

        if sets.is_empty() {
            return self.get_restaurant(id).await;
        }

        let sql = format!(
            "UPDATE restaurant SET {} \
             WHERE id = type::thing('restaurant', $id) RETURN AFTER",
            sets.join(", ")
        );
        let id = id.to_string();
        self.base
            .bounded(async {
                let mut query = self.db().query(sql).bind(("id", id));
                for (key, value) in binds {
                    query = query.bind((key, value));
                }
                let records: Vec<RestaurantRecord> = query.await?.take(0)?;
                Ok(records.into_iter().next().map(Restaurant::from))
            })
            .await
    }
}
