//! Order Repository
//!
//! All order reads and the transition write path. The conditional update
//! keys on `status = $expected` so two concurrent transitions can never
//! both land on the same row.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

use super::{BaseRepository, content_without_id};
use crate::db::models::{
    Order, OrderHistoryEntry, OrderItem, OrderPriority, OrderStatus, OrderUpdate,
};
use crate::db::{OrderStore, RepoResult};

const TERMINAL_FILTER: &str = "status NOT IN ['delivered', 'cancelled']";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

/// Stored order row — identical to [`Order`] except for the record id
#[derive(Debug, Serialize, Deserialize)]
struct OrderRecord {
    id: RecordId,
    restaurant_id: String,
    order_number: String,
    customer_name: String,
    customer_phone: String,
    customer_email: Option<String>,
    delivery_address: String,
    delivery_notes: Option<String>,
    items: Vec<OrderItem>,
    subtotal: f64,
    delivery_fee: f64,
    total_amount: f64,
    status: OrderStatus,
    priority: OrderPriority,
    driver_id: Option<String>,
    created_at: DateTime<Utc>,
    confirmed_at: Option<DateTime<Utc>>,
    ready_at: Option<DateTime<Utc>>,
    assigned_at: Option<DateTime<Utc>>,
    picked_up_at: Option<DateTime<Utc>>,
    delivered_at: Option<DateTime<Utc>>,
    estimated_ready_at: DateTime<Utc>,
    estimated_delivery_at: DateTime<Utc>,
}

impl From<OrderRecord> for Order {
    fn from(r: OrderRecord) -> Self {
        Order {
            id: r.id.key().to_string(),
            restaurant_id: r.restaurant_id,
            order_number: r.order_number,
            customer_name: r.customer_name,
            customer_phone: r.customer_phone,
            customer_email: r.customer_email,
            delivery_address: r.delivery_address,
            delivery_notes: r.delivery_notes,
            items: r.items,
            subtotal: r.subtotal,
            delivery_fee: r.delivery_fee,
            total_amount: r.total_amount,
            status: r.status,
            priority: r.priority,
            driver_id: r.driver_id,
            created_at: r.created_at,
            confirmed_at: r.confirmed_at,
            ready_at: r.ready_at,
            assigned_at: r.assigned_at,
            picked_up_at: r.picked_up_at,
            delivered_at: r.delivered_at,
            estimated_ready_at: r.estimated_ready_at,
            estimated_delivery_at: r.estimated_delivery_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct HistoryRecord {
    id: RecordId,
    order_id: String,
    status: OrderStatus,
    notes: String,
    created_at: DateTime<Utc>,
}

impl From<HistoryRecord> for OrderHistoryEntry {
    fn from(r: HistoryRecord) -> Self {
        OrderHistoryEntry {
            id: r.id.key().to_string(),
            order_id: r.order_id,
            status: r.status,
            notes: r.notes,
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CountRow {
    total: u64,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>, timeout: Duration) -> Self {
        Self {
            base: BaseRepository::new(db, timeout),
        }
    }

    fn db(&self) -> &Surreal<Db> {
        self.base.db()
    }

    async fn fetch_orders(
        &self,
        sql: String,
        binds: Vec<(&'static str, serde_json::Value)>,
    ) -> RepoResult<Vec<Order>> {
        let mut query = self.db().query(sql);
        for (key, value) in binds {
            query = query.bind((key, value));
        }
        let records: Vec<OrderRecord> = query.await?.take(0)?;
        let mut orders: Vec<Order> = records.into_iter().map(Order::from).collect();
        // Newest first — dashboard operators scan top-down for triage
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }
}

#[async_trait]
impl OrderStore for OrderRepository {
    async fn insert_order(&self, order: &Order) -> RepoResult<()> {
        let data = content_without_id(order)?;
        let id = order.id.clone();
        self.base
            .bounded(async {
                self.db()
                    .query("CREATE type::thing('order', $id) CONTENT $data RETURN NONE")
                    .bind(("id", id))
                    .bind(("data", data))
                    .await?
                    .check()?;
                Ok(())
            })
            .await
    }

    async fn get_order(&self, restaurant_id: &str, id: &str) -> RepoResult<Option<Order>> {
        let id = id.to_string();
        let rid = restaurant_id.to_string();
        self.base
            .bounded(async {
                let records: Vec<OrderRecord> = self
                    .db()
                    .query(
                        "SELECT * FROM order \
                         WHERE id = type::thing('order', $id) AND restaurant_id = $rid \
                         LIMIT 1",
                    )
                    .bind(("id", id))
                    .bind(("rid", rid))
                    .await?
                    .take(0)?;
                Ok(records.into_iter().next().map(Order::from))
            })
            .await
    }

    async fn get_order_by_number(&self, order_number: &str) -> RepoResult<Option<Order>> {
        let number = order_number.to_string();
        self.base
            .bounded(async {
                let records: Vec<OrderRecord> = self
                    .db()
                    .query("SELECT * FROM order WHERE order_number = $number LIMIT 1")
                    .bind(("number", number))
                    .await?
                    .take(0)?;
                Ok(records.into_iter().next().map(Order::from))
            })
            .await
    }

    async fn list_orders(
        &self,
        restaurant_id: &str,
        status: Option<OrderStatus>,
    ) -> RepoResult<Vec<Order>> {
        let rid = serde_json::to_value(restaurant_id)
            .map_err(|e| crate::db::RepoError::Database(e.to_string()))?;
        let mut sql = "SELECT * FROM order WHERE restaurant_id = $rid".to_string();
        let mut binds = vec![("rid", rid)];
        if let Some(status) = status {
            sql.push_str(" AND status = $status");
            let status = serde_json::to_value(status)
                .map_err(|e| crate::db::RepoError::Database(e.to_string()))?;
            binds.push(("status", status));
        }
        self.base.bounded(self.fetch_orders(sql, binds)).await
    }

    async fn list_active_orders(&self, restaurant_id: &str) -> RepoResult<Vec<Order>> {
        let rid = serde_json::to_value(restaurant_id)
            .map_err(|e| crate::db::RepoError::Database(e.to_string()))?;
        let sql = format!(
            "SELECT * FROM order WHERE restaurant_id = $rid AND {}",
            TERMINAL_FILTER
        );
        self.base
            .bounded(self.fetch_orders(sql, vec![("rid", rid)]))
            .await
    }

    async fn count_orders(&self, restaurant_id: &str) -> RepoResult<u64> {
        let rid = restaurant_id.to_string();
        self.base
            .bounded(async {
                let rows: Vec<CountRow> = self
                    .db()
                    .query(
                        "SELECT count() AS total FROM order \
                         WHERE restaurant_id = $rid GROUP ALL",
                    )
                    .bind(("rid", rid))
                    .await?
                    .take(0)?;
                Ok(rows.into_iter().next().map(|r| r.total).unwrap_or(0))
            })
            .await
    }

    async fn update_order_guarded(
        &self,
        restaurant_id: &str,
        id: &str,
        expected: OrderStatus,
        patch: OrderUpdate,
    ) -> RepoResult<Option<Order>> {
        let mut sets: Vec<&'static str> = Vec::new();
        let mut query_binds: Vec<(&'static str, serde_json::Value)> = Vec::new();

        macro_rules! set_field {
            ($field:ident, $clause:expr) => {
                if let Some(value) = &patch.$field {
                    sets.push($clause);
                    query_binds.push((
                        stringify!($field),
                        serde_json::to_value(value)
                            .map_err(|e| crate::db::RepoError::Database(e.to_string()))?,
                    ));
                }
            };
        }

        set_field!(status, "status = $status");
        set_field!(driver_id, "driver_id = $driver_id");
        set_field!(confirmed_at, "confirmed_at = $confirmed_at");
        set_field!(ready_at, "ready_at = $ready_at");
        set_field!(assigned_at, "assigned_at = $assigned_at");
        set_field!(picked_up_at, "picked_up_at = $picked_up_at");
        set_field!(delivered_at, "delivered_at = $delivered_at");

        if sets.is_empty() {
            return self.get_order(restaurant_id, id).await;
        }

        let sql = format!(
            "UPDATE order SET {} \
             WHERE id = type::thing('order', $id) AND restaurant_id = $rid \
             AND status = $expected RETURN AFTER",
            sets.join(", ")
        );
        let id = id.to_string();
        let rid = restaurant_id.to_string();

        self.base
            .bounded(async {
                let mut query = self
                    .db()
                    .query(sql)
                    .bind(("id", id))
                    .bind(("rid", rid))
                    .bind(("expected", expected));
                for (key, value) in query_binds {
                    query = query.bind((key, value));
                }
                let records: Vec<OrderRecord> = query.await?.take(0)?;
                Ok(records.into_iter().next().map(Order::from))
            })
            .await
    }

    async fn append_history(&self, entry: &OrderHistoryEntry) -> RepoResult<()> {
        let data = content_without_id(entry)?;
        let id = entry.id.clone();
        self.base
            .bounded(async {
                self.db()
                    .query("CREATE type::thing('order_history', $id) CONTENT $data RETURN NONE")
                    .bind(("id", id))
                    .bind(("data", data))
                    .await?
                    .check()?;
                Ok(())
            })
            .await
    }

    async fn list_history(&self, order_id: &str) -> RepoResult<Vec<OrderHistoryEntry>> {
        let oid = order_id.to_string();
        self.base
            .bounded(async {
                let records: Vec<HistoryRecord> = self
                    .db()
                    .query("SELECT * FROM order_history WHERE order_id = $oid")
                    .bind(("oid", oid))
                    .await?
                    .take(0)?;
                let mut entries: Vec<OrderHistoryEntry> =
                    records.into_iter().map(OrderHistoryEntry::from).collect();
                entries.sort_by(|a, b| a.created_at.cmp(&b.created_at));
                Ok(entries)
            })
            .await
    }
}
