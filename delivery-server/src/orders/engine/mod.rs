//! Order Lifecycle Engine
//!
//! Validates and applies status transitions against the stores.
//!
//! # Transition Flow
//!
//! ```text
//! apply_transition(order_id, target, driver?, notes?)
//!     ├─ 1. Tenant-scoped order read
//!     ├─ 2. Legality check (successor table, terminal guard)
//!     ├─ 3. Driver reservation when target binds a driver (CAS available→busy)
//!     ├─ 4. Conditional order update (CAS on current status)
//!     │     └─ miss: undo reservation, fresh read, retry once, then Conflict
//!     ├─ 5. History append (best-effort — order state is authoritative,
//!     │     history is audit; failure is logged, never rolled back)
//!     └─ 6. Terminal cleanup (release driver, bump delivery counter)
//! ```
//!
//! The history-append asymmetry is deliberate: at most one orphaned
//! history row per failed append, and the order row never lies.

#[cfg(test)]
mod tests;

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use super::error::{LifecycleError, LifecycleResult};
use super::money;
use crate::auth::TenantContext;
use crate::db::models::{
    Driver, DriverStatus, Order, OrderHistoryEntry, OrderItem, OrderPriority, OrderStatus,
    OrderUpdate,
};
use crate::db::{DriverStore, OrderStore, RestaurantStore, Stores};

/// Fixed delivery window added on top of the prep-time estimate (minutes).
/// No real dispatch timing exists; this is a display estimate.
const DELIVERY_WINDOW_MINS: i64 = 30;

/// Order line item as submitted at creation
#[derive(Debug, Clone, Deserialize)]
pub struct OrderItemInput {
    pub name: String,
    pub quantity: i32,
    pub unit_price: f64,
}

/// Create order payload
#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrderInput {
    #[validate(length(min = 1, max = 100))]
    pub customer_name: String,
    #[validate(length(min = 1, max = 32))]
    pub customer_phone: String,
    #[validate(email)]
    pub customer_email: Option<String>,
    #[validate(length(min = 1, max = 500))]
    pub delivery_address: String,
    #[validate(length(max = 500))]
    pub delivery_notes: Option<String>,
    pub items: Vec<OrderItemInput>,
    /// Overrides the restaurant's default fee when present
    pub delivery_fee: Option<f64>,
    #[serde(default)]
    pub priority: OrderPriority,
}

/// The core state machine driver
///
/// Holds shared references to the store collaborators; cloning is cheap.
#[derive(Clone)]
pub struct LifecycleEngine {
    orders: Arc<dyn OrderStore>,
    drivers: Arc<dyn DriverStore>,
    restaurants: Arc<dyn RestaurantStore>,
}

impl LifecycleEngine {
    pub fn new(stores: &Stores) -> Self {
        Self {
            orders: stores.orders.clone(),
            drivers: stores.drivers.clone(),
            restaurants: stores.restaurants.clone(),
        }
    }

    /// Create a new order in `pending` state
    ///
    /// Computes totals with decimal precision, generates the globally
    /// unique order number and both time estimates, and appends the
    /// initial history entry.
    pub async fn create_order(
        &self,
        ctx: &TenantContext,
        input: CreateOrderInput,
    ) -> LifecycleResult<Order> {
        input
            .validate()
            .map_err(|e| LifecycleError::Validation(e.to_string()))?;
        if input.items.is_empty() {
            return Err(LifecycleError::Validation(
                "order must contain at least one item".to_string(),
            ));
        }

        let restaurant = self
            .restaurants
            .get_restaurant(&ctx.restaurant_id)
            .await?
            .ok_or_else(|| {
                LifecycleError::NotFound(format!("Restaurant {} not found", ctx.restaurant_id))
            })?;

        let mut items = Vec::with_capacity(input.items.len());
        for item in &input.items {
            money::validate_item(item)?;
            items.push(OrderItem {
                name: item.name.trim().to_string(),
                quantity: item.quantity,
                unit_price: item.unit_price,
                line_total: money::line_total(item.unit_price, item.quantity),
            });
        }

        let delivery_fee = input.delivery_fee.unwrap_or(restaurant.delivery_fee);
        if !delivery_fee.is_finite() || delivery_fee < 0.0 {
            return Err(LifecycleError::Validation(format!(
                "delivery_fee must be non-negative, got {}",
                delivery_fee
            )));
        }
        let (subtotal, total_amount) = money::order_totals(&items, delivery_fee);

        let now = Utc::now();
        let order_number = self.next_order_number(ctx, now).await?;
        let estimated_ready_at = now + Duration::minutes(restaurant.average_prep_time);

        let order = Order {
            // Hyphen-free so the id stays a plain record key in the store
            id: Uuid::new_v4().simple().to_string(),
            restaurant_id: ctx.restaurant_id.clone(),
            order_number,
            customer_name: input.customer_name,
            customer_phone: input.customer_phone,
            customer_email: input.customer_email,
            delivery_address: input.delivery_address,
            delivery_notes: input.delivery_notes,
            items,
            subtotal,
            delivery_fee,
            total_amount,
            status: OrderStatus::Pending,
            priority: input.priority,
            driver_id: None,
            created_at: now,
            confirmed_at: None,
            ready_at: None,
            assigned_at: None,
            picked_up_at: None,
            delivered_at: None,
            estimated_ready_at,
            estimated_delivery_at: estimated_ready_at + Duration::minutes(DELIVERY_WINDOW_MINS),
        };

        self.orders.insert_order(&order).await?;
        self.append_history(&order.id, OrderStatus::Pending, None, now)
            .await;

        tracing::info!(
            order_id = %order.id,
            order_number = %order.order_number,
            total = order.total_amount,
            "Order created"
        );
        Ok(order)
    }

    /// Apply a status transition
    ///
    /// `driver_id` is required exactly when the target status binds a
    /// driver (`assigned`). Errors reject without mutation; a lost CAS
    /// race is retried once with a fresh read before surfacing
    /// [`LifecycleError::Conflict`].
    pub async fn apply_transition(
        &self,
        ctx: &TenantContext,
        order_id: &str,
        target: OrderStatus,
        driver_id: Option<&str>,
        notes: Option<String>,
    ) -> LifecycleResult<Order> {
        let mut order = self.get_order(ctx, order_id).await?;
        let mut attempts = 0;

        loop {
            if order.status.is_terminal() {
                return Err(LifecycleError::OrderAlreadyTerminal(order.id));
            }
            if !order.status.can_transition_to(target) {
                return Err(LifecycleError::InvalidTransition {
                    from: order.status,
                    to: target,
                });
            }

            let now = Utc::now();
            let mut patch = transition_patch(target, now);

            // Reserve the driver before touching the order so two orders
            // can never end up bound to the same driver
            let mut reserved: Option<Driver> = None;
            if target.requires_driver() {
                let driver_id = driver_id.ok_or(LifecycleError::DriverRequired(target))?;
                let driver = self.reserve_driver(ctx, driver_id).await?;
                patch.driver_id = Some(driver.id.clone());
                reserved = Some(driver);
            }

            match self
                .orders
                .update_order_guarded(&ctx.restaurant_id, order_id, order.status, patch)
                .await?
            {
                Some(updated) => {
                    self.append_history(order_id, target, notes, now).await;
                    if target.is_terminal() {
                        self.finish_delivery(ctx, &updated, target).await;
                    }
                    tracing::info!(
                        order_id = %updated.id,
                        from = %order.status,
                        to = %target,
                        "Order transition applied"
                    );
                    return Ok(updated);
                }
                None => {
                    // Lost the race: undo the reservation, re-read, retry once
                    if let Some(driver) = reserved {
                        self.unreserve_driver(ctx, &driver).await;
                    }
                    attempts += 1;
                    if attempts > 1 {
                        return Err(LifecycleError::Conflict(format!(
                            "order {} was modified concurrently",
                            order_id
                        )));
                    }
                    tracing::debug!(order_id, "Transition guard missed, retrying with fresh read");
                    order = self.get_order(ctx, order_id).await?;
                }
            }
        }
    }

    /// Cancel an order — a transition like any other, permitted from any
    /// non-terminal state. Does not reverse prior side effects beyond the
    /// terminal driver release.
    pub async fn cancel_order(
        &self,
        ctx: &TenantContext,
        order_id: &str,
        notes: Option<String>,
    ) -> LifecycleResult<Order> {
        self.apply_transition(ctx, order_id, OrderStatus::Cancelled, None, notes)
            .await
    }

    pub async fn get_order(&self, ctx: &TenantContext, order_id: &str) -> LifecycleResult<Order> {
        self.orders
            .get_order(&ctx.restaurant_id, order_id)
            .await?
            .ok_or_else(|| LifecycleError::NotFound(format!("Order {} not found", order_id)))
    }

    pub async fn list_history(
        &self,
        ctx: &TenantContext,
        order_id: &str,
    ) -> LifecycleResult<Vec<OrderHistoryEntry>> {
        // Scope check first so history ids cannot be probed cross-tenant
        let order = self.get_order(ctx, order_id).await?;
        Ok(self.orders.list_history(&order.id).await?)
    }

    /// Globally unique human-readable order number
    ///
    /// `DLV{yyyymmdd}{seq}-{suffix}`: the sequence counts the tenant's own
    /// orders for readability; the random suffix disambiguates across
    /// tenants (the tracking lookup is tenant-less) and across concurrent
    /// creates reading the same count.
    async fn next_order_number(
        &self,
        ctx: &TenantContext,
        now: DateTime<Utc>,
    ) -> LifecycleResult<String> {
        let count = self.orders.count_orders(&ctx.restaurant_id).await?;
        let suffix = Uuid::new_v4().simple().to_string();
        Ok(format!(
            "DLV{}{}-{}",
            now.format("%Y%m%d"),
            10000 + count + 1,
            &suffix[..6],
        ))
    }

    async fn reserve_driver(
        &self,
        ctx: &TenantContext,
        driver_id: &str,
    ) -> LifecycleResult<Driver> {
        let driver = self
            .drivers
            .get_driver(&ctx.restaurant_id, driver_id)
            .await?
            .ok_or_else(|| LifecycleError::NotFound(format!("Driver {} not found", driver_id)))?;
        if !driver.is_active {
            return Err(LifecycleError::DriverUnavailable(format!(
                "driver {} is inactive",
                driver.name
            )));
        }
        if driver.status != DriverStatus::Available {
            return Err(LifecycleError::DriverUnavailable(format!(
                "driver {} is {}",
                driver.name, driver.status
            )));
        }
        self.drivers
            .update_driver_status_guarded(
                &ctx.restaurant_id,
                driver_id,
                DriverStatus::Available,
                DriverStatus::Busy,
            )
            .await?
            .ok_or_else(|| {
                LifecycleError::DriverUnavailable(format!(
                    "driver {} was taken by a concurrent assignment",
                    driver.name
                ))
            })
    }

    async fn unreserve_driver(&self, ctx: &TenantContext, driver: &Driver) {
        let result = self
            .drivers
            .update_driver_status_guarded(
                &ctx.restaurant_id,
                &driver.id,
                DriverStatus::Busy,
                DriverStatus::Available,
            )
            .await;
        if let Err(e) = result {
            tracing::error!(driver_id = %driver.id, error = %e, "Failed to undo driver reservation");
        }
    }

    /// Terminal cleanup: release the bound driver back to `available` and,
    /// on delivery, bump their cumulative counter. Best-effort — the order
    /// is already terminal and stays authoritative.
    async fn finish_delivery(&self, ctx: &TenantContext, order: &Order, target: OrderStatus) {
        let Some(driver_id) = &order.driver_id else {
            return;
        };

        match self
            .drivers
            .update_driver_status_guarded(
                &ctx.restaurant_id,
                driver_id,
                DriverStatus::Busy,
                DriverStatus::Available,
            )
            .await
        {
            Ok(Some(_)) => {
                tracing::info!(driver_id = %driver_id, order_id = %order.id, "Driver released");
            }
            Ok(None) => {
                // Staff may have toggled the driver meanwhile; nothing to undo
                tracing::debug!(driver_id = %driver_id, "Driver not busy at release time");
            }
            Err(e) => {
                tracing::error!(driver_id = %driver_id, error = %e, "Failed to release driver");
            }
        }

        if target == OrderStatus::Delivered
            && let Err(e) = self.drivers.record_delivery(&ctx.restaurant_id, driver_id).await
        {
            tracing::error!(driver_id = %driver_id, error = %e, "Failed to record delivery");
        }
    }

    /// Append the audit entry for an entered status. Best-effort: a failed
    /// append is logged and never rolls back the order mutation.
    async fn append_history(
        &self,
        order_id: &str,
        status: OrderStatus,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) {
        let entry = OrderHistoryEntry {
            id: Uuid::new_v4().simple().to_string(),
            order_id: order_id.to_string(),
            status,
            notes: notes.unwrap_or_else(|| status.default_note().to_string()),
            created_at: now,
        };
        if let Err(e) = self.orders.append_history(&entry).await {
            tracing::error!(order_id, status = %status, error = %e, "Failed to append history entry");
        }
    }
}

/// Build the conditional-update patch for entering `target`
///
/// Exactly the timestamp field belonging to the entered stage is set;
/// stages without a dedicated field (`preparing`, `out_for_delivery`,
/// `cancelled`) are recorded via history only.
fn transition_patch(target: OrderStatus, now: DateTime<Utc>) -> OrderUpdate {
    let mut patch = OrderUpdate {
        status: Some(target),
        ..OrderUpdate::default()
    };
    match target {
        OrderStatus::Confirmed => patch.confirmed_at = Some(now),
        OrderStatus::Ready => patch.ready_at = Some(now),
        OrderStatus::Assigned => patch.assigned_at = Some(now),
        OrderStatus::PickedUp => patch.picked_up_at = Some(now),
        OrderStatus::Delivered => patch.delivered_at = Some(now),
        OrderStatus::Pending
        | OrderStatus::Preparing
        | OrderStatus::OutForDelivery
        | OrderStatus::Cancelled => {}
    }
    patch
}
