//! Driver Assignment Resolver
//!
//! Driver-side rules around the lifecycle engine: binding at `ready`,
//! manual availability toggles, ratings, and the soft-delete guard.
//! The actual status flip and reservation run through the engine so the
//! one-driver-per-active-order invariant has a single enforcement point.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use super::engine::LifecycleEngine;
use super::error::{LifecycleError, LifecycleResult};
use crate::auth::TenantContext;
use crate::db::models::{
    Driver, DriverCreate, DriverStatus, DriverUpdate, Order, OrderStatus,
};
use crate::db::{DriverStore, OrderStore, Stores};

#[derive(Clone)]
pub struct AssignmentResolver {
    engine: LifecycleEngine,
    drivers: Arc<dyn DriverStore>,
    orders: Arc<dyn OrderStore>,
}

impl AssignmentResolver {
    pub fn new(stores: &Stores, engine: LifecycleEngine) -> Self {
        Self {
            engine,
            drivers: stores.drivers.clone(),
            orders: stores.orders.clone(),
        }
    }

    /// Bind `driver_id` to a `ready` order
    ///
    /// Any other order status rejects with `OrderNotAcceptingAssignment`
    /// before the engine runs; driver validation and the busy flip happen
    /// inside the engine's transition.
    pub async fn assign_driver(
        &self,
        ctx: &TenantContext,
        order_id: &str,
        driver_id: &str,
        notes: Option<String>,
    ) -> LifecycleResult<Order> {
        let order = self.engine.get_order(ctx, order_id).await?;
        if order.status != OrderStatus::Ready {
            return Err(LifecycleError::OrderNotAcceptingAssignment {
                id: order.id,
                status: order.status,
            });
        }
        self.engine
            .apply_transition(ctx, order_id, OrderStatus::Assigned, Some(driver_id), notes)
            .await
    }

    /// Register a new driver, starting `offline`
    pub async fn create_driver(
        &self,
        ctx: &TenantContext,
        input: DriverCreate,
    ) -> LifecycleResult<Driver> {
        input
            .validate()
            .map_err(|e| LifecycleError::Validation(e.to_string()))?;
        let driver = Driver {
            id: Uuid::new_v4().simple().to_string(),
            restaurant_id: ctx.restaurant_id.clone(),
            name: input.name,
            phone: input.phone,
            email: input.email,
            vehicle_type: input.vehicle_type,
            license_plate: input.license_plate,
            status: DriverStatus::Offline,
            is_active: true,
            total_deliveries: 0,
            average_rating: 0.0,
            total_rating_count: 0,
            created_at: Utc::now(),
        };
        self.drivers.insert_driver(&driver).await?;
        tracing::info!(driver_id = %driver.id, name = %driver.name, "Driver registered");
        Ok(driver)
    }

    pub async fn get_driver(&self, ctx: &TenantContext, driver_id: &str) -> LifecycleResult<Driver> {
        self.drivers
            .get_driver(&ctx.restaurant_id, driver_id)
            .await?
            .ok_or_else(|| LifecycleError::NotFound(format!("Driver {} not found", driver_id)))
    }

    pub async fn list_drivers(
        &self,
        ctx: &TenantContext,
        status: Option<DriverStatus>,
        include_inactive: bool,
    ) -> LifecycleResult<Vec<Driver>> {
        Ok(self
            .drivers
            .list_drivers(&ctx.restaurant_id, status, include_inactive)
            .await?)
    }

    pub async fn update_driver(
        &self,
        ctx: &TenantContext,
        driver_id: &str,
        patch: DriverUpdate,
    ) -> LifecycleResult<Driver> {
        patch
            .validate()
            .map_err(|e| LifecycleError::Validation(e.to_string()))?;
        self.drivers
            .update_driver(&ctx.restaurant_id, driver_id, patch)
            .await?
            .ok_or_else(|| LifecycleError::NotFound(format!("Driver {} not found", driver_id)))
    }

    /// Manual availability toggle, staff-driven
    ///
    /// Only `available ↔ offline` is allowed from here; `busy` and
    /// `delivering` are system-set by the engine, and a busy driver
    /// cannot be toggled out from under their active order.
    pub async fn set_availability(
        &self,
        ctx: &TenantContext,
        driver_id: &str,
        target: DriverStatus,
    ) -> LifecycleResult<Driver> {
        if !matches!(target, DriverStatus::Available | DriverStatus::Offline) {
            return Err(LifecycleError::Validation(format!(
                "driver status {} is system-managed and cannot be set manually",
                target
            )));
        }
        let driver = self.get_driver(ctx, driver_id).await?;
        if !driver.is_active {
            return Err(LifecycleError::DriverUnavailable(format!(
                "driver {} is inactive",
                driver.name
            )));
        }
        if !matches!(
            driver.status,
            DriverStatus::Available | DriverStatus::Offline
        ) {
            return Err(LifecycleError::DriverUnavailable(format!(
                "driver {} is {} on an active order",
                driver.name, driver.status
            )));
        }
        self.drivers
            .update_driver_status_guarded(&ctx.restaurant_id, driver_id, driver.status, target)
            .await?
            .ok_or_else(|| {
                LifecycleError::Conflict(format!(
                    "driver {} was modified concurrently",
                    driver_id
                ))
            })
    }

    /// Soft-delete a driver
    ///
    /// Rejected while the driver is bound to any non-terminal order; the
    /// reference must be released (delivery or cancellation) first.
    pub async fn deactivate_driver(
        &self,
        ctx: &TenantContext,
        driver_id: &str,
    ) -> LifecycleResult<Driver> {
        let driver = self.get_driver(ctx, driver_id).await?;
        let active_orders = self.orders.list_active_orders(&ctx.restaurant_id).await?;
        if active_orders
            .iter()
            .any(|o| o.driver_id.as_deref() == Some(driver_id))
        {
            return Err(LifecycleError::Validation(format!(
                "driver {} is assigned to an active order and cannot be removed",
                driver.name
            )));
        }
        self.drivers
            .set_active(&ctx.restaurant_id, driver_id, false)
            .await?
            .ok_or_else(|| LifecycleError::NotFound(format!("Driver {} not found", driver_id)))
    }

    pub async fn reactivate_driver(
        &self,
        ctx: &TenantContext,
        driver_id: &str,
    ) -> LifecycleResult<Driver> {
        self.drivers
            .set_active(&ctx.restaurant_id, driver_id, true)
            .await?
            .ok_or_else(|| LifecycleError::NotFound(format!("Driver {} not found", driver_id)))
    }

    /// Fold a customer rating into the driver's running average
    pub async fn record_rating(
        &self,
        ctx: &TenantContext,
        driver_id: &str,
        rating: f64,
    ) -> LifecycleResult<Driver> {
        if !rating.is_finite() || !(0.0..=5.0).contains(&rating) {
            return Err(LifecycleError::Validation(format!(
                "rating must be between 0 and 5, got {}",
                rating
            )));
        }
        self.drivers
            .record_rating(&ctx.restaurant_id, driver_id, rating)
            .await?
            .ok_or_else(|| LifecycleError::NotFound(format!("Driver {} not found", driver_id)))
    }
}
