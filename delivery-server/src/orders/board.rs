//! Board Projector
//!
//! Read-side projection of the active order set into the three dashboard
//! columns. No side effects; each call re-derives the view from the
//! stores so the board always reflects the latest committed state.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::error::LifecycleResult;
use crate::auth::TenantContext;
use crate::db::models::{Driver, DriverStatus, Order, OrderStatus, VehicleType};
use crate::db::{DriverStore, OrderStore, Stores};
use crate::utils::time::{time_ago, time_until};

/// The three dashboard columns, each newest-first
#[derive(Debug, Serialize)]
pub struct BoardView {
    pub pending: Vec<OrderView>,
    pub in_progress: Vec<OrderView>,
    pub out_for_delivery: Vec<OrderView>,
}

/// One order card
///
/// The relative time strings are computed against "now" at projection
/// time; clients re-fetch rather than re-derive them.
#[derive(Debug, Serialize)]
pub struct OrderView {
    #[serde(flatten)]
    pub order: Order,
    /// "Just now" / "{n} mins ago" since creation
    pub time_ago: String,
    /// Minutes until `estimated_ready_at` ("Overdue" when past)
    pub ready_in: String,
    /// Minutes until `estimated_delivery_at`
    pub delivery_eta: String,
    /// Time since pickup; only set in the out-for-delivery column
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picked_up_ago: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver: Option<DriverSnapshot>,
}

/// Driver identity as shown on an order card
#[derive(Debug, Clone, Serialize)]
pub struct DriverSnapshot {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub vehicle_type: VehicleType,
    pub status: DriverStatus,
}

impl From<&Driver> for DriverSnapshot {
    fn from(driver: &Driver) -> Self {
        Self {
            id: driver.id.clone(),
            name: driver.name.clone(),
            phone: driver.phone.clone(),
            vehicle_type: driver.vehicle_type,
            status: driver.status,
        }
    }
}

#[derive(Clone)]
pub struct BoardProjector {
    orders: Arc<dyn OrderStore>,
    drivers: Arc<dyn DriverStore>,
}

impl BoardProjector {
    pub fn new(stores: &Stores) -> Self {
        Self {
            orders: stores.orders.clone(),
            drivers: stores.drivers.clone(),
        }
    }

    /// Project the tenant's non-terminal orders into board columns
    pub async fn project_board(&self, ctx: &TenantContext) -> LifecycleResult<BoardView> {
        let orders = self.orders.list_active_orders(&ctx.restaurant_id).await?;
        let drivers: HashMap<String, Driver> = self
            .drivers
            .list_drivers(&ctx.restaurant_id, None, true)
            .await?
            .into_iter()
            .map(|d| (d.id.clone(), d))
            .collect();

        let now = Utc::now();
        let mut view = BoardView {
            pending: Vec::new(),
            in_progress: Vec::new(),
            out_for_delivery: Vec::new(),
        };
        // list_active_orders is already newest-first; column order follows
        for order in orders {
            let column = match order.status {
                OrderStatus::Pending => &mut view.pending,
                OrderStatus::Confirmed
                | OrderStatus::Preparing
                | OrderStatus::Ready
                | OrderStatus::Assigned => &mut view.in_progress,
                OrderStatus::PickedUp | OrderStatus::OutForDelivery => &mut view.out_for_delivery,
                OrderStatus::Delivered | OrderStatus::Cancelled => continue,
            };
            column.push(order_view(order, &drivers, now));
        }
        Ok(view)
    }
}

fn order_view(order: Order, drivers: &HashMap<String, Driver>, now: DateTime<Utc>) -> OrderView {
    let driver = order
        .driver_id
        .as_ref()
        .and_then(|id| drivers.get(id))
        .map(DriverSnapshot::from);
    OrderView {
        time_ago: time_ago(now, order.created_at),
        ready_in: time_until(now, order.estimated_ready_at),
        delivery_eta: time_until(now, order.estimated_delivery_at),
        picked_up_ago: order.picked_up_at.map(|at| time_ago(now, at)),
        driver,
        order,
    }
}
