//! In-memory store
//!
//! Backs the `memory` database mode and the unit test suites. Implements
//! the same store traits as the SurrealDB repositories; a single
//! [`MemoryStore`] serves all three because the maps share nothing.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::models::{
    Driver, DriverStatus, DriverUpdate, Order, OrderHistoryEntry, OrderStatus, OrderUpdate,
    Restaurant, RestaurantSettingsUpdate,
};
use super::{DriverStore, OrderStore, RepoError, RepoResult, RestaurantStore};

/// HashMap-backed implementation of all three store traits
#[derive(Default)]
pub struct MemoryStore {
    orders: RwLock<HashMap<String, Order>>,
    history: RwLock<Vec<OrderHistoryEntry>>,
    drivers: RwLock<HashMap<String, Driver>>,
    restaurants: RwLock<HashMap<String, Restaurant>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn apply_order_patch(order: &mut Order, patch: &OrderUpdate) {
    if let Some(status) = patch.status {
        order.status = status;
    }
    if let Some(driver_id) = &patch.driver_id {
        order.driver_id = Some(driver_id.clone());
    }
    if patch.confirmed_at.is_some() {
        order.confirmed_at = patch.confirmed_at;
    }
    if patch.ready_at.is_some() {
        order.ready_at = patch.ready_at;
    }
    if patch.assigned_at.is_some() {
        order.assigned_at = patch.assigned_at;
    }
    if patch.picked_up_at.is_some() {
        order.picked_up_at = patch.picked_up_at;
    }
    if patch.delivered_at.is_some() {
        order.delivered_at = patch.delivered_at;
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn insert_order(&self, order: &Order) -> RepoResult<()> {
        let mut orders = self.orders.write();
        if orders.contains_key(&order.id) {
            return Err(RepoError::Duplicate(format!(
                "Order {} already exists",
                order.id
            )));
        }
        orders.insert(order.id.clone(), order.clone());
        Ok(())
    }

    async fn get_order(&self, restaurant_id: &str, id: &str) -> RepoResult<Option<Order>> {
        let orders = self.orders.read();
        Ok(orders
            .get(id)
            .filter(|o| o.restaurant_id == restaurant_id)
            .cloned())
    }

    async fn get_order_by_number(&self, order_number: &str) -> RepoResult<Option<Order>> {
        let orders = self.orders.read();
        Ok(orders
            .values()
            .find(|o| o.order_number == order_number)
            .cloned())
    }

    async fn list_orders(
        &self,
        restaurant_id: &str,
        status: Option<OrderStatus>,
    ) -> RepoResult<Vec<Order>> {
        let orders = self.orders.read();
        let mut result: Vec<Order> = orders
            .values()
            .filter(|o| o.restaurant_id == restaurant_id)
            .filter(|o| status.is_none_or(|s| o.status == s))
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }

    async fn list_active_orders(&self, restaurant_id: &str) -> RepoResult<Vec<Order>> {
        let orders = self.orders.read();
        let mut result: Vec<Order> = orders
            .values()
            .filter(|o| o.restaurant_id == restaurant_id)
            .filter(|o| {
                !matches!(o.status, OrderStatus::Delivered | OrderStatus::Cancelled)
            })
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }

    async fn count_orders(&self, restaurant_id: &str) -> RepoResult<u64> {
        let orders = self.orders.read();
        Ok(orders
            .values()
            .filter(|o| o.restaurant_id == restaurant_id)
            .count() as u64)
    }

    async fn update_order_guarded(
        &self,
        restaurant_id: &str,
        id: &str,
        expected: OrderStatus,
        patch: OrderUpdate,
    ) -> RepoResult<Option<Order>> {
        let mut orders = self.orders.write();
        let Some(order) = orders
            .get_mut(id)
            .filter(|o| o.restaurant_id == restaurant_id)
        else {
            return Ok(None);
        };
        if order.status != expected {
            return Ok(None);
        }
        apply_order_patch(order, &patch);
        Ok(Some(order.clone()))
    }

    async fn append_history(&self, entry: &OrderHistoryEntry) -> RepoResult<()> {
        self.history.write().push(entry.clone());
        Ok(())
    }

    async fn list_history(&self, order_id: &str) -> RepoResult<Vec<OrderHistoryEntry>> {
        let history = self.history.read();
        let mut entries: Vec<OrderHistoryEntry> = history
            .iter()
            .filter(|e| e.order_id == order_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(entries)
    }
}

#[async_trait]
impl DriverStore for MemoryStore {
    async fn insert_driver(&self, driver: &Driver) -> RepoResult<()> {
        let mut drivers = self.drivers.write();
        if drivers.contains_key(&driver.id) {
            return Err(RepoError::Duplicate(format!(
                "Driver {} already exists",
                driver.id
            )));
        }
        drivers.insert(driver.id.clone(), driver.clone());
        Ok(())
    }

    async fn get_driver(&self, restaurant_id: &str, id: &str) -> RepoResult<Option<Driver>> {
        let drivers = self.drivers.read();
        Ok(drivers
            .get(id)
            .filter(|d| d.restaurant_id == restaurant_id)
            .cloned())
    }

    async fn list_drivers(
        &self,
        restaurant_id: &str,
        status: Option<DriverStatus>,
        include_inactive: bool,
    ) -> RepoResult<Vec<Driver>> {
        let drivers = self.drivers.read();
        let mut result: Vec<Driver> = drivers
            .values()
            .filter(|d| d.restaurant_id == restaurant_id)
            .filter(|d| include_inactive || d.is_active)
            .filter(|d| status.is_none_or(|s| d.status == s))
            .cloned()
            .collect();
        result.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(result)
    }

    async fn update_driver(
        &self,
        restaurant_id: &str,
        id: &str,
        patch: DriverUpdate,
    ) -> RepoResult<Option<Driver>> {
        let mut drivers = self.drivers.write();
        let Some(driver) = drivers
            .get_mut(id)
            .filter(|d| d.restaurant_id == restaurant_id)
        else {
            return Ok(None);
        };
        if let Some(name) = patch.name {
            driver.name = name;
        }
        if let Some(phone) = patch.phone {
            driver.phone = phone;
        }
        if patch.email.is_some() {
            driver.email = patch.email;
        }
        if let Some(vehicle_type) = patch.vehicle_type {
            driver.vehicle_type = vehicle_type;
        }
        if patch.license_plate.is_some() {
            driver.license_plate = patch.license_plate;
        }
        Ok(Some(driver.clone()))
    }

    async fn update_driver_status_guarded(
        &self,
        restaurant_id: &str,
        id: &str,
        expected: DriverStatus,
        new: DriverStatus,
    ) -> RepoResult<Option<Driver>> {
        let mut drivers = self.drivers.write();
        let Some(driver) = drivers
            .get_mut(id)
            .filter(|d| d.restaurant_id == restaurant_id)
        else {
            return Ok(None);
        };
        if driver.status != expected {
            return Ok(None);
        }
        driver.status = new;
        Ok(Some(driver.clone()))
    }

    async fn set_active(
        &self,
        restaurant_id: &str,
        id: &str,
        active: bool,
    ) -> RepoResult<Option<Driver>> {
        let mut drivers = self.drivers.write();
        let Some(driver) = drivers
            .get_mut(id)
            .filter(|d| d.restaurant_id == restaurant_id)
        else {
            return Ok(None);
        };
        driver.is_active = active;
        Ok(Some(driver.clone()))
    }

    async fn record_delivery(&self, restaurant_id: &str, id: &str) -> RepoResult<Option<Driver>> {
        let mut drivers = self.drivers.write();
        let Some(driver) = drivers
            .get_mut(id)
            .filter(|d| d.restaurant_id == restaurant_id)
        else {
            return Ok(None);
        };
        driver.total_deliveries += 1;
        Ok(Some(driver.clone()))
    }

    async fn record_rating(
        &self,
        restaurant_id: &str,
        id: &str,
        rating: f64,
    ) -> RepoResult<Option<Driver>> {
        let mut drivers = self.drivers.write();
        let Some(driver) = drivers
            .get_mut(id)
            .filter(|d| d.restaurant_id == restaurant_id)
        else {
            return Ok(None);
        };
        let count = driver.total_rating_count as f64;
        driver.average_rating = (driver.average_rating * count + rating) / (count + 1.0);
        driver.total_rating_count += 1;
        Ok(Some(driver.clone()))
    }
}

#[async_trait]
impl RestaurantStore for MemoryStore {
    async fn insert_restaurant(&self, restaurant: &Restaurant) -> RepoResult<()> {
        let mut restaurants = self.restaurants.write();
        if restaurants.contains_key(&restaurant.id) {
            return Err(RepoError::Duplicate(format!(
                "Restaurant {} already exists",
                restaurant.id
            )));
        }
        restaurants.insert(restaurant.id.clone(), restaurant.clone());
        Ok(())
    }

    async fn get_restaurant(&self, id: &str) -> RepoResult<Option<Restaurant>> {
        Ok(self.restaurants.read().get(id).cloned())
    }

    async fn update_settings(
        &self,
        id: &str,
        patch: RestaurantSettingsUpdate,
    ) -> RepoResult<Option<Restaurant>> {
        let mut restaurants = self.restaurants.write();
        let Some(restaurant) = restaurants.get_mut(id) else {
            return Ok(None);
        };
        if let Some(name) = patch.name {
            restaurant.name = name;
        }
        if let Some(prep) = patch.average_prep_time {
            restaurant.average_prep_time = prep;
        }
        if let Some(fee) = patch.delivery_fee {
            restaurant.delivery_fee = fee;
        }
        Ok(Some(restaurant.clone()))
    }
}
