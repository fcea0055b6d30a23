//! Restaurant Model — tenant root

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Restaurant entity. Orders and drivers are exclusively owned by their
/// restaurant; every store call is scoped by `restaurant.id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: String,
    pub name: String,
    /// Average prep time in minutes — drives `estimated_ready_at`
    pub average_prep_time: i64,
    /// Default delivery fee applied at order creation
    pub delivery_fee: f64,
    pub created_at: DateTime<Utc>,
}

/// Restaurant settings update payload
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RestaurantSettingsUpdate {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(range(min = 1, max = 240))]
    pub average_prep_time: Option<i64>,
    #[validate(range(min = 0.0, max = 1000.0))]
    pub delivery_fee: Option<f64>,
}
