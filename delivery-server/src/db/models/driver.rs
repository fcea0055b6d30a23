//! Driver Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Driver availability status
///
/// `available` ↔ `offline` may be toggled by staff; `busy` and
/// `delivering` are set by the system only.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DriverStatus {
    #[default]
    Offline,
    Available,
    Busy,
    Delivering,
}

impl std::fmt::Display for DriverStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DriverStatus::Offline => "offline",
            DriverStatus::Available => "available",
            DriverStatus::Busy => "busy",
            DriverStatus::Delivering => "delivering",
        };
        f.write_str(s)
    }
}

/// Vehicle type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VehicleType {
    Bicycle,
    Scooter,
    Motorcycle,
    Car,
}

/// Driver entity — belongs to exactly one restaurant (tenant)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Driver {
    pub id: String,
    pub restaurant_id: String,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub vehicle_type: VehicleType,
    pub license_plate: Option<String>,
    pub status: DriverStatus,
    /// Soft-delete flag — inactive drivers never receive assignments
    pub is_active: bool,
    pub total_deliveries: i64,
    /// Running average, 0–5
    pub average_rating: f64,
    pub total_rating_count: i64,
    pub created_at: DateTime<Utc>,
}

/// Create driver payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DriverCreate {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 32))]
    pub phone: String,
    #[validate(email)]
    pub email: Option<String>,
    pub vehicle_type: VehicleType,
    #[validate(length(max = 16))]
    pub license_plate: Option<String>,
}

/// Update driver profile payload
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct DriverUpdate {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 32))]
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub vehicle_type: Option<VehicleType>,
    #[validate(length(max = 16))]
    pub license_plate: Option<String>,
}
