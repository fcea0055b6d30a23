//! Order Model
//!
//! 订单主体 + 追加式状态历史。时间戳字段一旦写入不再修改，
//! 状态机规则见 `orders::status`。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Order status enum — canonical lifecycle list
///
/// `delivered` / `cancelled` are terminal. The dashboard board collapses
/// several of these into three display columns; that grouping lives in
/// `orders::board` and does not change this list.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    Ready,
    Assigned,
    PickedUp,
    OutForDelivery,
    Delivered,
    Cancelled,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Assigned => "assigned",
            OrderStatus::PickedUp => "picked_up",
            OrderStatus::OutForDelivery => "out_for_delivery",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// Order priority — advisory for dashboard ordering only,
/// has no effect on transition rules
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderPriority {
    Low,
    #[default]
    Normal,
    High,
    Urgent,
}

/// Ordered line item — immutable after creation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    pub name: String,
    pub quantity: i32,
    pub unit_price: f64,
    /// Line total (unit_price * quantity, rounded to 2 places)
    pub line_total: f64,
}

/// Order entity — belongs to exactly one restaurant (tenant)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub restaurant_id: String,
    /// Human-readable, tenant-unique number generated at creation
    pub order_number: String,

    // Customer fields (immutable after creation)
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: Option<String>,
    pub delivery_address: String,
    pub delivery_notes: Option<String>,

    // Commercial fields — invariant: total_amount == subtotal + delivery_fee
    pub items: Vec<OrderItem>,
    pub subtotal: f64,
    pub delivery_fee: f64,
    pub total_amount: f64,

    // Lifecycle fields
    pub status: OrderStatus,
    pub priority: OrderPriority,
    pub driver_id: Option<String>,

    // Timestamps — each nullable until its transition occurs, then immutable
    pub created_at: DateTime<Utc>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub ready_at: Option<DateTime<Utc>>,
    pub assigned_at: Option<DateTime<Utc>>,
    pub picked_up_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,

    // Estimates computed at creation
    pub estimated_ready_at: DateTime<Utc>,
    pub estimated_delivery_at: DateTime<Utc>,
}

/// Append-only status history record
///
/// One entry per successful transition. Never updated or deleted; the
/// order's own timestamp fields stay authoritative, history is audit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderHistoryEntry {
    pub id: String,
    pub order_id: String,
    /// The status being entered
    pub status: OrderStatus,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

/// Transition patch applied through the store's conditional update
///
/// Only `Some` fields are written. The store applies the patch iff the
/// order's current status still equals the expected status passed
/// alongside it.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OrderUpdate {
    pub status: Option<OrderStatus>,
    pub driver_id: Option<String>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub ready_at: Option<DateTime<Utc>>,
    pub assigned_at: Option<DateTime<Utc>>,
    pub picked_up_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
}
