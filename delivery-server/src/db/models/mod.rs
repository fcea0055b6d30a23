//! Data Models
//!
//! Plain domain entities shared by the store implementations, the order
//! lifecycle engine and the HTTP layer. IDs are opaque strings; the
//! SurrealDB repositories map them to record ids internally.

pub mod driver;
pub mod order;
pub mod restaurant;

pub use driver::{Driver, DriverCreate, DriverStatus, DriverUpdate, VehicleType};
pub use order::{
    Order, OrderHistoryEntry, OrderItem, OrderPriority, OrderStatus, OrderUpdate,
};
pub use restaurant::{Restaurant, RestaurantSettingsUpdate};
