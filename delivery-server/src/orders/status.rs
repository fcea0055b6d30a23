//! Order Status State Machine
//!
//! The canonical lifecycle is a straight line with `cancelled` reachable
//! from every non-terminal state:
//!
//! ```text
//! pending → confirmed → preparing → ready → assigned
//!        → picked_up → out_for_delivery → delivered†
//! cancelled† ← any non-terminal state
//! ```
//!
//! Everything here is an exhaustive match on the enum — adding a status
//! without deciding its transition rules will not compile.

use crate::db::models::OrderStatus;

impl OrderStatus {
    /// Terminal states accept no further transitions
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// The single forward successor in the canonical chain
    pub fn next(self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Pending => Some(OrderStatus::Confirmed),
            OrderStatus::Confirmed => Some(OrderStatus::Preparing),
            OrderStatus::Preparing => Some(OrderStatus::Ready),
            OrderStatus::Ready => Some(OrderStatus::Assigned),
            OrderStatus::Assigned => Some(OrderStatus::PickedUp),
            OrderStatus::PickedUp => Some(OrderStatus::OutForDelivery),
            OrderStatus::OutForDelivery => Some(OrderStatus::Delivered),
            OrderStatus::Delivered | OrderStatus::Cancelled => None,
        }
    }

    /// Legal successors: the forward step, plus `cancelled` while
    /// non-terminal
    pub fn can_transition_to(self, target: OrderStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        if target == OrderStatus::Cancelled {
            return true;
        }
        self.next() == Some(target)
    }

    /// Whether entering `self` binds a driver to the order
    pub fn requires_driver(self) -> bool {
        matches!(self, OrderStatus::Assigned)
    }

    /// Default history note synthesized when the caller supplies none
    pub fn default_note(self) -> &'static str {
        match self {
            OrderStatus::Pending => "Order received",
            OrderStatus::Confirmed => "Order confirmed and preparing",
            OrderStatus::Preparing => "Order is being prepared",
            OrderStatus::Ready => "Order is ready for pickup",
            OrderStatus::Assigned => "Driver assigned to order",
            OrderStatus::PickedUp => "Order picked up by driver",
            OrderStatus::OutForDelivery => "Order is out for delivery",
            OrderStatus::Delivered => "Order delivered",
            OrderStatus::Cancelled => "Order cancelled",
        }
    }
}
