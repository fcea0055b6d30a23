//! Customer Timeline Builder
//!
//! Derives the customer-facing progress timeline from one order. Pure:
//! no store access, the order and "now" are the only inputs.
//!
//! The first step anchors at order placement (`created_at`); later steps
//! prefer the order's real timestamps (`confirmed_at`, `picked_up_at`,
//! `delivered_at`), with fixed offsets from `created_at` filling in where
//! a stage was entered before its timestamp existed. Displayed times are
//! clamped so the sequence never runs backwards.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::db::models::{Order, OrderStatus};

/// Fallback offsets from order creation (minutes)
const KITCHEN_OFFSET_MINS: i64 = 10;
const DISPATCH_OFFSET_MINS: i64 = 25;
/// Rolling estimate shown for a not-yet-delivered final step
const DELIVERY_ESTIMATE_MINS: i64 = 15;

/// One entry of the customer progress timeline
#[derive(Debug, Clone, Serialize)]
pub struct TimelineStep {
    pub label: &'static str,
    pub at: DateTime<Utc>,
    pub completed: bool,
}

/// Build the ordered progress timeline for one order
///
/// Emits up to four steps: "Order Confirmed", "In Kitchen",
/// "Out for Delivery", "Delivered". The final step is always present;
/// for undelivered orders it carries a rolling `now + 15min` estimate
/// and `completed = false`.
pub fn build_timeline(order: &Order, now: DateTime<Utc>) -> Vec<TimelineStep> {
    let mut steps = Vec::with_capacity(4);

    // The first step anchors at placement time, not at staff confirmation,
    // so it never coincides with the kitchen step
    steps.push(TimelineStep {
        label: "Order Confirmed",
        at: order.created_at,
        completed: true,
    });

    if reached_kitchen(order) {
        steps.push(TimelineStep {
            label: "In Kitchen",
            at: order
                .confirmed_at
                .unwrap_or(order.created_at + Duration::minutes(KITCHEN_OFFSET_MINS)),
            completed: true,
        });
    }

    if reached_dispatch(order) {
        steps.push(TimelineStep {
            label: "Out for Delivery",
            at: order
                .picked_up_at
                .unwrap_or(order.created_at + Duration::minutes(DISPATCH_OFFSET_MINS)),
            completed: true,
        });
    }

    let delivered = order.status == OrderStatus::Delivered;
    steps.push(TimelineStep {
        label: "Delivered",
        at: match order.delivered_at {
            Some(at) if delivered => at,
            _ => now + Duration::minutes(DELIVERY_ESTIMATE_MINS),
        },
        completed: delivered,
    });

    // Fallback offsets can land before a real earlier timestamp; clamp so
    // the displayed sequence stays chronological
    for i in 1..steps.len() {
        if steps[i].at < steps[i - 1].at {
            steps[i].at = steps[i - 1].at;
        }
    }
    steps
}

/// Kitchen step applies once the order got past `pending`. A cancelled
/// order only shows it when the kitchen actually saw the order.
fn reached_kitchen(order: &Order) -> bool {
    match order.status {
        OrderStatus::Pending => false,
        OrderStatus::Cancelled => order.confirmed_at.is_some(),
        _ => true,
    }
}

fn reached_dispatch(order: &Order) -> bool {
    order.picked_up_at.is_some()
        || matches!(
            order.status,
            OrderStatus::OutForDelivery | OrderStatus::Delivered
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::OrderPriority;

    fn base_order(status: OrderStatus) -> Order {
        let created = Utc::now() - Duration::minutes(40);
        Order {
            id: "ord-1".to_string(),
            restaurant_id: "rest-1".to_string(),
            order_number: "DLV2026010110001-3f9a1c".to_string(),
            customer_name: "Alice".to_string(),
            customer_phone: "+34 600 000 001".to_string(),
            customer_email: None,
            delivery_address: "Calle Mayor 1".to_string(),
            delivery_notes: None,
            items: vec![],
            subtotal: 20.0,
            delivery_fee: 5.0,
            total_amount: 25.0,
            status,
            priority: OrderPriority::Normal,
            driver_id: None,
            created_at: created,
            confirmed_at: None,
            ready_at: None,
            assigned_at: None,
            picked_up_at: None,
            delivered_at: None,
            estimated_ready_at: created + Duration::minutes(20),
            estimated_delivery_at: created + Duration::minutes(50),
        }
    }

    fn labels(steps: &[TimelineStep]) -> Vec<&'static str> {
        steps.iter().map(|s| s.label).collect()
    }

    #[test]
    fn test_pending_order_shows_two_steps() {
        let order = base_order(OrderStatus::Pending);
        let now = Utc::now();
        let steps = build_timeline(&order, now);

        assert_eq!(labels(&steps), ["Order Confirmed", "Delivered"]);
        assert!(steps[0].completed);
        assert_eq!(steps[0].at, order.created_at);
        assert!(!steps[1].completed);
        assert_eq!(steps[1].at, now + Duration::minutes(15));
    }

    #[test]
    fn test_preparing_order_adds_kitchen_step() {
        let mut order = base_order(OrderStatus::Preparing);
        order.confirmed_at = Some(order.created_at + Duration::minutes(3));
        let steps = build_timeline(&order, Utc::now());

        assert_eq!(labels(&steps), ["Order Confirmed", "In Kitchen", "Delivered"]);
        // Real confirmation timestamp wins over the +10min fallback
        assert_eq!(steps[1].at, order.created_at + Duration::minutes(3));
        assert!(steps[1].completed);
    }

    #[test]
    fn test_placement_step_stays_at_creation_time() {
        let mut order = base_order(OrderStatus::Confirmed);
        order.confirmed_at = Some(order.created_at + Duration::minutes(3));
        let steps = build_timeline(&order, Utc::now());

        // Confirmation moves the kitchen step, never the placement step
        assert_eq!(steps[0].at, order.created_at);
        assert!(steps[0].at < steps[1].at);
    }

    #[test]
    fn test_out_for_delivery_adds_dispatch_step() {
        let mut order = base_order(OrderStatus::OutForDelivery);
        order.confirmed_at = Some(order.created_at + Duration::minutes(2));
        order.picked_up_at = Some(order.created_at + Duration::minutes(22));
        let steps = build_timeline(&order, Utc::now());

        assert_eq!(
            labels(&steps),
            ["Order Confirmed", "In Kitchen", "Out for Delivery", "Delivered"]
        );
        assert_eq!(steps[2].at, order.created_at + Duration::minutes(22));
        assert!(!steps[3].completed);
    }

    #[test]
    fn test_delivered_order_is_fully_completed() {
        let mut order = base_order(OrderStatus::Delivered);
        order.confirmed_at = Some(order.created_at + Duration::minutes(2));
        order.picked_up_at = Some(order.created_at + Duration::minutes(22));
        order.delivered_at = Some(order.created_at + Duration::minutes(35));
        let steps = build_timeline(&order, Utc::now());

        assert_eq!(steps.len(), 4);
        assert!(steps.iter().all(|s| s.completed));
        assert_eq!(steps[3].at, order.created_at + Duration::minutes(35));
    }

    #[test]
    fn test_missing_timestamps_fall_back_to_offsets() {
        // Delivered but only delivered_at recorded
        let mut order = base_order(OrderStatus::Delivered);
        order.delivered_at = Some(order.created_at + Duration::minutes(35));
        let steps = build_timeline(&order, Utc::now());

        assert_eq!(steps[1].at, order.created_at + Duration::minutes(10));
        assert_eq!(steps[2].at, order.created_at + Duration::minutes(25));
    }

    #[test]
    fn test_steps_never_run_backwards() {
        // A late confirmation would put the +25min fallback before it
        let mut order = base_order(OrderStatus::Delivered);
        order.confirmed_at = Some(order.created_at + Duration::minutes(30));
        order.delivered_at = Some(order.created_at + Duration::minutes(60));
        let steps = build_timeline(&order, Utc::now());

        for pair in steps.windows(2) {
            assert!(pair[0].at <= pair[1].at);
        }
    }

    #[test]
    fn test_cancelled_before_confirmation_hides_kitchen() {
        let order = base_order(OrderStatus::Cancelled);
        let steps = build_timeline(&order, Utc::now());
        assert_eq!(labels(&steps), ["Order Confirmed", "Delivered"]);

        let mut confirmed_then_cancelled = base_order(OrderStatus::Cancelled);
        confirmed_then_cancelled.confirmed_at =
            Some(confirmed_then_cancelled.created_at + Duration::minutes(2));
        let steps = build_timeline(&confirmed_then_cancelled, Utc::now());
        assert_eq!(labels(&steps), ["Order Confirmed", "In Kitchen", "Delivered"]);
        assert!(!steps.last().unwrap().completed);
    }
}
