//! Money calculation utilities using rust_decimal for precision
//!
//! All arithmetic runs through `Decimal` and is rounded half-up to two
//! places before conversion back to `f64` for storage/serialization.

use rust_decimal::prelude::*;

use super::engine::OrderItemInput;
use super::error::LifecycleError;
use crate::db::models::OrderItem;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed unit price per item
const MAX_PRICE: f64 = 100_000.0;
/// Maximum allowed quantity per item
const MAX_QUANTITY: i32 = 999;

fn require_finite(value: f64, field_name: &str) -> Result<(), LifecycleError> {
    if !value.is_finite() {
        return Err(LifecycleError::Validation(format!(
            "{} must be a finite number, got {}",
            field_name, value
        )));
    }
    Ok(())
}

/// Validate an order line item before pricing it
pub fn validate_item(item: &OrderItemInput) -> Result<(), LifecycleError> {
    if item.name.trim().is_empty() {
        return Err(LifecycleError::Validation(
            "item name must not be empty".to_string(),
        ));
    }
    require_finite(item.unit_price, "unit_price")?;
    if item.unit_price < 0.0 {
        return Err(LifecycleError::Validation(format!(
            "unit_price must be non-negative, got {}",
            item.unit_price
        )));
    }
    if item.unit_price > MAX_PRICE {
        return Err(LifecycleError::Validation(format!(
            "unit_price exceeds maximum allowed ({}), got {}",
            MAX_PRICE, item.unit_price
        )));
    }
    if item.quantity < 1 {
        return Err(LifecycleError::Validation(format!(
            "quantity must be at least 1, got {}",
            item.quantity
        )));
    }
    if item.quantity > MAX_QUANTITY {
        return Err(LifecycleError::Validation(format!(
            "quantity exceeds maximum allowed ({}), got {}",
            MAX_QUANTITY, item.quantity
        )));
    }
    Ok(())
}

fn decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Round a decimal to cents and convert back to f64
pub fn round2(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or(0.0)
}

/// Line total for one item (unit_price * quantity)
pub fn line_total(unit_price: f64, quantity: i32) -> f64 {
    round2(decimal(unit_price) * Decimal::from(quantity))
}

/// Subtotal and total for a priced item list
///
/// Invariant: `total == subtotal + delivery_fee` at all times, so both are
/// derived from the same decimal sum.
pub fn order_totals(items: &[OrderItem], delivery_fee: f64) -> (f64, f64) {
    let subtotal: Decimal = items.iter().map(|i| decimal(i.line_total)).sum();
    let total = subtotal + decimal(delivery_fee);
    (round2(subtotal), round2(total))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, quantity: i32, unit_price: f64) -> OrderItem {
        OrderItem {
            name: name.to_string(),
            quantity,
            unit_price,
            line_total: line_total(unit_price, quantity),
        }
    }

    #[test]
    fn test_totals() {
        // burger x2 at 12.00 with 5.00 delivery fee
        let items = vec![item("burger", 2, 12.0)];
        let (subtotal, total) = order_totals(&items, 5.0);
        assert_eq!(subtotal, 24.0);
        assert_eq!(total, 29.0);
    }

    #[test]
    fn test_totals_avoid_float_drift() {
        // 3 x 0.10 should be exactly 0.30
        let items = vec![item("sauce", 3, 0.10)];
        let (subtotal, total) = order_totals(&items, 0.0);
        assert_eq!(subtotal, 0.30);
        assert_eq!(total, 0.30);
    }

    #[test]
    fn test_validate_item_rejects_bad_input() {
        let bad_quantity = OrderItemInput {
            name: "burger".to_string(),
            quantity: 0,
            unit_price: 12.0,
        };
        assert!(validate_item(&bad_quantity).is_err());

        let negative_price = OrderItemInput {
            name: "burger".to_string(),
            quantity: 1,
            unit_price: -1.0,
        };
        assert!(validate_item(&negative_price).is_err());

        let nan_price = OrderItemInput {
            name: "burger".to_string(),
            quantity: 1,
            unit_price: f64::NAN,
        };
        assert!(validate_item(&nan_price).is_err());

        let empty_name = OrderItemInput {
            name: "  ".to_string(),
            quantity: 1,
            unit_price: 1.0,
        };
        assert!(validate_item(&empty_name).is_err());
    }
}
