use super::*;

fn input_with_items(items: Vec<OrderItemInput>) -> CreateOrderInput {
    CreateOrderInput {
        items,
        ..sample_input()
    }
}

#[tokio::test]
async fn test_rejects_zero_and_negative_quantity() {
    let engine = test_engine().await;
    for quantity in [0, -1] {
        let input = input_with_items(vec![OrderItemInput {
            name: "Pizza".to_string(),
            quantity,
            unit_price: 10.0,
        }]);
        let err = engine.create_order(&ctx(), input).await.unwrap_err();
        assert!(matches!(err, LifecycleError::Validation(_)));
    }
}

#[tokio::test]
async fn test_rejects_non_finite_and_negative_prices() {
    let engine = test_engine().await;
    for unit_price in [f64::NAN, f64::INFINITY, -0.01] {
        let input = input_with_items(vec![OrderItemInput {
            name: "Pizza".to_string(),
            quantity: 1,
            unit_price,
        }]);
        let err = engine.create_order(&ctx(), input).await.unwrap_err();
        assert!(matches!(err, LifecycleError::Validation(_)));
    }
}

#[tokio::test]
async fn test_rejects_blank_item_name() {
    let engine = test_engine().await;
    let input = input_with_items(vec![OrderItemInput {
        name: "   ".to_string(),
        quantity: 1,
        unit_price: 10.0,
    }]);
    let err = engine.create_order(&ctx(), input).await.unwrap_err();
    assert!(matches!(err, LifecycleError::Validation(_)));
}

#[tokio::test]
async fn test_rejects_negative_fee_override() {
    let engine = test_engine().await;
    let input = CreateOrderInput {
        delivery_fee: Some(-1.0),
        ..sample_input()
    };
    let err = engine.create_order(&ctx(), input).await.unwrap_err();
    assert!(matches!(err, LifecycleError::Validation(_)));
}

#[tokio::test]
async fn test_fee_override_replaces_restaurant_default() {
    let engine = test_engine().await;
    let input = CreateOrderInput {
        delivery_fee: Some(0.0),
        ..sample_input()
    };
    let order = engine.create_order(&ctx(), input).await.unwrap();
    assert_eq!(order.delivery_fee, 0.0);
    assert_eq!(order.total_amount, order.subtotal);
}

#[tokio::test]
async fn test_fractional_prices_round_half_up() {
    let engine = test_engine().await;
    let input = input_with_items(vec![OrderItemInput {
        name: "Espresso".to_string(),
        quantity: 3,
        unit_price: 1.115,
    }]);
    let order = engine.create_order(&ctx(), input).await.unwrap();
    // 3 x 1.115 = 3.345 → 3.35, never 3.3449999...
    assert_eq!(order.subtotal, 3.35);
    assert_eq!(order.items[0].line_total, 3.35);
}

#[tokio::test]
async fn test_rejects_invalid_email() {
    let engine = test_engine().await;
    let input = CreateOrderInput {
        customer_email: Some("not-an-email".to_string()),
        ..sample_input()
    };
    let err = engine.create_order(&ctx(), input).await.unwrap_err();
    assert!(matches!(err, LifecycleError::Validation(_)));
}

#[tokio::test]
async fn test_unknown_restaurant_rejected() {
    let engine = test_engine().await;
    let ghost = TenantContext::new("rest-ghost".to_string(), "user-1".to_string());
    let err = engine.create_order(&ghost, sample_input()).await.unwrap_err();
    assert!(matches!(err, LifecycleError::NotFound(_)));
}

#[tokio::test]
async fn test_unicode_customer_fields_survive() {
    let engine = test_engine().await;
    let input = CreateOrderInput {
        customer_name: "José García 王伟".to_string(),
        delivery_address: "Çalışkan Sokak 5, İstanbul".to_string(),
        ..sample_input()
    };
    let order = engine.create_order(&ctx(), input).await.unwrap();
    let reread = engine.get_order(&ctx(), &order.id).await.unwrap();
    assert_eq!(reread.customer_name, "José García 王伟");
    assert_eq!(reread.delivery_address, "Çalışkan Sokak 5, İstanbul");
}

#[tokio::test]
async fn test_estimates_derive_from_prep_time() {
    let engine = test_engine().await;
    let before = Utc::now();
    let order = create_order(&engine).await;

    let prep = order.estimated_ready_at - order.created_at;
    assert_eq!(prep.num_minutes(), 20);
    let window = order.estimated_delivery_at - order.estimated_ready_at;
    assert_eq!(window.num_minutes(), 30);
    assert!(order.created_at >= before - chrono::Duration::seconds(1));
}
