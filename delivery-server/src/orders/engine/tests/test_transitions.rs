use super::*;

#[tokio::test]
async fn test_create_order_starts_pending() {
    let engine = test_engine().await;
    let order = create_order(&engine).await;

    assert_eq!(order.status, OrderStatus::Pending);
    assert!(order.driver_id.is_none());
    assert!(order.confirmed_at.is_none());
    // 2 x 12.50 + 6.00 + 5.00 fee
    assert_eq!(order.subtotal, 31.0);
    assert_eq!(order.delivery_fee, 5.0);
    assert_eq!(order.total_amount, 36.0);
    assert!(order.order_number.starts_with("DLV"));
}

#[tokio::test]
async fn test_create_order_writes_initial_history() {
    let engine = test_engine().await;
    let order = create_order(&engine).await;

    let history = engine.list_history(&ctx(), &order.id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].status, OrderStatus::Pending);
    assert_eq!(history[0].notes, "Order received");
}

#[tokio::test]
async fn test_order_numbers_sequence_per_restaurant_without_colliding() {
    let engine = test_engine().await;
    let first = create_order(&engine).await;
    let second = create_order(&engine).await;
    let other = engine
        .create_order(&other_ctx(), sample_input())
        .await
        .unwrap();

    let today = Utc::now().format("%Y%m%d").to_string();
    assert!(first.order_number.starts_with(&format!("DLV{}10001-", today)));
    assert!(second.order_number.starts_with(&format!("DLV{}10002-", today)));
    // Each restaurant sequences independently, but the full number stays
    // globally unique so the tenant-less tracking lookup cannot resolve
    // another restaurant's order
    assert!(other.order_number.starts_with(&format!("DLV{}10001-", today)));
    assert_ne!(other.order_number, first.order_number);
}

#[tokio::test]
async fn test_create_order_rejects_empty_items() {
    let engine = test_engine().await;
    let input = CreateOrderInput {
        items: vec![],
        ..sample_input()
    };
    let err = engine.create_order(&ctx(), input).await.unwrap_err();
    assert!(matches!(err, LifecycleError::Validation(_)));
}

#[tokio::test]
async fn test_confirm_sets_timestamp_and_history() {
    let engine = test_engine().await;
    let order = create_order(&engine).await;

    let confirmed = engine
        .apply_transition(&ctx(), &order.id, OrderStatus::Confirmed, None, None)
        .await
        .unwrap();
    assert_eq!(confirmed.status, OrderStatus::Confirmed);
    assert!(confirmed.confirmed_at.is_some());

    let history = engine.list_history(&ctx(), &order.id).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].status, OrderStatus::Confirmed);
}

#[tokio::test]
async fn test_cannot_skip_stages() {
    let engine = test_engine().await;
    let order = create_order(&engine).await;

    let err = engine
        .apply_transition(&ctx(), &order.id, OrderStatus::Preparing, None, None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        LifecycleError::InvalidTransition {
            from: OrderStatus::Pending,
            to: OrderStatus::Preparing,
        }
    ));

    // The failed attempt must not leave any trace
    let reread = engine.get_order(&ctx(), &order.id).await.unwrap();
    assert_eq!(reread.status, OrderStatus::Pending);
    let history = engine.list_history(&ctx(), &order.id).await.unwrap();
    assert_eq!(history.len(), 1);
}

#[tokio::test]
async fn test_cannot_move_backwards() {
    let (engine, _stores) = engine_with_stores().await;
    let order = create_order(&engine).await;
    advance(
        &engine,
        &order.id,
        &[OrderStatus::Confirmed, OrderStatus::Preparing],
    )
    .await;

    let err = engine
        .apply_transition(&ctx(), &order.id, OrderStatus::Confirmed, None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, LifecycleError::InvalidTransition { .. }));
}

#[tokio::test]
async fn test_full_happy_path_to_delivered() {
    let (engine, stores) = engine_with_stores().await;
    seed_driver(&stores, "drv-1", DriverStatus::Available).await;
    let order = create_order(&engine).await;

    advance(
        &engine,
        &order.id,
        &[
            OrderStatus::Confirmed,
            OrderStatus::Preparing,
            OrderStatus::Ready,
        ],
    )
    .await;
    engine
        .apply_transition(&ctx(), &order.id, OrderStatus::Assigned, Some("drv-1"), None)
        .await
        .unwrap();
    let delivered = advance(
        &engine,
        &order.id,
        &[OrderStatus::PickedUp, OrderStatus::OutForDelivery, OrderStatus::Delivered],
    )
    .await;

    assert_eq!(delivered.status, OrderStatus::Delivered);
    assert_eq!(delivered.driver_id.as_deref(), Some("drv-1"));

    // Each stage timestamp is set and never earlier than the previous one
    let stamps = [
        Some(delivered.created_at),
        delivered.confirmed_at,
        delivered.ready_at,
        delivered.assigned_at,
        delivered.picked_up_at,
        delivered.delivered_at,
    ];
    for pair in stamps.windows(2) {
        assert!(pair[1].unwrap() >= pair[0].unwrap());
    }

    let history = engine.list_history(&ctx(), &order.id).await.unwrap();
    assert_eq!(history.len(), 8); // pending + 7 transitions
    assert_eq!(history.last().unwrap().status, OrderStatus::Delivered);
}

#[tokio::test]
async fn test_cancel_from_any_non_terminal_state() {
    let engine = test_engine().await;

    let pending = create_order(&engine).await;
    let cancelled = engine
        .cancel_order(&ctx(), &pending.id, Some("Customer changed mind".to_string()))
        .await
        .unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);

    let history = engine.list_history(&ctx(), &pending.id).await.unwrap();
    assert_eq!(history.last().unwrap().notes, "Customer changed mind");

    let preparing = create_order(&engine).await;
    advance(
        &engine,
        &preparing.id,
        &[OrderStatus::Confirmed, OrderStatus::Preparing],
    )
    .await;
    let cancelled = engine.cancel_order(&ctx(), &preparing.id, None).await.unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
}

#[tokio::test]
async fn test_terminal_orders_reject_all_transitions() {
    let engine = test_engine().await;
    let order = create_order(&engine).await;
    engine.cancel_order(&ctx(), &order.id, None).await.unwrap();

    for target in [
        OrderStatus::Confirmed,
        OrderStatus::Cancelled,
        OrderStatus::Delivered,
    ] {
        let err = engine
            .apply_transition(&ctx(), &order.id, target, None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, LifecycleError::OrderAlreadyTerminal(_)));
    }
}

#[tokio::test]
async fn test_orders_are_tenant_scoped() {
    let engine = test_engine().await;
    let order = create_order(&engine).await;

    let err = engine.get_order(&other_ctx(), &order.id).await.unwrap_err();
    assert!(matches!(err, LifecycleError::NotFound(_)));

    let err = engine
        .apply_transition(&other_ctx(), &order.id, OrderStatus::Confirmed, None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, LifecycleError::NotFound(_)));

    let err = engine.list_history(&other_ctx(), &order.id).await.unwrap_err();
    assert!(matches!(err, LifecycleError::NotFound(_)));
}
