//! 端到端 API 测试 - 内存后端下的完整订单流程
//!
//! 直接对路由器发请求，不开真实端口。

use axum::Router;
use axum::body::Body;
use chrono::Utc;
use http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use delivery_server::api;
use delivery_server::db::models::Restaurant;
use delivery_server::{ServerState, Stores};

const RESTAURANT: &str = "rest-1";

async fn test_app() -> (Router, Stores) {
    let state = ServerState::for_tests();
    let stores = state.stores.clone();
    stores
        .restaurants
        .insert_restaurant(&Restaurant {
            id: RESTAURANT.to_string(),
            name: "Test Kitchen".to_string(),
            average_prep_time: 20,
            delivery_fee: 5.0,
            created_at: Utc::now(),
        })
        .await
        .unwrap();
    (api::build_app().with_state(state), stores)
}

fn tenant_request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("x-restaurant-id", RESTAURANT)
        .header("x-user-id", "user-1");
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn order_payload() -> Value {
    json!({
        "customer_name": "Alice Chen",
        "customer_phone": "+34 600 000 001",
        "delivery_address": "Calle Mayor 1, Madrid",
        "items": [
            { "name": "Burger", "quantity": 2, "unit_price": 12.00 }
        ]
    })
}

#[tokio::test]
async fn test_health_is_public() {
    let (app, _stores) = test_app().await;
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_tenant_headers_required() {
    let (app, _stores) = test_app().await;
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/orders")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = read_json(response).await;
    assert_eq!(body["code"], "E3001");
}

#[tokio::test]
async fn test_create_order_and_totals() {
    let (app, _stores) = test_app().await;
    let response = app
        .oneshot(tenant_request("POST", "/api/orders", Some(order_payload())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let order = read_json(response).await;
    assert_eq!(order["status"], "pending");
    assert_eq!(order["subtotal"], 24.0);
    assert_eq!(order["delivery_fee"], 5.0);
    assert_eq!(order["total_amount"], 29.0);
    assert!(order["order_number"].as_str().unwrap().starts_with("DLV"));
}

#[tokio::test]
async fn test_full_lifecycle_over_http() {
    let (app, _stores) = test_app().await;

    let order = read_json(
        app.clone()
            .oneshot(tenant_request("POST", "/api/orders", Some(order_payload())))
            .await
            .unwrap(),
    )
    .await;
    let order_id = order["id"].as_str().unwrap().to_string();

    // Register a driver and bring them online
    let driver = read_json(
        app.clone()
            .oneshot(tenant_request(
                "POST",
                "/api/drivers",
                Some(json!({
                    "name": "Marco Rossi",
                    "phone": "+34 600 111 222",
                    "vehicle_type": "scooter"
                })),
            ))
            .await
            .unwrap(),
    )
    .await;
    let driver_id = driver["id"].as_str().unwrap().to_string();
    assert_eq!(driver["status"], "offline");

    let response = app
        .clone()
        .oneshot(tenant_request(
            "POST",
            &format!("/api/drivers/{}/availability", driver_id),
            Some(json!({ "status": "available" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Walk the order to ready
    for status in ["confirmed", "preparing", "ready"] {
        let response = app
            .clone()
            .oneshot(tenant_request(
                "POST",
                &format!("/api/orders/{}/transition", order_id),
                Some(json!({ "status": status })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    // Bind the driver at ready
    let assigned = read_json(
        app.clone()
            .oneshot(tenant_request(
                "POST",
                &format!("/api/orders/{}/assign", order_id),
                Some(json!({ "driver_id": driver_id })),
            ))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(assigned["status"], "assigned");
    assert_eq!(assigned["driver_id"], driver_id.as_str());

    for status in ["picked_up", "out_for_delivery", "delivered"] {
        let response = app
            .clone()
            .oneshot(tenant_request(
                "POST",
                &format!("/api/orders/{}/transition", order_id),
                Some(json!({ "status": status })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    // Driver was released and credited
    let driver = read_json(
        app.clone()
            .oneshot(tenant_request(
                "GET",
                &format!("/api/drivers/{}", driver_id),
                None,
            ))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(driver["status"], "available");
    assert_eq!(driver["total_deliveries"], 1);

    // History carries one entry per transition plus creation
    let history = read_json(
        app.clone()
            .oneshot(tenant_request(
                "GET",
                &format!("/api/orders/{}/history", order_id),
                None,
            ))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(history.as_array().unwrap().len(), 8);
}

#[tokio::test]
async fn test_illegal_transition_is_business_rule_error() {
    let (app, _stores) = test_app().await;
    let order = read_json(
        app.clone()
            .oneshot(tenant_request("POST", "/api/orders", Some(order_payload())))
            .await
            .unwrap(),
    )
    .await;
    let order_id = order["id"].as_str().unwrap();

    let response = app
        .oneshot(tenant_request(
            "POST",
            &format!("/api/orders/{}/transition", order_id),
            Some(json!({ "status": "picked_up" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json(response).await;
    assert_eq!(body["code"], "E0005");
}

#[tokio::test]
async fn test_board_buckets_over_http() {
    let (app, _stores) = test_app().await;

    // pending, preparing, cancelled
    let mut ids = Vec::new();
    for _ in 0..3 {
        let order = read_json(
            app.clone()
                .oneshot(tenant_request("POST", "/api/orders", Some(order_payload())))
                .await
                .unwrap(),
        )
        .await;
        ids.push(order["id"].as_str().unwrap().to_string());
    }
    for status in ["confirmed", "preparing"] {
        app.clone()
            .oneshot(tenant_request(
                "POST",
                &format!("/api/orders/{}/transition", ids[1]),
                Some(json!({ "status": status })),
            ))
            .await
            .unwrap();
    }
    app.clone()
        .oneshot(tenant_request(
            "POST",
            &format!("/api/orders/{}/cancel", ids[2]),
            None,
        ))
        .await
        .unwrap();

    let board = read_json(
        app.oneshot(tenant_request("GET", "/api/board", None))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(board["pending"].as_array().unwrap().len(), 1);
    assert_eq!(board["in_progress"].as_array().unwrap().len(), 1);
    assert_eq!(board["out_for_delivery"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_public_tracking_by_order_number() {
    let (app, _stores) = test_app().await;
    let order = read_json(
        app.clone()
            .oneshot(tenant_request("POST", "/api/orders", Some(order_payload())))
            .await
            .unwrap(),
    )
    .await;
    let number = order["order_number"].as_str().unwrap();

    // No tenant headers on purpose
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/track/{}", number))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let tracking = read_json(response).await;
    assert_eq!(tracking["order_number"], number);
    assert_eq!(tracking["status"], "pending");
    // Internal fields stay private
    assert!(tracking.get("id").is_none());
    assert!(tracking.get("customer_phone").is_none());
    let timeline = tracking["timeline"].as_array().unwrap();
    assert_eq!(timeline[0]["label"], "Order Confirmed");
    assert_eq!(timeline.last().unwrap()["label"], "Delivered");

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/track/DLV00000000000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_tracking_never_resolves_another_restaurants_order() {
    let (app, stores) = test_app().await;
    stores
        .restaurants
        .insert_restaurant(&Restaurant {
            id: "rest-2".to_string(),
            name: "Second Kitchen".to_string(),
            average_prep_time: 15,
            delivery_fee: 4.0,
            created_at: Utc::now(),
        })
        .await
        .unwrap();

    let first = read_json(
        app.clone()
            .oneshot(tenant_request("POST", "/api/orders", Some(order_payload())))
            .await
            .unwrap(),
    )
    .await;

    let mut payload = order_payload();
    payload["customer_name"] = json!("Bob Martin");
    let second = read_json(
        app.clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/orders")
                    .header("x-restaurant-id", "rest-2")
                    .header("x-user-id", "user-2")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap(),
    )
    .await;

    // Both are each tenant's first order of the day, yet the numbers differ
    assert_ne!(first["order_number"], second["order_number"]);

    // The public lookup resolves exactly the order the number belongs to
    let number = second["order_number"].as_str().unwrap();
    let tracking = read_json(
        app.oneshot(
            Request::builder()
                .uri(format!("/api/track/{}", number))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap(),
    )
    .await;
    assert_eq!(tracking["customer_name"], "Bob Martin");
    assert_eq!(tracking["delivery_fee"], 4.0);
}

#[tokio::test]
async fn test_restaurant_settings_update() {
    let (app, _stores) = test_app().await;

    let response = app
        .clone()
        .oneshot(tenant_request(
            "PUT",
            "/api/restaurant/settings",
            Some(json!({ "average_prep_time": 35, "delivery_fee": 3.5 })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let restaurant = read_json(response).await;
    assert_eq!(restaurant["average_prep_time"], 35);
    assert_eq!(restaurant["delivery_fee"], 3.5);

    // New orders pick up the new default fee
    let order = read_json(
        app.oneshot(tenant_request("POST", "/api/orders", Some(order_payload())))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(order["delivery_fee"], 3.5);
    assert_eq!(order["total_amount"], 27.5);

    let (app, _stores) = test_app().await;
    let response = app
        .oneshot(tenant_request(
            "PUT",
            "/api/restaurant/settings",
            Some(json!({ "average_prep_time": 0 })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
