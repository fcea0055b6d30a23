use super::*;
use crate::db::models::Restaurant;

mod test_boundary;
mod test_transitions;

const RESTAURANT: &str = "rest-1";
const OTHER_RESTAURANT: &str = "rest-2";

fn ctx() -> TenantContext {
    TenantContext::new(RESTAURANT.to_string(), "user-1".to_string())
}

fn other_ctx() -> TenantContext {
    TenantContext::new(OTHER_RESTAURANT.to_string(), "user-2".to_string())
}

async fn test_engine() -> LifecycleEngine {
    let stores = Stores::in_memory();
    for id in [RESTAURANT, OTHER_RESTAURANT] {
        stores
            .restaurants
            .insert_restaurant(&Restaurant {
                id: id.to_string(),
                name: format!("Restaurant {}", id),
                average_prep_time: 20,
                delivery_fee: 5.0,
                created_at: Utc::now(),
            })
            .await
            .unwrap();
    }
    LifecycleEngine::new(&stores)
}

async fn engine_with_stores() -> (LifecycleEngine, Stores) {
    let stores = Stores::in_memory();
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
    (LifecycleEngine::new(&stores), stores)
}

fn sample_input() -> CreateOrderInput {
    CreateOrderInput {
        customer_name: "Alice Chen".to_string(),
        customer_phone: "+34 600 000 001".to_string(),
        customer_email: None,
        delivery_address: "Calle Mayor 1, Madrid".to_string(),
        delivery_notes: None,
        items: vec![
            OrderItemInput {
                name: "Margherita Pizza".to_string(),
                quantity: 2,
                unit_price: 12.50,
            },
            OrderItemInput {
                name: "Tiramisu".to_string(),
                quantity: 1,
                unit_price: 6.00,
            },
        ],
        delivery_fee: None,
        priority: OrderPriority::Normal,
    }
}

async fn create_order(engine: &LifecycleEngine) -> Order {
    engine.create_order(&ctx(), sample_input()).await.unwrap()
}

/// Walk an order forward through the given statuses
async fn advance(engine: &LifecycleEngine, order_id: &str, path: &[OrderStatus]) -> Order {
    let mut order = None;
    for status in path {
        order = Some(
            engine
                .apply_transition(&ctx(), order_id, *status, None, None)
                .await
                .unwrap(),
        );
    }
    order.unwrap()
}

async fn seed_driver(stores: &Stores, id: &str, status: DriverStatus) -> Driver {
    let driver = Driver {
        id: id.to_string(),
        restaurant_id: RESTAURANT.to_string(),
        name: format!("Driver {}", id),
        phone: "+34 600 111 222".to_string(),
        email: None,
        vehicle_type: crate::db::models::VehicleType::Scooter,
        license_plate: Some("1234-ABC".to_string()),
        status,
        is_active: true,
        total_deliveries: 0,
        average_rating: 0.0,
        total_rating_count: 0,
        created_at: Utc::now(),
    };
    stores.drivers.insert_driver(&driver).await.unwrap();
    driver
}
