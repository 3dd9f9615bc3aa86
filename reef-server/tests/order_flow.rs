//! End-to-end order workflow over the HTTP surface
//!
//! Drives the assembled router with oneshot requests against an in-memory
//! database: register/login, catalog setup, order creation with computed
//! totals, expansion queries, aggregates, status lifecycle and cascading
//! deletion.

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use reef_server::api;
use reef_server::auth::{AuthGateConfig, JwtConfig};
use reef_server::core::{Config, ServerState};
use serde_json::{Value, json};
use tower::ServiceExt;

const API: &str = "/api/v1";

fn test_config() -> Config {
    Config {
        work_dir: ".".into(),
        http_port: 0,
        api_base: API.into(),
        jwt: JwtConfig {
            secret: "integration-test-secret-key-0000000000000".into(),
            expiration_minutes: 60,
            issuer: "reef-server".into(),
            audience: "reef-clients".into(),
        },
        auth_gate: AuthGateConfig::for_api_base(API),
        environment: "test".into(),
    }
}

async fn test_app() -> Router {
    let config = test_config();
    let state = ServerState::initialize_in_memory(&config).await;
    api::build_router(state)
}

async fn send(
    app: &Router,
    method: &str,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json_body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json_body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

/// Register a user and log in, returning (user_id, token)
async fn register_and_login(app: &Router, email: &str, is_admin: bool) -> (String, String) {
    let (status, user) = send(
        app,
        "POST",
        &format!("{API}/users/register"),
        None,
        Some(json!({
            "name": "Integration Tester",
            "email": email,
            "password": "a-long-enough-password",
            "is_admin": is_admin,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let user_id = user["id"].as_str().unwrap().to_string();

    let (status, login) = send(
        app,
        "POST",
        &format!("{API}/users/login"),
        None,
        Some(json!({ "email": email, "password": "a-long-enough-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = login["token"].as_str().unwrap().to_string();

    (user_id, token)
}

/// Create a category and products with the given (name, price) pairs,
/// returning the product ids
async fn seed_catalog(app: &Router, token: &str, products: &[(&str, &str)]) -> Vec<String> {
    let (status, category) = send(
        app,
        "POST",
        &format!("{API}/categories"),
        Some(token),
        Some(json!({ "name": "Integration", "icon": "box", "color": "#336699" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let category_id = category["id"].as_str().unwrap().to_string();

    let mut ids = Vec::new();
    for (name, price) in products {
        let (status, product) = send(
            app,
            "POST",
            &format!("{API}/products"),
            Some(token),
            Some(json!({
                "name": name,
                "price": price,
                "category": category_id,
                "count_in_stock": 50,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "product create failed: {product}");
        ids.push(product["id"].as_str().unwrap().to_string());
    }
    ids
}

fn order_body(user: &str, items: Value) -> Value {
    json!({
        "order_items": items,
        "shipping_address1": "42 Quay Street",
        "city": "Galway",
        "zip": "H91",
        "country": "IE",
        "phone": "+353000000",
        "user": user,
    })
}

#[tokio::test]
async fn full_order_workflow() {
    let app = test_app().await;
    let (user_id, token) = register_and_login(&app, "admin@example.com", true).await;
    let products = seed_catalog(&app, &token, &[("p1", "15.00"), ("p2", "9.99")]).await;

    // Empty aggregates are valid zeros, not errors
    let (status, body) = send(&app, "GET", &format!("{API}/orders/get/count"), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["orderCount"], json!(0));

    let (status, body) =
        send(&app, "GET", &format!("{API}/orders/get/totalsales"), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalsales"], json!("0"));

    // Create: 2 x 15.00 + 1 x 9.99 = 39.99
    let (status, order) = send(
        &app,
        "POST",
        &format!("{API}/orders"),
        Some(&token),
        Some(order_body(
            &user_id,
            json!([
                { "product": products[0], "quantity": 2 },
                { "product": products[1], "quantity": 1 },
            ]),
        )),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "order create failed: {order}");
    assert_eq!(order["total_price"], json!("39.99"));
    assert_eq!(order["order_items"].as_array().unwrap().len(), 2);
    assert_eq!(order["status"], json!("PENDING"));
    let order_id = order["id"].as_str().unwrap().to_string();

    // List: one order, expanded with the user's display name only
    let (status, list) = send(&app, "GET", &format!("{API}/orders"), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let list = list.as_array().unwrap().clone();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["user_name"], json!("Integration Tester"));

    // Get by id: nested expansion down to the product's category
    let (status, expanded) =
        send(&app, "GET", &format!("{API}/orders/{order_id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let items = expanded["order_items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["product"]["name"], json!("p1"));
    assert_eq!(items[0]["product"]["category"]["name"], json!("Integration"));
    assert_eq!(items[1]["product"]["name"], json!("p2"));
    assert_eq!(expanded["user"]["name"], json!("Integration Tester"));
    assert!(expanded["user"].get("password_hash").is_none());

    // Per-user filter
    let (status, user_orders) = send(
        &app,
        "GET",
        &format!("{API}/orders/get/userorders/{user_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user_orders.as_array().unwrap().len(), 1);

    // Aggregates after one order
    let (_, body) = send(&app, "GET", &format!("{API}/orders/get/count"), Some(&token), None).await;
    assert_eq!(body["orderCount"], json!(1));
    let (_, body) =
        send(&app, "GET", &format!("{API}/orders/get/totalsales"), Some(&token), None).await;
    assert_eq!(body["totalsales"], json!("39.99"));

    // Status lifecycle: Pending -> Shipped is legal and only touches status
    let (status, updated) = send(
        &app,
        "PUT",
        &format!("{API}/orders/{order_id}"),
        Some(&token),
        Some(json!({ "status": "SHIPPED" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], json!("SHIPPED"));
    assert_eq!(updated["total_price"], json!("39.99"));
    assert_eq!(updated["order_items"].as_array().unwrap().len(), 2);

    // Shipped -> Cancelled is not in the transition table
    let (status, _) = send(
        &app,
        "PUT",
        &format!("{API}/orders/{order_id}"),
        Some(&token),
        Some(json!({ "status": "CANCELLED" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Delete cascades: the order and its line items are gone
    let item_ids: Vec<String> = order["order_items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect();

    let (status, deleted) = send(
        &app,
        "DELETE",
        &format!("{API}/orders/{order_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["success"], json!(true));

    let (status, _) =
        send(&app, "GET", &format!("{API}/orders/{order_id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(!item_ids.is_empty());

    let (_, body) = send(&app, "GET", &format!("{API}/orders/get/count"), Some(&token), None).await;
    assert_eq!(body["orderCount"], json!(0));
}

#[tokio::test]
async fn totalsales_sums_all_orders() {
    let app = test_app().await;
    let (user_id, token) = register_and_login(&app, "sales@example.com", true).await;
    let products =
        seed_catalog(&app, &token, &[("a", "10.00"), ("b", "20.00"), ("c", "30.00")]).await;

    for product in &products {
        let (status, _) = send(
            &app,
            "POST",
            &format!("{API}/orders"),
            Some(&token),
            Some(order_body(
                &user_id,
                json!([{ "product": product, "quantity": 1 }]),
            )),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, body) =
        send(&app, "GET", &format!("{API}/orders/get/totalsales"), Some(&token), None).await;
    assert_eq!(body["totalsales"], json!("60.00"));
    let (_, body) = send(&app, "GET", &format!("{API}/orders/get/count"), Some(&token), None).await;
    assert_eq!(body["orderCount"], json!(3));
}

#[tokio::test]
async fn orders_sorted_newest_first_and_empty_user_list_is_ok() {
    let app = test_app().await;
    let (user_id, token) = register_and_login(&app, "sorted@example.com", true).await;
    let products = seed_catalog(&app, &token, &[("x", "1.00")]).await;

    // A user with no orders gets an empty list, not an error
    let (status, empty) = send(
        &app,
        "GET",
        &format!("{API}/orders/get/userorders/{user_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(empty.as_array().unwrap().len(), 0);

    for _ in 0..3 {
        let (status, _) = send(
            &app,
            "POST",
            &format!("{API}/orders"),
            Some(&token),
            Some(order_body(
                &user_id,
                json!([{ "product": products[0], "quantity": 1 }]),
            )),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, list) = send(&app, "GET", &format!("{API}/orders"), Some(&token), None).await;
    let dates: Vec<i64> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["date_ordered"].as_i64().unwrap())
        .collect();
    assert_eq!(dates.len(), 3);
    assert!(dates.windows(2).all(|w| w[0] >= w[1]), "not sorted descending: {dates:?}");
}

#[tokio::test]
async fn validation_failures_are_rejected() {
    let app = test_app().await;
    let (user_id, token) = register_and_login(&app, "invalid@example.com", true).await;
    let products = seed_catalog(&app, &token, &[("p", "5.00")]).await;

    // Zero quantity
    let (status, _) = send(
        &app,
        "POST",
        &format!("{API}/orders"),
        Some(&token),
        Some(order_body(
            &user_id,
            json!([{ "product": products[0], "quantity": 0 }]),
        )),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Empty item list
    let (status, _) = send(
        &app,
        "POST",
        &format!("{API}/orders"),
        Some(&token),
        Some(order_body(&user_id, json!([]))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Unknown product reference
    let (status, _) = send(
        &app,
        "POST",
        &format!("{API}/orders"),
        Some(&token),
        Some(order_body(
            &user_id,
            json!([{ "product": "product:nope", "quantity": 1 }]),
        )),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Status update on a nonexistent order
    let (status, _) = send(
        &app,
        "PUT",
        &format!("{API}/orders/order:missing"),
        Some(&token),
        Some(json!({ "status": "SHIPPED" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Delete on a nonexistent order
    let (status, body) = send(
        &app,
        "DELETE",
        &format!("{API}/orders/order:missing"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_ne!(body["success"], json!(true));
}

#[tokio::test]
async fn auth_gate_covers_the_order_surface() {
    let app = test_app().await;

    // No credential
    let (status, _) = send(&app, "GET", &format!("{API}/orders"), None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        "POST",
        &format!("{API}/orders"),
        None,
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Garbage credential
    let (status, _) = send(&app, "GET", &format!("{API}/orders"), Some("not-a-token"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Catalog reads stay public
    let (status, _) = send(&app, "GET", &format!("{API}/products"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "GET", &format!("{API}/categories"), None, None).await;
    assert_eq!(status, StatusCode::OK);

    // Health stays public
    let (status, body) = send(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("ok"));

    // Catalog mutations need an admin
    let (_, token) = register_and_login(&app, "shopper@example.com", false).await;
    let (status, _) = send(
        &app,
        "POST",
        &format!("{API}/categories"),
        Some(&token),
        Some(json!({ "name": "Nope" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
