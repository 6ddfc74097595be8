use std::sync::Arc;

use super::*;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{json, Value};
use shared::domain::{OrderId, PizzaId, PizzaSize};
use tokio::{
    net::TcpListener,
    sync::{oneshot, Mutex},
};

#[derive(Clone)]
struct ServerState {
    order_tx: Arc<Mutex<Option<oneshot::Sender<Value>>>>,
}

#[derive(Deserialize)]
struct PageQuery {
    page: u32,
}

async fn handle_pizzas() -> Json<Value> {
    Json(json!([
        {
            "id": "pepperoni",
            "name": "The Pepperoni Pizza",
            "description": "Mozzarella Cheese, Pepperoni",
            "image": "/public/pizzas/pepperoni.webp",
            "sizes": { "S": 9.75, "M": 12.25, "L": 15.25 }
        },
        {
            "id": "mystery",
            "name": "Mystery Pizza",
            "description": "",
            "image": "/public/pizzas/mystery.webp"
        }
    ]))
}

async fn handle_past_orders(Query(query): Query<PageQuery>) -> Json<Value> {
    let count = if query.page >= 3 { 4 } else { 10 };
    let rows: Vec<Value> = (0..count)
        .map(|i| {
            json!({
                "order_id": query.page * 100 + i,
                "date": "2024-03-01",
                "time": "18:22:10"
            })
        })
        .collect();
    Json(Value::Array(rows))
}

async fn handle_order(State(state): State<ServerState>, Json(payload): Json<Value>) -> StatusCode {
    if let Some(tx) = state.order_tx.lock().await.take() {
        let _ = tx.send(payload);
    }
    StatusCode::OK
}

async fn spawn_pizza_server(
    pizzas_body: Option<&'static str>,
    order_status: StatusCode,
) -> (String, oneshot::Receiver<Value>) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let (tx, rx) = oneshot::channel();
    let state = ServerState {
        order_tx: Arc::new(Mutex::new(Some(tx))),
    };

    let pizzas: Router<ServerState> = match pizzas_body {
        Some(body) => Router::new().route("/api/pizzas", get(move || async move { body })),
        None => Router::new().route("/api/pizzas", get(handle_pizzas)),
    };
    let order: Router<ServerState> = if order_status.is_success() {
        Router::new().route("/api/order", post(handle_order))
    } else {
        Router::new().route("/api/order", post(move || async move { order_status }))
    };
    let app = pizzas
        .merge(order)
        .route("/api/past-orders", get(handle_past_orders))
        .with_state(state);

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}/"), rx)
}

#[tokio::test]
async fn fetches_catalog_with_optional_sizes() {
    let (url, _rx) = spawn_pizza_server(None, StatusCode::OK).await;
    let api = HttpPizzaApi::new(url);

    let pizzas = api.fetch_catalog().await.expect("catalog");
    assert_eq!(pizzas.len(), 2);
    assert_eq!(pizzas[0].id, PizzaId::new("pepperoni"));
    assert_eq!(pizzas[0].price_for(PizzaSize::M), Some(Decimal::new(1225, 2)));
    assert_eq!(pizzas[1].sizes, None);
}

#[tokio::test]
async fn fetches_requested_page() {
    let (url, _rx) = spawn_pizza_server(None, StatusCode::OK).await;
    let api = HttpPizzaApi::new(url);

    let page_two = api.fetch_past_orders(2).await.expect("page 2");
    assert_eq!(page_two.len(), 10);
    assert_eq!(page_two[0].order_id, OrderId::from(200));

    let page_three = api.fetch_past_orders(3).await.expect("page 3");
    assert_eq!(page_three.len(), 4);
}

#[tokio::test]
async fn submits_cart_under_cart_key() {
    let (url, rx) = spawn_pizza_server(None, StatusCode::OK).await;
    let api = HttpPizzaApi::new(url);
    let pizza = api.fetch_catalog().await.expect("catalog").remove(0);

    api.submit_order(&[CartItem {
        pizza,
        size: PizzaSize::L,
        price: "$15.25".to_string(),
    }])
    .await
    .expect("submit");

    let body = rx.await.expect("order body");
    assert_eq!(body["cart"][0]["size"], "L");
    assert_eq!(body["cart"][0]["price"], "$15.25");
    assert_eq!(body["cart"][0]["pizza"]["id"], "pepperoni");
}

#[tokio::test]
async fn invalid_json_is_a_parse_error() {
    let (url, _rx) = spawn_pizza_server(Some("<html>oops</html>"), StatusCode::OK).await;
    let api = HttpPizzaApi::new(url);

    let err = api.fetch_catalog().await.expect_err("must fail");
    assert!(matches!(err, ClientError::Parse { .. }), "unexpected error: {err}");
    assert!(err.endpoint().ends_with("/api/pizzas"));
}

#[tokio::test]
async fn rejected_order_reports_status() {
    let (url, _rx) = spawn_pizza_server(None, StatusCode::INTERNAL_SERVER_ERROR).await;
    let api = HttpPizzaApi::new(url);

    let err = api.submit_order(&[]).await.expect_err("must fail");
    assert!(matches!(err, ClientError::Status { status: 500, .. }));
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let api = HttpPizzaApi::new(format!("http://{addr}"));
    let err = api.fetch_past_orders(1).await.expect_err("must fail");
    assert!(matches!(err, ClientError::Network { .. }), "unexpected error: {err}");
}

#[test]
fn base_url_trailing_slash_is_trimmed() {
    let api = HttpPizzaApi::new("http://127.0.0.1:3000/");
    assert_eq!(api.base_url(), "http://127.0.0.1:3000");
    assert_eq!(api.endpoint(CATALOG_PATH), "http://127.0.0.1:3000/api/pizzas");
}
