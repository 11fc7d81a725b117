//! Shop endpoint tests

#[path = "../common/mod.rs"]
mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::*;

fn state_with_book() -> AppState {
    let state = create_test_app_state();
    {
        let conn = state.db.get().unwrap();
        create_book(&conn);
    }
    state
}

#[tokio::test]
async fn test_health() {
    let (status, json) = send(app(create_test_app_state()), get_request("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({"ok": true, "service": "vitrine"}));
}

#[tokio::test]
async fn test_view_empty_cart() {
    let (status, json) = send(app(create_test_app_state()), get_request("/shop/42/cart")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["text"], "Seu carrinho está vazio.");
    assert_eq!(json["total_cents"], 0);
}

#[tokio::test]
async fn test_add_item_defaults_to_one() {
    let state = state_with_book();

    let (status, json) = send(
        app(state.clone()),
        json_request("POST", "/shop/42/cart/items", &json!({"sku": "BOOK1"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["items"]["BOOK1"], 1);
    assert_eq!(json["total_display"], "R$ 10,00");

    let (_, json) = send(
        app(state),
        json_request("POST", "/shop/42/cart/items", &json!({"sku": "BOOK1", "quantity": 3})),
    )
    .await;
    assert_eq!(json["items"]["BOOK1"], 4);
    assert_eq!(json["text"], "• Livro (x4) — R$ 40,00\n\n**Total:** R$ 40,00");
}

#[tokio::test]
async fn test_add_unknown_sku_is_not_found() {
    let state = state_with_book();

    let (status, json) = send(
        app(state.clone()),
        json_request("POST", "/shop/42/cart/items", &json!({"sku": "GHOST"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["details"], "SKU não encontrado.");

    let conn = state.db.get().unwrap();
    assert!(queries::get_cart(&conn, "42").unwrap().is_empty());
}

#[tokio::test]
async fn test_add_zero_quantity_is_bad_request() {
    let state = state_with_book();
    let (status, _) = send(
        app(state),
        json_request("POST", "/shop/42/cart/items", &json!({"sku": "BOOK1", "quantity": 0})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_checkout_endpoint() {
    let state = state_with_book();
    send(
        app(state.clone()),
        json_request("POST", "/shop/42/cart/items", &json!({"sku": "BOOK1", "quantity": 2})),
    )
    .await;

    let (status, json) = send(app(state.clone()), json_request("POST", "/shop/42/checkout", &json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "aguardando_pagamento");
    assert_eq!(json["total_cents"], 2000);
    let order_id = json["order_id"].as_i64().unwrap();
    assert_eq!(
        json["payment_link"],
        format!("https://pagamento.exemplo/ordem/{}", order_id)
    );

    let (_, cart) = send(app(state), get_request("/shop/42/cart")).await;
    assert_eq!(cart["text"], "Seu carrinho está vazio.");
}

#[tokio::test]
async fn test_checkout_empty_cart_is_bad_request() {
    let (status, json) = send(
        app(create_test_app_state()),
        json_request("POST", "/shop/42/checkout", &json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["details"], "Carrinho vazio!");
}

#[tokio::test]
async fn test_checkout_processor_down_is_bad_gateway() {
    let state = create_test_app_state_with_failing_payments();
    {
        let mut conn = state.db.get().unwrap();
        create_book(&conn);
        add_to_cart(&mut conn, "42", "BOOK1", 1);
    }

    let (status, json) = send(app(state.clone()), json_request("POST", "/shop/42/checkout", &json!({}))).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(json["details"].as_str().unwrap().contains("#1"));
    assert_eq!(order_status(&state, 1), OrderStatus::Pending);
}

#[tokio::test]
async fn test_unreadable_stored_cart_is_server_error() {
    let state = create_test_app_state();
    {
        let conn = state.db.get().unwrap();
        conn.execute(
            "INSERT INTO carts (user_id, items_json) VALUES ('42', '{\"BOOK1\": \"two\"}')",
            [],
        )
        .unwrap();
    }

    let (status, json) = send(app(state), get_request("/shop/42/cart")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "Internal server error");
}
