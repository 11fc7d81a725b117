//! Admin API tests

#[path = "../common/mod.rs"]
mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;

use common::*;

#[tokio::test]
async fn test_admin_requires_bearer_key() {
    let state = create_test_app_state();

    let (status, body) = send(app(state.clone()), get_request("/admin/products")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Unauthorized");

    let wrong = Request::builder()
        .uri("/admin/products")
        .header("Authorization", "Bearer nope")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(app(state), wrong).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_disabled_without_configured_key() {
    let state = AppState {
        admin_api_key: None,
        ..create_test_app_state()
    };

    let (status, _) = send(app(state), admin_request("GET", "/admin/products", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_upsert_product_converts_decimal_price() {
    let state = create_test_app_state();
    let body = json!({
        "sku": "BOOK1",
        "name": "Livro",
        "price": "29.90",
        "category": "livros",
        "delivery_url": "https://cdn.example/livro.pdf"
    });

    let (status, json) = send(app(state.clone()), admin_request("PUT", "/admin/products", Some(&body))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["sku"], "BOOK1");
    assert_eq!(json["price_cents"], 2990);
    assert_eq!(json["description"], "");

    let conn = state.db.get().unwrap();
    let stored = queries::get_product(&conn, "BOOK1").unwrap().unwrap();
    assert_eq!(stored.price_cents, 2990);
    assert_eq!(stored.category, "livros");
}

#[tokio::test]
async fn test_upsert_product_accepts_numeric_price() {
    let state = create_test_app_state();
    let body = json!({"sku": "BOOK1", "name": "Livro", "price": 10});

    let (status, json) = send(app(state), admin_request("PUT", "/admin/products", Some(&body))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["price_cents"], 1000);
    assert_eq!(json["category"], "geral");
}

#[tokio::test]
async fn test_upsert_product_validation() {
    let state = create_test_app_state();

    for body in [
        json!({"sku": " ", "name": "Livro", "price": "10"}),
        json!({"sku": "BOOK1", "name": "", "price": "10"}),
        json!({"sku": "BOOK1", "name": "Livro", "price": "-1"}),
        json!({"sku": "BOOK1", "name": "Livro"}),
    ] {
        let (status, json) =
            send(app(state.clone()), admin_request("PUT", "/admin/products", Some(&body))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {} should be rejected", body);
        assert_eq!(json["error"], "Bad request");
    }

    let conn = state.db.get().unwrap();
    assert_eq!(queries::count_products(&conn).unwrap(), 0);
}

#[tokio::test]
async fn test_list_products() {
    let state = create_test_app_state();
    {
        let conn = state.db.get().unwrap();
        create_test_product(&conn, "B", "Bônus", 100);
        create_test_product(&conn, "A", "Apostila", 200);
    }

    let (status, json) = send(app(state), admin_request("GET", "/admin/products", None)).await;
    assert_eq!(status, StatusCode::OK);
    let skus: Vec<_> = json.as_array().unwrap().iter().map(|p| p["sku"].clone()).collect();
    assert_eq!(skus, [json!("A"), json!("B")]);
}

#[tokio::test]
async fn test_set_delivery_url() {
    let state = create_test_app_state();
    {
        let conn = state.db.get().unwrap();
        create_book(&conn);
    }

    let body = json!({"delivery_url": "https://cdn.example/b.pdf"});
    let (status, json) = send(
        app(state.clone()),
        admin_request("PUT", "/admin/products/BOOK1/delivery-url", Some(&body)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["delivery_url"], "https://cdn.example/b.pdf");

    let (status, json) = send(
        app(state),
        admin_request("PUT", "/admin/products/GHOST/delivery-url", Some(&body)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["details"], "SKU não encontrado.");
}

#[tokio::test]
async fn test_post_product_card_with_disabled_chat() {
    let state = create_test_app_state();
    {
        let conn = state.db.get().unwrap();
        create_book(&conn);
    }

    let body = json!({"channel_id": "123"});
    let (status, json) = send(
        app(state.clone()),
        admin_request("POST", "/admin/products/BOOK1/post", Some(&body)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["posted"], false);

    let (status, _) = send(
        app(state),
        admin_request("POST", "/admin/products/GHOST/post", Some(&body)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_post_product_card_gateway_failure_is_bad_gateway() {
    let state = create_test_app_state_with_failing_chat();
    {
        let conn = state.db.get().unwrap();
        create_book(&conn);
    }

    let body = json!({"channel_id": "123"});
    let (status, json) = send(
        app(state),
        admin_request("POST", "/admin/products/BOOK1/post", Some(&body)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["error"], "External service error");
}

#[tokio::test]
async fn test_list_orders_with_display_lines() {
    let state = create_test_app_state();
    {
        let conn = state.db.get().unwrap();
        for i in 0..12 {
            create_test_order(&conn, &format!("{}", 100 + i), &[("BOOK1", 1)], 1000);
        }
    }

    let (status, json) = send(app(state.clone()), admin_request("GET", "/admin/orders", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["orders"].as_array().unwrap().len(), 10, "default limit is 10");
    assert_eq!(json["lines"][0], "#12 • user:111 • pendente • R$ 10,00");

    let (_, json) = send(app(state), admin_request("GET", "/admin/orders?limit=2", None)).await;
    assert_eq!(json["orders"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_get_order() {
    let state = create_test_app_state();
    let order = {
        let conn = state.db.get().unwrap();
        create_test_order(&conn, "42", &[("BOOK1", 2)], 2000)
    };

    let (status, json) = send(
        app(state.clone()),
        admin_request("GET", &format!("/admin/orders/{}", order.id), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "pendente");
    assert_eq!(json["items"]["BOOK1"], 2);

    let (status, json) = send(app(state.clone()), admin_request("GET", "/admin/orders/999", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["details"], "Pedido não encontrado.");

    let (status, _) = send(app(state), admin_request("GET", "/admin/orders/abc", None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_reissue_payment_link_endpoint() {
    let state = create_test_app_state();
    let order = {
        let conn = state.db.get().unwrap();
        create_test_order(&conn, "42", &[("BOOK1", 1)], 1000)
    };
    let uri = format!("/admin/orders/{}/payment-link", order.id);

    let (status, json) = send(app(state.clone()), admin_request("POST", &uri, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "aguardando_pagamento");
    assert_eq!(
        json["payment_link"],
        format!("https://pagamento.exemplo/ordem/{}", order.id)
    );

    let (status, json) = send(app(state), admin_request("POST", &uri, None)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"], "Conflict");
}
