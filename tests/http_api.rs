mod common;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode},
};
use checkout_service::routes::create_app;
use rust_decimal_macros::dec;
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use common::{Harness, item};

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request");

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, json)
}

#[tokio::test]
async fn checkout_lifecycle_over_http() {
    let h = Harness::new();
    let user = h.store.insert_user("lena", "lena@example.com");
    let product = h.store.insert_product("Ferris Tee", dec!(20));
    h.store.add_to_cart(user, product, 1);
    let app = create_app(h.state.clone());

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/checkout",
        Some(json!({
            "user_id": user,
            "address": "1 Main St",
            "phone_number": "555-0101",
            "email": "lena@example.com",
            "items": json!([item(product, 2, "20")]).to_string(),
            "total_price": "40"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["status"], "Pending");
    assert_eq!(body["data"]["user"]["username"], "lena");
    let id = body["data"]["id"].as_str().expect("id").to_string();
    assert!(h.store.cart(user).is_empty());

    let (status, body) = call(&app, Method::GET, "/api/checkout", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 1);

    let (status, body) = call(&app, Method::GET, &format!("/api/checkout/user/{user}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"][0]["id"], id.as_str());

    let (status, body) = call(
        &app,
        Method::PATCH,
        &format!("/api/checkout/{id}/status"),
        Some(json!({ "status": "Refund" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "Refund");
    assert_eq!(h.sender.sent().len(), 1);

    let (status, body) = call(&app, Method::GET, "/api/checkout/summary", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["metrics"]["total_orders"], 1);
    assert_eq!(body["data"]["top_customers"][0]["username"], "lena");

    let (status, _) = call(&app, Method::DELETE, &format!("/api/checkout/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = call(&app, Method::GET, &format!("/api/checkout/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["data"]["kind"], "not_found");
}

#[tokio::test]
async fn error_kinds_map_to_status_codes() {
    let h = Harness::new();
    let app = create_app(h.state.clone());
    let missing = Uuid::new_v4();

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/checkout",
        Some(json!({ "email": "x@example.com", "items": "[", "total_price": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["data"]["kind"], "validation_error");

    let (status, body) = call(
        &app,
        Method::PATCH,
        &format!("/api/checkout/{missing}/status"),
        Some(json!({ "status": "Lost" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["data"]["kind"], "invalid_status");

    let (status, _) = call(
        &app,
        Method::PATCH,
        &format!("/api/checkout/{missing}/status"),
        Some(json!({ "status": "Shipped" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(&app, Method::DELETE, &format!("/api/checkout/{missing}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = call(&app, Method::GET, &format!("/api/checkout/user/{missing}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "No checkouts found for this user");

    let (status, body) = call(&app, Method::GET, "/api/checkout", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"], json!([]));

    let (status, _) = call(&app, Method::GET, "/api/checkout/summary?tz_offset_minutes=5000", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(&app, Method::GET, "/api/nowhere", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    for bad in [json!({ "status": 5 }), json!({ "status": null }), json!({})] {
        let (status, body) = call(
            &app,
            Method::PATCH,
            &format!("/api/checkout/{missing}/status"),
            Some(bad.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{bad}");
        assert_eq!(body["data"]["kind"], "invalid_status", "{bad}");
    }

    for uri in [
        "/api/checkout/not-a-uuid",
        "/api/checkout/user/not-a-uuid",
    ] {
        let (status, body) = call(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body["data"]["kind"], "not_found", "{uri}");
    }
    let (status, body) = call(
        &app,
        Method::PATCH,
        "/api/checkout/not-a-uuid/status",
        Some(json!({ "status": "Shipped" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Checkout not found");

    for bad in [
        json!({ "email": "x@example.com", "items": 5, "total_price": 1 }),
        json!({ "email": "x@example.com", "items": "[]", "total_price": "abc" }),
    ] {
        let (status, body) = call(&app, Method::POST, "/api/checkout", Some(bad.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{bad}");
        assert_eq!(body["data"]["kind"], "validation_error", "{bad}");
    }

    for uri in [
        "/api/checkout?page=abc",
        "/api/checkout?sort_order=sideways",
        "/api/checkout/summary?tz_offset_minutes=soon",
        "/api/checkout/summary?tz_offset_minutes=-2147483648",
    ] {
        let (status, body) = call(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["data"]["kind"], "validation_error", "{uri}");
    }
}

#[tokio::test]
async fn far_away_page_is_empty() {
    let h = Harness::new();
    let app = create_app(h.state.clone());
    let (status, _) = call(
        &app,
        Method::POST,
        "/api/checkout",
        Some(json!({
            "email": "pat@example.com",
            "items": [item(Uuid::new_v4(), 1, "3")],
            "total_price": "3"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = call(
        &app,
        Method::GET,
        "/api/checkout?page=9223372036854775807&per_page=100",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"], json!([]));
    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["meta"]["page"], i64::MAX);
}
