/// End-to-end tests against PostgreSQL
///
/// These tests drive the full router over a real database:
/// - Register, login and user details
/// - Catalog pagination and lookups
/// - Cart lifecycle (add → list → resize → pay → locked)
///
/// Run with `DATABASE_URL` set and `cargo test -- --ignored`.

mod common;

use axum::http::{Method, StatusCode};
use common::{bearer, send, TestContext};
use serde_json::json;
use storefront_shared::models::city::{City, CreateCity};
use uuid::Uuid;

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_register_then_login() {
    let ctx = TestContext::new().await.unwrap();
    let email = format!("Budi-{}@Example.com", Uuid::new_v4());

    let (status, body) = send(
        &ctx.app,
        Method::POST,
        "/register",
        None,
        Some(json!({ "email": email, "password": "rahasia" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "successfully registered");

    // Emails are compared case-insensitively
    let (status, body) = send(
        &ctx.app,
        Method::POST,
        "/register",
        None,
        Some(json!({ "email": email.to_lowercase(), "password": "lain" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Email already exists");

    let (status, body) = send(
        &ctx.app,
        Method::POST,
        "/login",
        None,
        Some(json!({ "email": email, "password": "salah" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid email or password");

    let (status, body) = send(
        &ctx.app,
        Method::POST,
        "/login",
        None,
        Some(json!({ "email": email, "password": "rahasia" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["access_token"].as_str().unwrap().to_string();

    let (status, body) = send(
        &ctx.app,
        Method::GET,
        "/userDetails",
        Some(&format!("Bearer {}", token)),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], email.to_lowercase());
    assert!(body.get("passwordHash").is_none());

    let user_id = body["id"].as_i64().unwrap() as i32;
    storefront_shared::models::user::User::delete(&ctx.db, user_id)
        .await
        .unwrap();
    ctx.cleanup().await.unwrap();
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_login_unknown_email() {
    let ctx = TestContext::new().await.unwrap();

    let (status, _) = send(
        &ctx.app,
        Method::POST,
        "/login",
        None,
        Some(json!({ "email": format!("ghost-{}@example.com", Uuid::new_v4()), "password": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_update_user_details() {
    let ctx = TestContext::new().await.unwrap();
    let city = City::create(
        &ctx.db,
        CreateCity {
            province: "Jawa Barat".to_string(),
            kind: "Kota".to_string(),
            city_name: format!("Bandung {}", Uuid::new_v4()),
        },
    )
    .await
    .unwrap();

    let (status, body) = ctx
        .request(
            Method::PUT,
            "/userDetails",
            Some(json!({
                "fullName": "Budi Santoso",
                "phoneNumber": "08123456789",
                "postalCode": 40111,
                "CityId": city.id,
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "successfully update user details");

    // Fields left out keep their values
    let (status, _) = ctx
        .request(Method::PUT, "/userDetails", Some(json!({ "address": "Jl. Braga 1" })))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = ctx.request(Method::GET, "/userDetails", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fullName"], "Budi Santoso");
    assert_eq!(body["address"], "Jl. Braga 1");
    assert_eq!(body["postalCode"], "40111");
    assert_eq!(body["CityId"], city.id);

    let (status, body) = ctx
        .request(Method::PUT, "/userDetails", Some(json!({ "CityId": i32::MAX })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "City not found");

    ctx.cleanup().await.unwrap();
    City::delete(&ctx.db, city.id).await.unwrap();
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_catalog() {
    let ctx = TestContext::new().await.unwrap();

    let uri = format!("/products?categoryId={}&limit=5", ctx.category.id);
    let (status, body) = ctx.request(Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalItems"], 1);
    assert_eq!(body["totalPages"], 1);
    assert_eq!(body["currentPage"], 1);
    assert_eq!(body["data"][0]["id"], ctx.product.id);
    assert_eq!(body["data"][0]["sizes"], json!(["S", "M", "L"]));

    let uri = format!("/products?categoryId={}&page=2", ctx.category.id);
    let (_, body) = ctx.request(Method::GET, &uri, None).await;
    assert_eq!(body["currentPage"], 2);
    assert_eq!(body["data"], json!([]));

    let (status, _) = ctx.request(Method::GET, "/products?categoryId=abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = ctx
        .request(Method::GET, &format!("/products/{}", ctx.product.id), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], ctx.product.name);
    assert_eq!(body["CategoryId"], ctx.category.id);

    let (status, body) = ctx.request(Method::GET, "/products/2147483647", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Product not found");

    let (status, _) = ctx.request(Method::GET, "/products/abc", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = ctx.request(Method::GET, "/cities", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["cities"].is_array());

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_cart_lifecycle() {
    let ctx = TestContext::new().await.unwrap();
    let add_uri = format!("/orders/addToCart/{}", ctx.product.id);

    let (status, body) = ctx.request(Method::GET, "/orders?filter=onCart", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_null());

    let (status, body) = ctx.request(Method::POST, &add_uri, Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "missing size");

    let (status, body) = ctx
        .request(Method::POST, &add_uri, Some(json!({ "size": "M" })))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "successfully added product to your cart");

    let (status, _) = ctx
        .request(Method::POST, &add_uri, Some(json!({ "size": "L" })))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = ctx
        .request(
            Method::POST,
            "/orders/addToCart/2147483647",
            Some(json!({ "size": "L" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, cart) = ctx.request(Method::GET, "/orders", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["status"], "onCart");
    assert_eq!(cart["UserId"], ctx.user.id);
    let lines = cart["OrderDetails"].as_array().unwrap();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["Product"]["id"], ctx.product.id);

    let order_id = cart["id"].as_i64().unwrap();
    let first_line = lines[0]["id"].as_i64().unwrap();
    let second_line = lines[1]["id"].as_i64().unwrap();

    let (status, body) = ctx
        .request(
            Method::PATCH,
            &format!("/orders/lines/{}", first_line),
            Some(json!({ "size": "S" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "successfully update order's size");

    let (status, body) = ctx
        .request(Method::DELETE, &format!("/orders/lines/{}", second_line), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "successfully removed selected item from your cart");

    let (_, cart) = ctx.request(Method::GET, "/orders?filter=onCart", None).await;
    let lines = cart["OrderDetails"].as_array().unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["size"], "S");

    let (status, body) = ctx
        .request(Method::PATCH, &format!("/orders/{}/complete", order_id), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "successfully update order's status");

    // Paid orders are locked
    let (status, _) = ctx
        .request(Method::PATCH, &format!("/orders/{}/complete", order_id), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = ctx
        .request(
            Method::PATCH,
            &format!("/orders/lines/{}", first_line),
            Some(json!({ "size": "XL" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = ctx
        .request(Method::DELETE, &format!("/orders/lines/{}", first_line), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, body) = ctx.request(Method::GET, "/orders?filter=onCart", None).await;
    assert!(body.is_null());

    let (status, completed) = ctx.request(Method::GET, "/orders?filter=Completed", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(completed["id"], order_id);
    assert_eq!(completed["status"], "Completed");

    let (status, _) = ctx.request(Method::GET, "/orders?filter=shipped", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // A new add starts a fresh cart
    let (status, _) = ctx
        .request(Method::POST, &add_uri, Some(json!({ "size": "M" })))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let (_, cart) = ctx.request(Method::GET, "/orders", None).await;
    assert_ne!(cart["id"], order_id);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_cart_is_private() {
    let mut ctx = TestContext::new().await.unwrap();
    let other = ctx.another_user().await.unwrap();
    let other_auth = bearer(other.id);

    let (status, _) = ctx
        .request(
            Method::POST,
            &format!("/orders/addToCart/{}", ctx.product.id),
            Some(json!({ "size": "M" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, cart) = ctx.request(Method::GET, "/orders", None).await;
    let order_id = cart["id"].as_i64().unwrap();
    let line_id = cart["OrderDetails"][0]["id"].as_i64().unwrap();

    let (_, body) = send(&ctx.app, Method::GET, "/orders", Some(&other_auth), None).await;
    assert!(body.is_null());

    let (status, body) = send(
        &ctx.app,
        Method::PATCH,
        &format!("/orders/lines/{}", line_id),
        Some(&other_auth),
        Some(json!({ "size": "XL" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Order detail not found");

    let (status, _) = send(
        &ctx.app,
        Method::DELETE,
        &format!("/orders/lines/{}", line_id),
        Some(&other_auth),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &ctx.app,
        Method::PATCH,
        &format!("/orders/{}/complete", order_id),
        Some(&other_auth),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Order not found");

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_token_for_deleted_user_rejected() {
    let mut ctx = TestContext::new().await.unwrap();
    let other = ctx.another_user().await.unwrap();
    let auth = bearer(other.id);

    storefront_shared::models::user::User::delete(&ctx.db, other.id)
        .await
        .unwrap();

    let (status, _) = send(&ctx.app, Method::GET, "/userDetails", Some(&auth), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_cart_requests_for_missing_ids() {
    let ctx = TestContext::new().await.unwrap();

    // Size is checked before the product, so an unknown product still gets 400
    let (status, body) = ctx
        .request(Method::POST, "/orders/addToCart/2147483647", Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "missing size");

    let (status, body) = ctx.request(Method::POST, "/orders/addToCart/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "missing size");

    let (_, body) = ctx.request(Method::GET, "/orders", None).await;
    assert!(body.is_null(), "rejected adds must not open a cart");

    let (status, body) = ctx
        .request(
            Method::PATCH,
            "/orders/lines/2147483647",
            Some(json!({ "size": "M" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Order detail not found");

    let (status, body) = ctx
        .request(Method::DELETE, "/orders/lines/2147483647", None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Order detail not found");

    let (status, body) = ctx
        .request(Method::PATCH, "/orders/2147483647/complete", None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Order not found");

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_malformed_query_is_json_error() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = ctx
        .request(Method::GET, "/orders?filter=onCart&filter=Completed", None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");

    let (status, body) = ctx
        .request(Method::GET, "/products?page=1&page=2", None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");

    ctx.cleanup().await.unwrap();
}
