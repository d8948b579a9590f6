// tests/api_tests.rs
#[macro_use]
mod common;
use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use common::*;
use serde_json::{json, Value};

#[actix_web::test]
async fn full_shopping_scenario() {
  let state = test_state().await;
  create_user(&state, "alice", "secret").await;
  let app = init_app!(state);
  let cookie_name = state.config.session_cookie_name.clone();

  let resp = test::call_service(&app, login_request("alice", "secret").to_request()).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let session = session_cookie_from(&resp, &cookie_name).expect("login sets the session cookie");
  assert!(session.http_only().unwrap_or(false));
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["message"], "Logged in successfully");

  let req = TestRequest::post()
    .uri("/api/products/add")
    .cookie(session.clone())
    .set_json(json!({ "name": "Widget", "price": 9.99 }))
    .to_request();
  let body: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(body["message"], "Product added successfully");
  assert_eq!(body["product"]["id"], 1);

  let req = TestRequest::get().uri("/api/products/1").to_request();
  let body: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(body, json!({ "id": 1, "name": "Widget", "price": 9.99, "description": "" }));

  let req = TestRequest::post().uri("/api/cart/add/1").cookie(session.clone()).to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);

  let req = TestRequest::get().uri("/api/cart").cookie(session.clone()).to_request();
  let cart: Value = test::call_and_read_body_json(&app, req).await;
  let items = cart.as_array().unwrap();
  assert_eq!(items.len(), 1);
  assert_eq!(items[0]["product_id"], 1);
  assert_eq!(items[0]["product_name"], "Widget");
  assert_eq!(items[0]["product_price"], 9.99);

  let req = TestRequest::post().uri("/api/cart/checkout").cookie(session.clone()).to_request();
  let body: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(body["message"], "Checkout successful. Cart has been cleared.");

  let req = TestRequest::get().uri("/api/cart").cookie(session.clone()).to_request();
  let cart: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(cart, json!([]));
}

#[actix_web::test]
async fn bad_credentials_get_401_and_no_cookie() {
  let state = test_state().await;
  create_user(&state, "alice", "secret").await;
  let app = init_app!(state);

  for req in [
    login_request("alice", "wrong"),
    login_request("bob", "secret"),
    TestRequest::post().uri("/login").set_json(json!({ "username": "alice" })),
  ] {
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(session_cookie_from(&resp, &state.config.session_cookie_name).is_none());
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Unauthorized. Invalid credentials");
  }

  assert_eq!(count_rows(&state, "sessions").await, 0);
}

#[actix_web::test]
async fn protected_routes_reject_anonymous_callers_without_side_effects() {
  let state = test_state().await;
  let alice = identity_for(&create_user(&state, "alice", "secret").await);
  let widget = create_product(&state, &alice, "Widget", 9.99).await;
  let app = init_app!(state);

  let requests = vec![
    TestRequest::post().uri("/logout"),
    TestRequest::post()
      .uri("/api/products/add")
      .set_json(json!({ "name": "Gadget", "price": 1.0 })),
    // Even a malformed body gets 401, not 400.
    TestRequest::post().uri("/api/products/add").set_json(json!({ "name": "" })),
    TestRequest::put()
      .uri(&format!("/api/products/update/{}", widget.id))
      .set_json(json!({ "price": 0.01 })),
    TestRequest::delete().uri(&format!("/api/products/delete/{}", widget.id)),
    TestRequest::post().uri(&format!("/api/cart/add/{}", widget.id)),
    TestRequest::delete().uri(&format!("/api/cart/remove/{}", widget.id)),
    TestRequest::get().uri("/api/cart"),
    TestRequest::post().uri("/api/cart/checkout"),
    // A forged cookie is as good as none.
    TestRequest::get()
      .uri("/api/cart")
      .cookie(actix_web::cookie::Cookie::new("session", "forged")),
  ];

  for req in requests {
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Authentication required");
  }

  assert_eq!(count_rows(&state, "products").await, 1);
  assert_eq!(count_rows(&state, "cart_items").await, 0);
  let req = TestRequest::get().uri(&format!("/api/products/{}", widget.id)).to_request();
  let body: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(body["price"], 9.99);
}

#[actix_web::test]
async fn logout_ends_the_session() {
  let state = test_state().await;
  create_user(&state, "alice", "secret").await;
  let app = init_app!(state);
  let cookie_name = state.config.session_cookie_name.clone();

  let resp = test::call_service(&app, login_request("alice", "secret").to_request()).await;
  let session = session_cookie_from(&resp, &cookie_name).unwrap();

  let req = TestRequest::post().uri("/logout").cookie(session.clone()).to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let removal = session_cookie_from(&resp, &cookie_name).expect("logout clears the cookie");
  assert_eq!(removal.value(), "");

  // Replaying the old token no longer works.
  let req = TestRequest::get().uri("/api/cart").cookie(session.clone()).to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
  let req = TestRequest::post().uri("/logout").cookie(session).to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn logging_in_again_replaces_the_previous_session() {
  let state = test_state().await;
  create_user(&state, "alice", "secret").await;
  let app = init_app!(state);
  let cookie_name = state.config.session_cookie_name.clone();

  let resp = test::call_service(&app, login_request("alice", "secret").to_request()).await;
  let first = session_cookie_from(&resp, &cookie_name).unwrap();

  let req = login_request("alice", "secret").cookie(first.clone()).to_request();
  let resp = test::call_service(&app, req).await;
  let second = session_cookie_from(&resp, &cookie_name).unwrap();
  assert_ne!(first.value(), second.value());
  assert_eq!(count_rows(&state, "sessions").await, 1);

  let req = TestRequest::get().uri("/api/cart").cookie(first).to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
  let req = TestRequest::get().uri("/api/cart").cookie(second).to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
}

#[actix_web::test]
async fn catalog_crud_over_http() {
  let state = test_state().await;
  create_user(&state, "alice", "secret").await;
  let app = init_app!(state);

  let resp = test::call_service(&app, login_request("alice", "secret").to_request()).await;
  let session = session_cookie_from(&resp, &state.config.session_cookie_name).unwrap();

  // Missing price
  let req = TestRequest::post()
    .uri("/api/products/add")
    .cookie(session.clone())
    .set_json(json!({ "name": "Widget" }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  assert_eq!(count_rows(&state, "products").await, 0);

  // Malformed JSON
  let req = TestRequest::post()
    .uri("/api/products/add")
    .cookie(session.clone())
    .insert_header(("content-type", "application/json"))
    .set_payload("{not json")
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert!(body["error"].as_str().unwrap().starts_with("Invalid request body"));

  let req = TestRequest::post()
    .uri("/api/products/add")
    .cookie(session.clone())
    .set_json(json!({ "name": "Widget", "price": 9.99, "description": "A fine widget" }))
    .to_request();
  let body: Value = test::call_and_read_body_json(&app, req).await;
  let id = body["product"]["id"].as_i64().unwrap();

  // Listing omits descriptions, on both spellings of the path.
  for uri in ["/api/products/", "/api/products"] {
    let req = TestRequest::get().uri(uri).to_request();
    let list: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(list, json!([{ "id": id, "name": "Widget", "price": 9.99 }]));
  }

  let req = TestRequest::put()
    .uri(&format!("/api/products/update/{}", id))
    .cookie(session.clone())
    .set_json(json!({ "price": 7.5 }))
    .to_request();
  let body: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(body["message"], "Product updated successfully");
  assert_eq!(
    body["product"],
    json!({ "id": id, "name": "Widget", "price": 7.5, "description": "A fine widget" })
  );

  let req = TestRequest::put()
    .uri("/api/products/update/999")
    .cookie(session.clone())
    .set_json(json!({ "price": 1.0 }))
    .to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

  let req = TestRequest::delete()
    .uri(&format!("/api/products/delete/{}", id))
    .cookie(session.clone())
    .to_request();
  let body: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(body["message"], "Product deleted successfully");

  let req = TestRequest::get().uri(&format!("/api/products/{}", id)).to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  let body: Value = test::read_body_json(resp).await;
  assert!(body["error"].is_string());

  let req = TestRequest::delete()
    .uri(&format!("/api/products/delete/{}", id))
    .cookie(session)
    .to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn update_with_null_description_is_rejected() {
  let state = test_state().await;
  create_user(&state, "alice", "secret").await;
  let app = init_app!(state);

  let resp = test::call_service(&app, login_request("alice", "secret").to_request()).await;
  let session = session_cookie_from(&resp, &state.config.session_cookie_name).unwrap();

  let req = TestRequest::post()
    .uri("/api/products/add")
    .cookie(session.clone())
    .set_json(json!({ "name": "Widget", "price": 9.99, "description": "A fine widget" }))
    .to_request();
  let body: Value = test::call_and_read_body_json(&app, req).await;
  let id = body["product"]["id"].as_i64().unwrap();

  let req = TestRequest::put()
    .uri(&format!("/api/products/update/{}", id))
    .cookie(session.clone())
    .set_json(json!({ "description": null }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert!(body["error"].as_str().unwrap().contains("description cannot be null"));

  // An empty string is a real value and clears the description.
  let req = TestRequest::put()
    .uri(&format!("/api/products/update/{}", id))
    .cookie(session.clone())
    .set_json(json!({ "description": "" }))
    .to_request();
  let body: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(body["product"]["description"], "");

  let req = TestRequest::get().uri(&format!("/api/products/{}", id)).to_request();
  let body: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(body, json!({ "id": id, "name": "Widget", "price": 9.99, "description": "" }));
}

#[actix_web::test]
async fn cart_errors_over_http() {
  let state = test_state().await;
  create_user(&state, "alice", "secret").await;
  let app = init_app!(state);

  let resp = test::call_service(&app, login_request("alice", "secret").to_request()).await;
  let session = session_cookie_from(&resp, &state.config.session_cookie_name).unwrap();

  let req = TestRequest::post().uri("/api/cart/add/404").cookie(session.clone()).to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["error"], "Failed to add item to the cart");

  let req = TestRequest::delete().uri("/api/cart/remove/404").cookie(session.clone()).to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["error"], "Failed to remove item from the cart");

  // Checkout of an empty cart is fine.
  let req = TestRequest::post().uri("/api/cart/checkout").cookie(session).to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
}

#[actix_web::test]
async fn deleted_products_drop_out_of_the_cart_view() {
  let state = test_state().await;
  create_user(&state, "alice", "secret").await;
  let app = init_app!(state);

  let resp = test::call_service(&app, login_request("alice", "secret").to_request()).await;
  let session = session_cookie_from(&resp, &state.config.session_cookie_name).unwrap();

  let mut ids = Vec::new();
  for (name, price) in [("Widget", 9.99), ("Gadget", 5.0)] {
    let req = TestRequest::post()
      .uri("/api/products/add")
      .cookie(session.clone())
      .set_json(json!({ "name": name, "price": price }))
      .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let id = body["product"]["id"].as_i64().unwrap();
    let req = TestRequest::post()
      .uri(&format!("/api/cart/add/{}", id))
      .cookie(session.clone())
      .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    ids.push(id);
  }

  let req = TestRequest::delete()
    .uri(&format!("/api/products/delete/{}", ids[0]))
    .cookie(session.clone())
    .to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

  let req = TestRequest::get().uri("/api/cart").cookie(session).to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let cart: Value = test::read_body_json(resp).await;
  let items = cart.as_array().unwrap();
  assert_eq!(items.len(), 1);
  assert_eq!(items[0]["product_name"], "Gadget");
}

#[actix_web::test]
async fn unknown_routes_and_bad_ids_are_json_404s() {
  let state = test_state().await;
  let app = init_app!(state);

  for uri in ["/nope", "/api/products/not-a-number"] {
    let resp = test::call_service(&app, TestRequest::get().uri(uri).to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].is_string());
  }

  let resp = test::call_service(&app, TestRequest::get().uri("/health").to_request()).await;
  assert_eq!(resp.status(), StatusCode::OK);
}
