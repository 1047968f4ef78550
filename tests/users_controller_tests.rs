use axum::{
    http::{header, Request, StatusCode},
    routing::{get, post, put},
    Router,
};
use http_body_util::BodyExt;
use mongodb::{bson::oid::ObjectId, Client};
use steamwatch::{config, controllers::users_controller, services, AppState};
use tower::ServiceExt;

async fn test_state() -> AppState {
    let mut settings = config::load();
    settings.telegram_bot_token = String::new();

    let client = Client::with_uri_str(&settings.mongodb_uri)
        .await
        .expect("mongodb client");
    let db = client.database(&settings.mongodb_db);

    let steam = services::steam_market::SteamMarketClient::new(
        settings.request_timeout_secs,
        settings.max_retries,
    );
    let notifier = services::telegram::TelegramNotifier::new(settings.telegram_bot_token.clone());

    AppState {
        db,
        settings,
        steam,
        notifier,
    }
}

async fn response_body_string(res: axum::response::Response) -> String {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8_lossy(&bytes).to_string()
}

#[tokio::test]
async fn post_create_user_rejects_non_positive_telegram_id() {
    let state = test_state().await;
    let app = Router::new()
        .route("/users", post(users_controller::post_create_user))
        .with_state(state);

    let req = Request::builder()
        .method("POST")
        .uri("/users")
        .header(header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(r#"{"telegram_id": 0}"#))
        .unwrap();

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = response_body_string(res).await;
    assert!(body.contains("telegram_id must be positive"));
}

#[tokio::test]
async fn post_create_user_rejects_unknown_currency() {
    let state = test_state().await;
    let app = Router::new()
        .route("/users", post(users_controller::post_create_user))
        .with_state(state);

    let req = Request::builder()
        .method("POST")
        .uri("/users")
        .header(header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(
            r#"{"telegram_id": 42, "currency": "EUR"}"#,
        ))
        .unwrap();

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = response_body_string(res).await;
    assert!(body.contains("currency must be USD or RUB"));
}

#[tokio::test]
async fn get_user_bad_id_returns_400() {
    let state = test_state().await;
    let app = Router::new()
        .route("/users/:id", get(users_controller::get_user))
        .with_state(state);

    let req = Request::builder()
        .method("GET")
        .uri("/users/not-an-object-id")
        .body(axum::body::Body::empty())
        .unwrap();

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = response_body_string(res).await;
    assert!(body.contains("bad id"));
}

#[tokio::test]
async fn put_subscription_bad_id_returns_400() {
    let state = test_state().await;
    let app = Router::new()
        .route(
            "/users/:id/subscription",
            put(users_controller::put_subscription),
        )
        .with_state(state);

    let req = Request::builder()
        .method("PUT")
        .uri("/users/xyz/subscription")
        .header(header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(r#"{"subscriber": false}"#))
        .unwrap();

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = response_body_string(res).await;
    assert!(body.contains("bad id"));
}

#[tokio::test]
async fn put_currency_rejects_unknown_currency() {
    let state = test_state().await;
    let app = Router::new()
        .route("/users/:id/currency", put(users_controller::put_currency))
        .with_state(state);

    // Valid id so we hit the currency check, not the id parse branch.
    let req = Request::builder()
        .method("PUT")
        .uri(format!("/users/{}/currency", ObjectId::new().to_hex()))
        .header(header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(r#"{"currency": "EUR"}"#))
        .unwrap();

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = response_body_string(res).await;
    assert!(body.contains("currency must be USD or RUB"));
}

#[tokio::test]
async fn put_currency_bad_id_returns_400() {
    let state = test_state().await;
    let app = Router::new()
        .route("/users/:id/currency", put(users_controller::put_currency))
        .with_state(state);

    let req = Request::builder()
        .method("PUT")
        .uri("/users/nope/currency")
        .header(header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(r#"{"currency": "USD"}"#))
        .unwrap();

    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = response_body_string(res).await;
    assert!(body.contains("bad id"));
}
