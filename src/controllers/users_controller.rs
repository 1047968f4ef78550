use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mongodb::bson::oid::ObjectId;
use serde::Deserialize;
use serde_json::json;

use crate::{models::User, services::watchlist_service, validate, AppState};

fn detail(status: StatusCode, msg: &str) -> Response {
    (status, Json(json!({ "detail": msg }))).into_response()
}

fn user_json(u: &User) -> serde_json::Value {
    json!({
        "id": u.id.to_hex(),
        "telegram_id": u.telegram_id,
        "subscriber": u.subscriber,
        "currency": u.currency,
    })
}

#[derive(Deserialize)]
pub struct CreateUserPayload {
    pub telegram_id: i64,

    #[serde(default = "default_subscriber")]
    pub subscriber: bool,

    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_subscriber() -> bool {
    true
}

fn default_currency() -> String {
    "USD".to_string()
}

// POST /users
pub async fn post_create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserPayload>,
) -> Response {
    if !validate::valid_telegram_id(payload.telegram_id) {
        return detail(StatusCode::BAD_REQUEST, "telegram_id must be positive");
    }

    let currency = payload.currency.to_uppercase();
    if currency != "USD" && currency != "RUB" {
        return detail(StatusCode::BAD_REQUEST, "currency must be USD or RUB");
    }

    match watchlist_service::create_user(&state, payload.telegram_id, payload.subscriber, &currency)
        .await
    {
        Ok(user) => (
            StatusCode::OK,
            Json(json!({
                "user_id": user.id.to_hex(),
                "message": "User created successfully",
            })),
        )
            .into_response(),
        // Unique telegram_id index rejects duplicates.
        Err(e) if e.contains("E11000") => detail(StatusCode::BAD_REQUEST, "User already exists"),
        Err(e) => detail(StatusCode::INTERNAL_SERVER_ERROR, &format!("db error: {e}")),
    }
}

// GET /users/subscribers
pub async fn get_subscribers(State(state): State<AppState>) -> Response {
    match watchlist_service::get_subscribers(&state).await {
        Ok(users) => {
            let out: Vec<serde_json::Value> = users.iter().map(user_json).collect();
            (StatusCode::OK, Json(json!(out))).into_response()
        }
        Err(e) => detail(StatusCode::INTERNAL_SERVER_ERROR, &format!("db error: {e}")),
    }
}

// GET /users/:id
pub async fn get_user(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let oid = match ObjectId::parse_str(&id) {
        Ok(x) => x,
        Err(_) => return detail(StatusCode::BAD_REQUEST, "bad id"),
    };

    match watchlist_service::read_user(&state, oid).await {
        Ok(Some(user)) => (StatusCode::OK, Json(user_json(&user))).into_response(),
        Ok(None) => detail(StatusCode::NOT_FOUND, "User not found"),
        Err(e) => detail(StatusCode::INTERNAL_SERVER_ERROR, &format!("db error: {e}")),
    }
}

#[derive(Deserialize)]
pub struct SubscriptionPayload {
    pub subscriber: bool,
}

// PUT /users/:id/subscription
pub async fn put_subscription(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<SubscriptionPayload>,
) -> Response {
    let oid = match ObjectId::parse_str(&id) {
        Ok(x) => x,
        Err(_) => return detail(StatusCode::BAD_REQUEST, "bad id"),
    };

    match watchlist_service::set_subscription(&state, oid, payload.subscriber).await {
        Ok(true) => (
            StatusCode::OK,
            Json(json!({ "message": "Subscription status changed successfully" })),
        )
            .into_response(),
        Ok(false) => detail(StatusCode::NOT_FOUND, "User not found"),
        Err(e) => detail(StatusCode::INTERNAL_SERVER_ERROR, &format!("db error: {e}")),
    }
}

#[derive(Deserialize)]
pub struct CurrencyPayload {
    pub currency: String,
}

// PUT /users/:id/currency
pub async fn put_currency(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<CurrencyPayload>,
) -> Response {
    let oid = match ObjectId::parse_str(&id) {
        Ok(x) => x,
        Err(_) => return detail(StatusCode::BAD_REQUEST, "bad id"),
    };

    // The stored preference is strict even though the alerts endpoint's
    // comparison selector is lenient.
    let currency = payload.currency.to_uppercase();
    if currency != "USD" && currency != "RUB" {
        return detail(StatusCode::BAD_REQUEST, "currency must be USD or RUB");
    }

    match watchlist_service::set_currency(&state, oid, &currency).await {
        Ok(true) => (
            StatusCode::OK,
            Json(json!({ "message": "Currency changed successfully" })),
        )
            .into_response(),
        Ok(false) => detail(StatusCode::NOT_FOUND, "User not found"),
        Err(e) => detail(StatusCode::INTERNAL_SERVER_ERROR, &format!("db error: {e}")),
    }
}
