use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mongodb::bson::oid::ObjectId;
use serde::Deserialize;
use serde_json::json;

use crate::{models::Item, services::watchlist_service, validate, AppState};

fn detail(status: StatusCode, msg: &str) -> Response {
    (status, Json(json!({ "detail": msg }))).into_response()
}

fn item_json(item: &Item) -> serde_json::Value {
    json!({
        "id": item.id.to_hex(),
        "listing_id": item.listing_id,
        "name": item.name,
        "current_price_usd": item.current_price_usd,
        "current_price_rub": item.current_price_rub,
        "url": item.url,
    })
}

#[derive(Deserialize)]
pub struct CreateItemPayload {
    pub listing_id: i64,
    pub name: String,
    pub current_price_usd: f64,
    pub current_price_rub: f64,
    pub url: String,
}

// POST /items — create, or refresh prices/url when the name already exists
pub async fn post_create_item(
    State(state): State<AppState>,
    Json(payload): Json<CreateItemPayload>,
) -> Response {
    if !validate::valid_item_name(&payload.name) {
        return detail(StatusCode::BAD_REQUEST, "item name must be 1-200 characters");
    }
    if !validate::valid_listing_id(payload.listing_id) {
        return detail(StatusCode::BAD_REQUEST, "listing_id must be positive");
    }
    if !validate::valid_listing_url(&payload.url) {
        return detail(
            StatusCode::BAD_REQUEST,
            "url must be a Steam Community Market listing URL",
        );
    }
    if !validate::valid_current_price(payload.current_price_usd)
        || !validate::valid_current_price(payload.current_price_rub)
    {
        return detail(StatusCode::BAD_REQUEST, "prices must be non-negative numbers");
    }

    match watchlist_service::create_or_get_item(
        &state,
        payload.listing_id,
        payload.name.trim(),
        payload.current_price_usd,
        payload.current_price_rub,
        &payload.url,
    )
    .await
    {
        Ok(item_id) => (
            StatusCode::OK,
            Json(json!({
                "item_id": item_id.to_hex(),
                "message": "Item created/updated successfully",
            })),
        )
            .into_response(),
        Err(e) => detail(StatusCode::INTERNAL_SERVER_ERROR, &format!("db error: {e}")),
    }
}

// GET /items
pub async fn get_all_items(State(state): State<AppState>) -> Response {
    match watchlist_service::get_all_items(&state).await {
        Ok(items) => {
            let out: Vec<serde_json::Value> = items.iter().map(item_json).collect();
            (StatusCode::OK, Json(json!(out))).into_response()
        }
        Err(e) => detail(StatusCode::INTERNAL_SERVER_ERROR, &format!("db error: {e}")),
    }
}

// GET /items/:id
pub async fn get_item(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let oid = match ObjectId::parse_str(&id) {
        Ok(x) => x,
        Err(_) => return detail(StatusCode::BAD_REQUEST, "bad id"),
    };

    match watchlist_service::read_item(&state, oid).await {
        Ok(Some(item)) => (StatusCode::OK, Json(item_json(&item))).into_response(),
        Ok(None) => detail(StatusCode::NOT_FOUND, "Item not found"),
        Err(e) => detail(StatusCode::INTERNAL_SERVER_ERROR, &format!("db error: {e}")),
    }
}

#[derive(Deserialize)]
pub struct ItemPriceUpdatePayload {
    pub name: String,
    pub new_price_usd: f64,
    pub new_price_rub: f64,
}

// PUT /items/price — the price refresh write path, addressed by name
pub async fn put_item_price(
    State(state): State<AppState>,
    Json(payload): Json<ItemPriceUpdatePayload>,
) -> Response {
    if !validate::valid_item_name(&payload.name) {
        return detail(StatusCode::BAD_REQUEST, "item name must be 1-200 characters");
    }
    if !validate::valid_current_price(payload.new_price_usd)
        || !validate::valid_current_price(payload.new_price_rub)
    {
        return detail(StatusCode::BAD_REQUEST, "prices must be non-negative numbers");
    }

    match watchlist_service::update_item_price(
        &state,
        payload.name.trim(),
        payload.new_price_usd,
        payload.new_price_rub,
    )
    .await
    {
        Ok(true) => (
            StatusCode::OK,
            Json(json!({ "message": "Item prices updated successfully" })),
        )
            .into_response(),
        Ok(false) => detail(StatusCode::NOT_FOUND, "Item not found"),
        Err(e) => detail(StatusCode::INTERNAL_SERVER_ERROR, &format!("db error: {e}")),
    }
}

// GET /items/exists/:name
pub async fn get_item_exists(State(state): State<AppState>, Path(name): Path<String>) -> Response {
    match watchlist_service::item_by_name(&state, &name).await {
        Ok(Some(item)) => (
            StatusCode::OK,
            Json(json!({
                "exists": true,
                "item_id": item.id.to_hex(),
                "listing_id": item.listing_id,
                "current_price_usd": item.current_price_usd,
                "current_price_rub": item.current_price_rub,
                "url": item.url,
            })),
        )
            .into_response(),
        Ok(None) => (StatusCode::OK, Json(json!({ "exists": false }))).into_response(),
        Err(e) => detail(StatusCode::INTERNAL_SERVER_ERROR, &format!("db error: {e}")),
    }
}
