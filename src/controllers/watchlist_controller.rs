use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mongodb::bson::oid::ObjectId;
use serde::Deserialize;
use serde_json::json;

use crate::{models::WatchEntryWithItem, services::watchlist_service, validate, AppState};

fn detail(status: StatusCode, msg: &str) -> Response {
    (status, Json(json!({ "detail": msg }))).into_response()
}

fn parse_oid(id: &str) -> Result<ObjectId, Response> {
    ObjectId::parse_str(id).map_err(|_| detail(StatusCode::BAD_REQUEST, "bad id"))
}

fn target_range_error(buy: f64, sell: f64) -> Option<&'static str> {
    if !validate::valid_target_price(buy) || !validate::valid_target_price(sell) {
        return Some("target prices must be between 0.01 and 10000");
    }
    if buy >= sell {
        return Some("Buy price must be less than sell price.");
    }
    None
}

fn entry_json(we: &WatchEntryWithItem) -> serde_json::Value {
    json!({
        "id": we.entry.id.to_hex(),
        "user_id": we.entry.user_id.to_hex(),
        "item_id": we.entry.item_id.to_hex(),
        "buy_target_price": we.entry.buy_target_price,
        "sell_target_price": we.entry.sell_target_price,
        "url": we.entry.url,
        "item": {
            "id": we.item.id.to_hex(),
            "listing_id": we.item.listing_id,
            "name": we.item.name,
            "current_price_usd": we.item.current_price_usd,
            "current_price_rub": we.item.current_price_rub,
            "url": we.item.url,
        },
    })
}

#[derive(Deserialize)]
pub struct AddEntryPayload {
    pub item_id: String,
    pub buy_target_price: f64,
    pub sell_target_price: f64,
    pub url: String,
}

// POST /users/:id/watchlist
pub async fn post_add_entry(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(payload): Json<AddEntryPayload>,
) -> Response {
    let user_oid = match parse_oid(&user_id) {
        Ok(x) => x,
        Err(res) => return res,
    };
    let item_oid = match parse_oid(&payload.item_id) {
        Ok(x) => x,
        Err(res) => return res,
    };

    if let Some(msg) = target_range_error(payload.buy_target_price, payload.sell_target_price) {
        return detail(StatusCode::BAD_REQUEST, msg);
    }

    match watchlist_service::read_user(&state, user_oid).await {
        Ok(Some(_)) => {}
        Ok(None) => return detail(StatusCode::NOT_FOUND, "User not found"),
        Err(e) => return detail(StatusCode::INTERNAL_SERVER_ERROR, &format!("db error: {e}")),
    }

    match watchlist_service::read_item(&state, item_oid).await {
        Ok(Some(_)) => {}
        Ok(None) => return detail(StatusCode::NOT_FOUND, "Item not found"),
        Err(e) => return detail(StatusCode::INTERNAL_SERVER_ERROR, &format!("db error: {e}")),
    }

    match watchlist_service::add_entry(
        &state,
        user_oid,
        item_oid,
        payload.buy_target_price,
        payload.sell_target_price,
        &payload.url,
    )
    .await
    {
        Ok((entry_id, true)) => (
            StatusCode::OK,
            Json(json!({
                "watchlist_id": entry_id.to_hex(),
                "message": "Item added to watchlist successfully",
            })),
        )
            .into_response(),
        Ok((entry_id, false)) => (
            StatusCode::OK,
            Json(json!({
                "watchlist_id": entry_id.to_hex(),
                "message": "Item already in watchlist",
            })),
        )
            .into_response(),
        Err(e) => detail(StatusCode::INTERNAL_SERVER_ERROR, &format!("db error: {e}")),
    }
}

// GET /users/:id/watchlist
pub async fn get_watchlist(State(state): State<AppState>, Path(user_id): Path<String>) -> Response {
    let user_oid = match parse_oid(&user_id) {
        Ok(x) => x,
        Err(res) => return res,
    };

    match watchlist_service::read_user(&state, user_oid).await {
        Ok(Some(_)) => {}
        Ok(None) => return detail(StatusCode::NOT_FOUND, "User not found"),
        Err(e) => return detail(StatusCode::INTERNAL_SERVER_ERROR, &format!("db error: {e}")),
    }

    match watchlist_service::list_entries_with_items(&state, user_oid).await {
        Ok(entries) => {
            let out: Vec<serde_json::Value> = entries.iter().map(entry_json).collect();
            (StatusCode::OK, Json(json!(out))).into_response()
        }
        Err(e) => detail(StatusCode::INTERNAL_SERVER_ERROR, &format!("db error: {e}")),
    }
}

// DELETE /users/:id/watchlist/:item_id
pub async fn delete_entry(
    State(state): State<AppState>,
    Path((user_id, item_id)): Path<(String, String)>,
) -> Response {
    let user_oid = match parse_oid(&user_id) {
        Ok(x) => x,
        Err(res) => return res,
    };
    let item_oid = match parse_oid(&item_id) {
        Ok(x) => x,
        Err(res) => return res,
    };

    match watchlist_service::remove_entry(&state, user_oid, item_oid).await {
        Ok(true) => (
            StatusCode::OK,
            Json(json!({ "message": "Item removed from watchlist successfully" })),
        )
            .into_response(),
        Ok(false) => detail(StatusCode::NOT_FOUND, "Watchlist item not found"),
        Err(e) => detail(StatusCode::INTERNAL_SERVER_ERROR, &format!("db error: {e}")),
    }
}

// GET /users/:id/watchlist/check/:item_id
pub async fn get_check_entry(
    State(state): State<AppState>,
    Path((user_id, item_id)): Path<(String, String)>,
) -> Response {
    let user_oid = match parse_oid(&user_id) {
        Ok(x) => x,
        Err(res) => return res,
    };
    let item_oid = match parse_oid(&item_id) {
        Ok(x) => x,
        Err(res) => return res,
    };

    match watchlist_service::read_user(&state, user_oid).await {
        Ok(Some(_)) => {}
        Ok(None) => return detail(StatusCode::NOT_FOUND, "User not found"),
        Err(e) => return detail(StatusCode::INTERNAL_SERVER_ERROR, &format!("db error: {e}")),
    }

    match watchlist_service::entry_for(&state, user_oid, item_oid).await {
        Ok(Some(entry)) => (
            StatusCode::OK,
            Json(json!({
                "in_watchlist": true,
                "watchlist_id": entry.id.to_hex(),
                "buy_target_price": entry.buy_target_price,
                "sell_target_price": entry.sell_target_price,
                "url": entry.url,
            })),
        )
            .into_response(),
        Ok(None) => (StatusCode::OK, Json(json!({ "in_watchlist": false }))).into_response(),
        Err(e) => detail(StatusCode::INTERNAL_SERVER_ERROR, &format!("db error: {e}")),
    }
}

#[derive(Deserialize)]
pub struct UpdateTargetsPayload {
    pub buy_target_price: f64,
    pub sell_target_price: f64,
}

// PUT /users/:id/watchlist/:watchlist_id/prices
pub async fn put_entry_targets(
    State(state): State<AppState>,
    Path((user_id, watchlist_id)): Path<(String, String)>,
    Json(payload): Json<UpdateTargetsPayload>,
) -> Response {
    let user_oid = match parse_oid(&user_id) {
        Ok(x) => x,
        Err(res) => return res,
    };
    let entry_oid = match parse_oid(&watchlist_id) {
        Ok(x) => x,
        Err(res) => return res,
    };

    if let Some(msg) = target_range_error(payload.buy_target_price, payload.sell_target_price) {
        return detail(StatusCode::BAD_REQUEST, msg);
    }

    match watchlist_service::update_entry_targets(
        &state,
        user_oid,
        entry_oid,
        payload.buy_target_price,
        payload.sell_target_price,
    )
    .await
    {
        Ok(true) => (
            StatusCode::OK,
            Json(json!({ "message": "Watchlist item prices updated successfully" })),
        )
            .into_response(),
        Ok(false) => detail(StatusCode::NOT_FOUND, "Watchlist item not found"),
        Err(e) => detail(StatusCode::INTERNAL_SERVER_ERROR, &format!("db error: {e}")),
    }
}
