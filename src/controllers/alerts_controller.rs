use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mongodb::bson::oid::ObjectId;
use serde::Deserialize;
use serde_json::json;

use crate::{
    services::evaluator::{AlertRecord, Currency},
    services::watchlist_service,
    AppState,
};

fn detail(status: StatusCode, msg: &str) -> Response {
    (status, Json(json!({ "detail": msg }))).into_response()
}

fn alert_json(a: &AlertRecord) -> serde_json::Value {
    json!({
        "watchlist_id": a.watch_entry_id.to_hex(),
        "item_id": a.item_id.to_hex(),
        "item_name": a.item_name,
        "listing_id": a.listing_id,
        "current_price_usd": a.current_price_usd,
        "current_price_rub": a.current_price_rub,
        "target_price": a.target_price,
        "difference": a.difference,
        "comparison_currency": a.comparison_currency.as_str(),
        "url": a.url,
    })
}

#[derive(Deserialize)]
pub struct AlertsQuery {
    pub currency: Option<String>,
}

// GET /users/:id/watchlist/alerts?currency=usd
pub async fn get_watchlist_alerts(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<AlertsQuery>,
) -> Response {
    let user_oid = match ObjectId::parse_str(&user_id) {
        Ok(x) => x,
        Err(_) => return detail(StatusCode::BAD_REQUEST, "bad id"),
    };

    match watchlist_service::read_user(&state, user_oid).await {
        Ok(Some(_)) => {}
        Ok(None) => return detail(StatusCode::NOT_FOUND, "User not found"),
        Err(e) => return detail(StatusCode::INTERNAL_SERVER_ERROR, &format!("db error: {e}")),
    }

    // Unknown selectors degrade to USD, see Currency::parse.
    let currency = Currency::parse(query.currency.as_deref().unwrap_or("usd"));

    match watchlist_service::alerts_for_user(&state, user_oid, currency).await {
        Ok(alerts) => {
            let buy: Vec<serde_json::Value> = alerts.buy.iter().map(alert_json).collect();
            let sell: Vec<serde_json::Value> = alerts.sell.iter().map(alert_json).collect();
            (StatusCode::OK, Json(json!({ "buy": buy, "sell": sell }))).into_response()
        }
        Err(e) => detail(StatusCode::INTERNAL_SERVER_ERROR, &format!("db error: {e}")),
    }
}
