//! MongoDB-backed repository for users, items, and watch entries.
//!
//! Error convention: `Err(String)` is a storage fault; "not found" and
//! "already exists" are reported in-band (`Option` / `bool`) so callers can
//! decide what to do. Every price crossing this layer is rounded to 2
//! decimals before it is written.

use std::collections::HashMap;

use chrono::Utc;
use futures_util::StreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::options::FindOptions;

use crate::{
    models::{Item, User, WatchEntry, WatchEntryWithItem},
    services::evaluator::{self, Currency, PriceAlerts},
    AppState,
};

// ---------------- Users ----------------

pub async fn create_user(
    state: &AppState,
    telegram_id: i64,
    subscriber: bool,
    currency: &str,
) -> Result<User, String> {
    let users = state.db.collection::<User>("users");

    let user = User {
        id: ObjectId::new(),
        telegram_id,
        subscriber,
        currency: currency.to_uppercase(),
    };

    users
        .insert_one(&user, None)
        .await
        .map_err(|e| e.to_string())?;

    Ok(user)
}

pub async fn read_user(state: &AppState, user_id: ObjectId) -> Result<Option<User>, String> {
    let users = state.db.collection::<User>("users");

    users
        .find_one(doc! { "_id": user_id }, None)
        .await
        .map_err(|e| e.to_string())
}

pub async fn get_subscribers(state: &AppState) -> Result<Vec<User>, String> {
    let users = state.db.collection::<User>("users");

    let mut cursor = users
        .find(doc! { "subscriber": true }, None)
        .await
        .map_err(|e| e.to_string())?;

    let mut out: Vec<User> = Vec::new();
    while let Some(res) = cursor.next().await {
        out.push(res.map_err(|e| e.to_string())?);
    }

    Ok(out)
}

/// Returns false when the user does not exist.
pub async fn set_subscription(
    state: &AppState,
    user_id: ObjectId,
    subscriber: bool,
) -> Result<bool, String> {
    let users = state.db.collection::<User>("users");

    let res = users
        .update_one(
            doc! { "_id": user_id },
            doc! { "$set": { "subscriber": subscriber } },
            None,
        )
        .await
        .map_err(|e| e.to_string())?;

    Ok(res.matched_count > 0)
}

/// Returns false when the user does not exist. Callers validate the currency
/// value; this just stores it uppercased.
pub async fn set_currency(
    state: &AppState,
    user_id: ObjectId,
    currency: &str,
) -> Result<bool, String> {
    let users = state.db.collection::<User>("users");

    let res = users
        .update_one(
            doc! { "_id": user_id },
            doc! { "$set": { "currency": currency.to_uppercase() } },
            None,
        )
        .await
        .map_err(|e| e.to_string())?;

    Ok(res.matched_count > 0)
}

// ---------------- Items ----------------

/// Items are keyed by name. Creating an existing name refreshes its prices
/// and url instead of duplicating it.
pub async fn create_or_get_item(
    state: &AppState,
    listing_id: i64,
    name: &str,
    current_price_usd: f64,
    current_price_rub: f64,
    url: &str,
) -> Result<ObjectId, String> {
    let items = state.db.collection::<Item>("items");

    if let Some(existing) = items
        .find_one(doc! { "name": name }, None)
        .await
        .map_err(|e| e.to_string())?
    {
        items
            .update_one(
                doc! { "_id": existing.id },
                doc! { "$set": {
                    "current_price_usd": evaluator::round2(current_price_usd),
                    "current_price_rub": evaluator::round2(current_price_rub),
                    "url": url,
                } },
                None,
            )
            .await
            .map_err(|e| e.to_string())?;
        return Ok(existing.id);
    }

    let item = Item {
        id: ObjectId::new(),
        listing_id,
        name: name.to_string(),
        current_price_usd: evaluator::round2(current_price_usd),
        current_price_rub: evaluator::round2(current_price_rub),
        url: url.to_string(),
    };

    items
        .insert_one(&item, None)
        .await
        .map_err(|e| e.to_string())?;

    Ok(item.id)
}

pub async fn read_item(state: &AppState, item_id: ObjectId) -> Result<Option<Item>, String> {
    let items = state.db.collection::<Item>("items");

    items
        .find_one(doc! { "_id": item_id }, None)
        .await
        .map_err(|e| e.to_string())
}

pub async fn item_by_name(state: &AppState, name: &str) -> Result<Option<Item>, String> {
    let items = state.db.collection::<Item>("items");

    items
        .find_one(doc! { "name": name }, None)
        .await
        .map_err(|e| e.to_string())
}

pub async fn get_all_items(state: &AppState) -> Result<Vec<Item>, String> {
    let items = state.db.collection::<Item>("items");

    let mut cursor = items.find(None, None).await.map_err(|e| e.to_string())?;

    let mut out: Vec<Item> = Vec::new();
    while let Some(res) = cursor.next().await {
        out.push(res.map_err(|e| e.to_string())?);
    }

    Ok(out)
}

/// Atomic per-item price write; returns false when no item has this name.
pub async fn update_item_price(
    state: &AppState,
    name: &str,
    new_price_usd: f64,
    new_price_rub: f64,
) -> Result<bool, String> {
    let items = state.db.collection::<Item>("items");

    let res = items
        .update_one(
            doc! { "name": name },
            doc! { "$set": {
                "current_price_usd": evaluator::round2(new_price_usd),
                "current_price_rub": evaluator::round2(new_price_rub),
            } },
            None,
        )
        .await
        .map_err(|e| e.to_string())?;

    Ok(res.matched_count > 0)
}

// ---------------- Watch entries ----------------

/// Adds an entry for (user, item). Returns `(id, false)` without touching
/// anything when the pair is already watched.
pub async fn add_entry(
    state: &AppState,
    user_id: ObjectId,
    item_id: ObjectId,
    buy_target_price: f64,
    sell_target_price: f64,
    url: &str,
) -> Result<(ObjectId, bool), String> {
    let watchlist = state.db.collection::<WatchEntry>("watchlist");

    if let Some(existing) = watchlist
        .find_one(doc! { "user_id": user_id, "item_id": item_id }, None)
        .await
        .map_err(|e| e.to_string())?
    {
        return Ok((existing.id, false));
    }

    let entry = WatchEntry {
        id: ObjectId::new(),
        user_id,
        item_id,
        url: url.to_string(),
        buy_target_price: evaluator::round2(buy_target_price),
        sell_target_price: evaluator::round2(sell_target_price),
        created_at: Utc::now().timestamp(),
    };

    watchlist
        .insert_one(&entry, None)
        .await
        .map_err(|e| e.to_string())?;

    Ok((entry.id, true))
}

pub async fn entry_for(
    state: &AppState,
    user_id: ObjectId,
    item_id: ObjectId,
) -> Result<Option<WatchEntry>, String> {
    let watchlist = state.db.collection::<WatchEntry>("watchlist");

    watchlist
        .find_one(doc! { "user_id": user_id, "item_id": item_id }, None)
        .await
        .map_err(|e| e.to_string())
}

/// Returns false when the pair was not in the watchlist.
pub async fn remove_entry(
    state: &AppState,
    user_id: ObjectId,
    item_id: ObjectId,
) -> Result<bool, String> {
    let watchlist = state.db.collection::<WatchEntry>("watchlist");

    let res = watchlist
        .delete_one(doc! { "user_id": user_id, "item_id": item_id }, None)
        .await
        .map_err(|e| e.to_string())?;

    Ok(res.deleted_count > 0)
}

/// Returns false when the entry does not exist or belongs to another user.
pub async fn update_entry_targets(
    state: &AppState,
    user_id: ObjectId,
    entry_id: ObjectId,
    buy_target_price: f64,
    sell_target_price: f64,
) -> Result<bool, String> {
    let watchlist = state.db.collection::<WatchEntry>("watchlist");

    let res = watchlist
        .update_one(
            doc! { "_id": entry_id, "user_id": user_id },
            doc! { "$set": {
                "buy_target_price": evaluator::round2(buy_target_price),
                "sell_target_price": evaluator::round2(sell_target_price),
            } },
            None,
        )
        .await
        .map_err(|e| e.to_string())?;

    Ok(res.matched_count > 0)
}

/// Entries joined with their item snapshots, oldest first so evaluation
/// output is stable insertion order. Empty vec for an unknown user.
pub async fn list_entries_with_items(
    state: &AppState,
    user_id: ObjectId,
) -> Result<Vec<WatchEntryWithItem>, String> {
    let watchlist = state.db.collection::<WatchEntry>("watchlist");

    let find_opts = FindOptions::builder()
        .sort(doc! { "created_at": 1 })
        .build();

    let mut cursor = watchlist
        .find(doc! { "user_id": user_id }, find_opts)
        .await
        .map_err(|e| e.to_string())?;

    let mut entries: Vec<WatchEntry> = Vec::new();
    while let Some(res) = cursor.next().await {
        entries.push(res.map_err(|e| e.to_string())?);
    }

    if entries.is_empty() {
        return Ok(Vec::new());
    }

    let item_ids: Vec<ObjectId> = entries.iter().map(|e| e.item_id).collect();
    let items = state.db.collection::<Item>("items");

    let mut cursor = items
        .find(doc! { "_id": { "$in": item_ids } }, None)
        .await
        .map_err(|e| e.to_string())?;

    let mut by_id: HashMap<ObjectId, Item> = HashMap::new();
    while let Some(res) = cursor.next().await {
        let item = res.map_err(|e| e.to_string())?;
        by_id.insert(item.id, item);
    }

    let mut out: Vec<WatchEntryWithItem> = Vec::new();
    for entry in entries {
        // Items are never deleted while watched, but a missing snapshot must
        // not take the whole listing down.
        let Some(item) = by_id.get(&entry.item_id).cloned() else {
            tracing::warn!("watch entry {} references missing item {}", entry.id, entry.item_id);
            continue;
        };
        out.push(WatchEntryWithItem { entry, item });
    }

    Ok(out)
}

/// Loads the user's watchlist and runs the threshold evaluation in one step.
pub async fn alerts_for_user(
    state: &AppState,
    user_id: ObjectId,
    currency: Currency,
) -> Result<PriceAlerts, String> {
    let entries = list_entries_with_items(state, user_id).await?;
    Ok(evaluator::evaluate(&entries, currency))
}
