use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use super::Item;

/// One user's subscription to one item. At most one entry exists per
/// (user_id, item_id) pair; targets satisfy `sell_target_price >
/// buy_target_price` and are stored rounded to 2 decimals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchEntry {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub user_id: ObjectId,
    pub item_id: ObjectId,

    pub url: String,

    pub buy_target_price: f64,
    pub sell_target_price: f64,

    pub created_at: i64,
}

/// Watch entry joined with its item's current price snapshot, the unit the
/// alert evaluator works on.
#[derive(Debug, Clone)]
pub struct WatchEntryWithItem {
    pub entry: WatchEntry,
    pub item: Item,
}
