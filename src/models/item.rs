use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    // Steam app id the listing lives under (e.g. 730 for CS2).
    pub listing_id: i64,

    pub name: String,

    // Stored rounded to 2 decimals; only the price refresh sweep writes these.
    pub current_price_usd: f64,
    pub current_price_rub: f64,

    pub url: String,
}
