use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    // Telegram chat id — where notifications for this user are delivered.
    pub telegram_id: i64,

    pub subscriber: bool,

    // "USD" | "RUB", display preference only. Alert comparisons take their
    // currency per call, not from here.
    pub currency: String,
}
