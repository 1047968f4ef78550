use std::env;

#[derive(Debug, Clone)]
pub struct Settings {
    pub mongodb_uri: String,
    pub mongodb_db: String,
    pub host: String,
    pub port: u16,

    pub telegram_bot_token: String,

    pub update_interval_secs: u64,
    pub notify_interval_secs: u64,
    pub max_retries: u32,
    pub request_timeout_secs: u64,
}

pub fn load() -> Settings {
    // Loads .env if present (no crash if missing)
    dotenvy::dotenv().ok();

    let mongodb_uri = env::var("MONGODB_URI")
        .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());

    let mongodb_db = env::var("MONGODB_DB")
        .unwrap_or_else(|_| "steamwatch".to_string());

    let host = env::var("HOST")
        .unwrap_or_else(|_| "127.0.0.1".to_string());

    let port = env::var("PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let telegram_bot_token = env::var("TELEGRAM_BOT_TOKEN").unwrap_or_default();

    let update_interval_secs = env::var("UPDATE_INTERVAL")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(160);

    let notify_interval_secs = env::var("NOTIFY_INTERVAL")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(180);

    let max_retries = env::var("MAX_RETRIES")
        .ok()
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(3);

    let request_timeout_secs = env::var("REQUEST_TIMEOUT")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(10);

    Settings {
        mongodb_uri,
        mongodb_db,
        host,
        port,
        telegram_bot_token,
        update_interval_secs,
        notify_interval_secs,
        max_retries,
        request_timeout_secs,
    }
}
