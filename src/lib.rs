//! Steam Market price watchlist service.
//!
//! Tracks Steam Community Market item prices in USD and RUB, evaluates each
//! user's buy/sell target thresholds on a timer, and notifies subscribers
//! over Telegram. A JSON HTTP API manages users, items, and watchlists.

pub mod config;
pub mod models;
pub mod validate;

pub mod services;

pub mod controllers;
pub mod routes;

#[derive(Clone)]
pub struct AppState {
    pub db: mongodb::Database,
    pub settings: config::Settings,
    pub steam: services::steam_market::SteamMarketClient,
    pub notifier: services::telegram::TelegramNotifier,
}
