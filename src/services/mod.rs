pub mod evaluator;
pub mod format;
pub mod watchlist_service;
pub mod steam_market;
pub mod telegram;
pub mod price_monitor;
pub mod notify_monitor;
pub mod db_init;
