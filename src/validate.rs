//! Input validation shared by the HTTP controllers.

use std::sync::OnceLock;

use regex::Regex;

pub const MIN_PRICE: f64 = 0.01;
pub const MAX_PRICE: f64 = 10_000.0;

static LISTING_URL_RE: OnceLock<Regex> = OnceLock::new();

pub fn valid_listing_url(url: &str) -> bool {
    let re = LISTING_URL_RE.get_or_init(|| {
        Regex::new(r"^https://steamcommunity\.com/market/listings/\d+/[^/]+/?$")
            .expect("listing url regex")
    });
    re.is_match(url.trim())
}

pub fn valid_target_price(price: f64) -> bool {
    price.is_finite() && (MIN_PRICE..=MAX_PRICE).contains(&price)
}

pub fn valid_current_price(price: f64) -> bool {
    price.is_finite() && price >= 0.0
}

pub fn valid_item_name(name: &str) -> bool {
    let n = name.trim();
    !n.is_empty() && n.chars().count() <= 200
}

pub fn valid_listing_id(listing_id: i64) -> bool {
    listing_id > 0
}

pub fn valid_telegram_id(telegram_id: i64) -> bool {
    telegram_id > 0
}
