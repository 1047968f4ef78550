//! Steam Community Market price client.
//!
//! Getting a price takes two steps: scrape the listing page for the item's
//! numeric market id, then hit the `itemordershistogram` endpoint once per
//! currency. The lowest standing sell order, in cents, is the price.

use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use tokio::time;
use url::Url;

use crate::services::evaluator::round2;

const LISTINGS_BASE: &str = "https://steamcommunity.com/market/listings/";
const HISTOGRAM_URL: &str = "https://steamcommunity.com/market/itemordershistogram";

// Steam wallet currency codes.
const CURRENCY_USD: u32 = 1;
const CURRENCY_RUB: u32 = 5;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

#[derive(Debug, Clone, Copy)]
pub struct DualPrice {
    pub usd: f64,
    pub rub: f64,
}

#[derive(Clone)]
pub struct SteamMarketClient {
    http: Client,
    request_timeout: Duration,
    max_retries: u32,
}

impl SteamMarketClient {
    pub fn new(request_timeout_secs: u64, max_retries: u32) -> Self {
        Self {
            http: Client::new(),
            request_timeout: Duration::from_secs(request_timeout_secs),
            // At least one attempt even with a zero in the config.
            max_retries: max_retries.max(1),
        }
    }

    /// Fetches the item's current price in both currencies, retrying with a
    /// fixed 1s delay. An `Err` here means "no update this cycle" — the
    /// caller keeps the previously stored price.
    pub async fn fetch_dual_price(&self, name: &str, listing_id: i64) -> Result<DualPrice, String> {
        let mut last_err = String::new();

        for attempt in 1..=self.max_retries {
            if attempt > 1 {
                time::sleep(Duration::from_secs(1)).await;
            }

            match self.fetch_once(name, listing_id).await {
                Ok(price) => return Ok(price),
                Err(e) => {
                    tracing::warn!(
                        "price fetch attempt {}/{} failed for '{}': {}",
                        attempt,
                        self.max_retries,
                        name,
                        e
                    );
                    last_err = e;
                }
            }
        }

        Err(format!(
            "price fetch failed after {} attempts: {}",
            self.max_retries, last_err
        ))
    }

    async fn fetch_once(&self, name: &str, listing_id: i64) -> Result<DualPrice, String> {
        let listing_url = listing_url(listing_id, name)?;

        let res = self
            .http
            .get(listing_url)
            .header("User-Agent", USER_AGENT)
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !res.status().is_success() {
            return Err(format!("listing page request failed: {}", res.status()));
        }

        let html = res.text().await.map_err(|e| e.to_string())?;
        let name_id = extract_name_id(&html)
            .ok_or_else(|| format!("no market item id found on listing page for '{name}'"))?;

        // Steam rate-limits aggressively; pause between the page hit and the
        // two histogram hits.
        time::sleep(Duration::from_secs(1)).await;
        let usd = self.fetch_currency_price(&name_id, CURRENCY_USD).await?;

        time::sleep(Duration::from_millis(500)).await;
        let rub = self.fetch_currency_price(&name_id, CURRENCY_RUB).await?;

        Ok(DualPrice {
            usd: round2(usd),
            rub: round2(rub),
        })
    }

    async fn fetch_currency_price(&self, name_id: &str, currency: u32) -> Result<f64, String> {
        let res = self
            .http
            .get(HISTOGRAM_URL)
            .header("User-Agent", USER_AGENT)
            .timeout(self.request_timeout)
            .query(&[
                ("country", "US".to_string()),
                ("language", "english".to_string()),
                ("currency", currency.to_string()),
                ("item_nameid", name_id.to_string()),
                ("two_factor", "0".to_string()),
            ])
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !res.status().is_success() {
            return Err(format!("histogram request failed: {}", res.status()));
        }

        let histogram = res
            .json::<Histogram>()
            .await
            .map_err(|e| e.to_string())?;

        lowest_sell_price(&histogram)
            .ok_or_else(|| format!("no lowest_sell_order for item {name_id} in currency {currency}"))
    }
}

#[derive(Debug, Deserialize)]
struct Histogram {
    #[serde(default)]
    lowest_sell_order: Option<String>,
}

fn lowest_sell_price(histogram: &Histogram) -> Option<f64> {
    let cents = histogram.lowest_sell_order.as_deref()?.parse::<i64>().ok()?;
    Some(cents as f64 / 100.0)
}

static NAME_ID_RE: OnceLock<Regex> = OnceLock::new();

fn extract_name_id(html: &str) -> Option<String> {
    let re = NAME_ID_RE.get_or_init(|| {
        Regex::new(r"Market_LoadOrderSpread\(\s*(\d+)\s*\)").expect("order spread regex")
    });
    re.captures(html).map(|caps| caps[1].to_string())
}

fn listing_url(listing_id: i64, name: &str) -> Result<Url, String> {
    let mut url = Url::parse(LISTINGS_BASE).map_err(|e| e.to_string())?;
    // The base's trailing slash parses as an empty segment; drop it or the
    // pushes land after it and the path gets a double slash.
    url.path_segments_mut()
        .map_err(|_| "cannot build listing url".to_string())?
        .pop_if_empty()
        .push(&listing_id.to_string())
        .push(name.trim());
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_name_id_from_listing_page() {
        let html = r#"
            <script type="text/javascript">
                Market_LoadOrderSpread( 176321160 );
            </script>
        "#;
        assert_eq!(extract_name_id(html), Some("176321160".to_string()));
    }

    #[test]
    fn extracts_name_id_without_padding() {
        let html = "Market_LoadOrderSpread(42)";
        assert_eq!(extract_name_id(html), Some("42".to_string()));
    }

    #[test]
    fn missing_name_id_yields_none() {
        assert_eq!(extract_name_id("<html><body>nothing here</body></html>"), None);
    }

    #[test]
    fn histogram_price_is_cents_over_hundred() {
        let h: Histogram = serde_json::from_str(r#"{"lowest_sell_order":"1550"}"#).unwrap();
        assert_eq!(lowest_sell_price(&h), Some(15.5));
    }

    #[test]
    fn null_or_missing_lowest_sell_order_is_a_failure() {
        let h: Histogram = serde_json::from_str(r#"{"lowest_sell_order":null}"#).unwrap();
        assert_eq!(lowest_sell_price(&h), None);

        let h: Histogram = serde_json::from_str(r#"{"success":1}"#).unwrap();
        assert_eq!(lowest_sell_price(&h), None);
    }

    #[test]
    fn non_numeric_lowest_sell_order_is_a_failure() {
        let h: Histogram = serde_json::from_str(r#"{"lowest_sell_order":"abc"}"#).unwrap();
        assert_eq!(lowest_sell_price(&h), None);
    }

    #[test]
    fn listing_url_encodes_item_names() {
        let url = listing_url(730, "Fracture Case").unwrap();
        assert_eq!(
            url.as_str(),
            "https://steamcommunity.com/market/listings/730/Fracture%20Case"
        );

        let url = listing_url(730, "AK-47 | Redline (Field-Tested)").unwrap();
        assert!(url.as_str().contains("/730/"));
        assert!(!url.as_str().contains(' '));
    }

    #[test]
    fn listing_url_has_no_empty_path_segments() {
        let url = listing_url(730, "Fracture Case").unwrap();
        assert!(!url.path().contains("//"));
        assert!(url.path().starts_with("/market/listings/730/"));
    }
}
