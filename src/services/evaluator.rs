//! Buy/sell threshold evaluation over a user's watchlist.
//!
//! This is the one piece of real decision logic in the service. It is a pure
//! function over in-memory values: no database, no clock, no network. The
//! monitors and the HTTP alerts endpoint both call through here so the two
//! paths can never disagree on what counts as an alert.

use mongodb::bson::oid::ObjectId;

use crate::models::WatchEntryWithItem;

/// Currency an evaluation call compares prices in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Currency {
    Usd,
    Rub,
}

impl Currency {
    /// Case-insensitive. Anything that is not "rub" selects USD — unknown
    /// selectors deliberately degrade to the USD default instead of failing,
    /// matching the lenient contract of the alerts endpoint.
    pub fn parse(s: &str) -> Currency {
        if s.trim().eq_ignore_ascii_case("rub") {
            Currency::Rub
        } else {
            Currency::Usd
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Usd => "usd",
            Currency::Rub => "rub",
        }
    }
}

/// One triggered threshold. Transient: computed per evaluation pass, never
/// persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertRecord {
    pub watch_entry_id: ObjectId,
    pub item_id: ObjectId,
    pub item_name: String,
    pub listing_id: i64,
    pub current_price_usd: f64,
    pub current_price_rub: f64,
    pub target_price: f64,
    pub difference: f64,
    pub comparison_currency: Currency,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceAlerts {
    pub buy: Vec<AlertRecord>,
    pub sell: Vec<AlertRecord>,
}

impl PriceAlerts {
    pub fn is_empty(&self) -> bool {
        self.buy.is_empty() && self.sell.is_empty()
    }
}

pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Evaluate every entry against its targets at the item's current price in
/// `currency`.
///
/// Buy fires when `round2(price) <= round2(buy_target)`, sell when
/// `round2(price) >= round2(sell_target)`. Stored prices are already rounded
/// at write time; the re-round here keeps float drift from ever flipping a
/// comparison at the boundary. Because `sell_target > buy_target` holds per
/// entry, one entry can never land in both lists in the same call. Output
/// order follows input order.
pub fn evaluate(entries: &[WatchEntryWithItem], currency: Currency) -> PriceAlerts {
    let mut alerts = PriceAlerts::default();

    for we in entries {
        let current = match currency {
            Currency::Usd => we.item.current_price_usd,
            Currency::Rub => we.item.current_price_rub,
        };
        let p = round2(current);

        if p <= round2(we.entry.buy_target_price) {
            alerts.buy.push(record(
                we,
                currency,
                we.entry.buy_target_price,
                we.entry.buy_target_price - current,
            ));
        }

        if p >= round2(we.entry.sell_target_price) {
            alerts.sell.push(record(
                we,
                currency,
                we.entry.sell_target_price,
                current - we.entry.sell_target_price,
            ));
        }
    }

    alerts
}

fn record(
    we: &WatchEntryWithItem,
    currency: Currency,
    target_price: f64,
    difference: f64,
) -> AlertRecord {
    AlertRecord {
        watch_entry_id: we.entry.id,
        item_id: we.item.id,
        item_name: we.item.name.clone(),
        listing_id: we.item.listing_id,
        current_price_usd: we.item.current_price_usd,
        current_price_rub: we.item.current_price_rub,
        target_price,
        difference,
        comparison_currency: currency,
        url: we.entry.url.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Item, WatchEntry, WatchEntryWithItem};

    fn entry(buy: f64, sell: f64, usd: f64, rub: f64) -> WatchEntryWithItem {
        let item_id = ObjectId::new();
        WatchEntryWithItem {
            entry: WatchEntry {
                id: ObjectId::new(),
                user_id: ObjectId::new(),
                item_id,
                url: "https://steamcommunity.com/market/listings/730/Fracture%20Case".to_string(),
                buy_target_price: buy,
                sell_target_price: sell,
                created_at: 0,
            },
            item: Item {
                id: item_id,
                listing_id: 730,
                name: "Fracture Case".to_string(),
                current_price_usd: usd,
                current_price_rub: rub,
                url: "https://steamcommunity.com/market/listings/730/Fracture%20Case".to_string(),
            },
        }
    }

    #[test]
    fn price_below_buy_target_triggers_buy() {
        // buy 20.00 / sell 30.00, current 18.50 USD
        let entries = vec![entry(20.0, 30.0, 18.5, 1700.0)];
        let alerts = evaluate(&entries, Currency::Usd);

        assert_eq!(alerts.buy.len(), 1);
        assert!(alerts.sell.is_empty());
        assert_eq!(alerts.buy[0].target_price, 20.0);
        assert_eq!(alerts.buy[0].difference, 1.5);
        assert_eq!(alerts.buy[0].comparison_currency, Currency::Usd);
    }

    #[test]
    fn price_above_sell_target_triggers_sell() {
        let entries = vec![entry(20.0, 30.0, 31.0, 2800.0)];
        let alerts = evaluate(&entries, Currency::Usd);

        assert!(alerts.buy.is_empty());
        assert_eq!(alerts.sell.len(), 1);
        assert_eq!(alerts.sell[0].target_price, 30.0);
        assert_eq!(alerts.sell[0].difference, 1.0);
    }

    #[test]
    fn price_between_targets_triggers_nothing() {
        let entries = vec![entry(20.0, 30.0, 25.0, 2300.0)];
        let alerts = evaluate(&entries, Currency::Usd);
        assert!(alerts.is_empty());
    }

    #[test]
    fn boundary_prices_are_inclusive() {
        let at_buy = vec![entry(20.0, 30.0, 20.0, 0.0)];
        let alerts = evaluate(&at_buy, Currency::Usd);
        assert_eq!(alerts.buy.len(), 1);
        assert_eq!(alerts.buy[0].difference, 0.0);
        assert!(alerts.sell.is_empty());

        let at_sell = vec![entry(20.0, 30.0, 30.0, 0.0)];
        let alerts = evaluate(&at_sell, Currency::Usd);
        assert_eq!(alerts.sell.len(), 1);
        assert_eq!(alerts.sell[0].difference, 0.0);
        assert!(alerts.buy.is_empty());
    }

    #[test]
    fn buy_and_sell_are_mutually_exclusive_per_entry() {
        // Sweep prices across the whole band; sell > buy means no single
        // price can satisfy both inclusive comparisons.
        for price in [0.0, 10.0, 19.99, 20.0, 20.01, 25.0, 29.99, 30.0, 35.0] {
            let entries = vec![entry(20.0, 30.0, price, price)];
            let alerts = evaluate(&entries, Currency::Usd);
            assert!(
                alerts.buy.len() + alerts.sell.len() <= 1,
                "price {} fired both buy and sell",
                price
            );
        }
    }

    #[test]
    fn mixed_watchlist_routes_each_entry_correctly() {
        let buying = entry(20.0, 30.0, 18.5, 1700.0);
        let selling = entry(5.0, 8.0, 9.0, 830.0);
        let quiet = entry(20.0, 30.0, 25.0, 2300.0);
        let entries = vec![buying.clone(), selling.clone(), quiet];

        let alerts = evaluate(&entries, Currency::Usd);
        assert_eq!(alerts.buy.len(), 1);
        assert_eq!(alerts.sell.len(), 1);
        assert_eq!(alerts.buy[0].watch_entry_id, buying.entry.id);
        assert_eq!(alerts.sell[0].watch_entry_id, selling.entry.id);
    }

    #[test]
    fn output_preserves_input_order() {
        let first = entry(20.0, 30.0, 10.0, 900.0);
        let second = entry(15.0, 25.0, 10.0, 900.0);
        let entries = vec![first.clone(), second.clone()];

        let alerts = evaluate(&entries, Currency::Usd);
        assert_eq!(alerts.buy.len(), 2);
        assert_eq!(alerts.buy[0].watch_entry_id, first.entry.id);
        assert_eq!(alerts.buy[1].watch_entry_id, second.entry.id);
    }

    #[test]
    fn rub_comparison_ignores_usd_price() {
        // USD would be a buy, RUB is quiet.
        let entries = vec![entry(20.0, 30.0, 18.5, 25.0)];

        let alerts = evaluate(&entries, Currency::Rub);
        assert!(alerts.is_empty());

        let alerts = evaluate(&entries, Currency::Usd);
        assert_eq!(alerts.buy.len(), 1);
    }

    #[test]
    fn comparison_rerounds_drifted_prices() {
        // 19.999 would dodge an exact <= 20.00 check; rounding pulls it in.
        let entries = vec![entry(20.0, 30.0, 19.999, 1800.0)];
        let alerts = evaluate(&entries, Currency::Usd);

        assert_eq!(alerts.buy.len(), 1);
        assert!(alerts.buy[0].difference > 0.0);
    }

    #[test]
    fn empty_watchlist_yields_empty_alerts() {
        let alerts = evaluate(&[], Currency::Usd);
        assert!(alerts.buy.is_empty());
        assert!(alerts.sell.is_empty());
    }

    #[test]
    fn evaluation_is_idempotent() {
        let entries = vec![
            entry(20.0, 30.0, 18.5, 1700.0),
            entry(5.0, 8.0, 9.0, 830.0),
            entry(20.0, 30.0, 25.0, 2300.0),
        ];

        let first = evaluate(&entries, Currency::Rub);
        let second = evaluate(&entries, Currency::Rub);
        assert_eq!(first, second);
    }

    #[test]
    fn currency_parse_is_case_insensitive_with_usd_fallback() {
        assert_eq!(Currency::parse("usd"), Currency::Usd);
        assert_eq!(Currency::parse("USD"), Currency::Usd);
        assert_eq!(Currency::parse("rub"), Currency::Rub);
        assert_eq!(Currency::parse("RUB"), Currency::Rub);
        assert_eq!(Currency::parse(" Rub "), Currency::Rub);

        // Unknown selectors fall back to USD instead of erroring.
        assert_eq!(Currency::parse("eur"), Currency::Usd);
        assert_eq!(Currency::parse(""), Currency::Usd);
    }

    #[test]
    fn round2_behaves_at_cents() {
        assert_eq!(round2(19.999), 20.0);
        assert_eq!(round2(19.994), 19.99);
        assert_eq!(round2(0.005), 0.01);
        assert_eq!(round2(25.0), 25.0);
    }
}
