//! Telegram message rendering for alert notifications.

use crate::services::evaluator::AlertRecord;

const SEPARATOR_WIDTH: usize = 50;

/// Full notification body for one subscriber, or `None` when there is
/// nothing to say (the dispatcher must not contact the user in that case).
/// `display_currency` is the user's preference ("USD"/"RUB") and only picks
/// which current price is shown; it does not affect which alerts fired.
pub fn alerts_message(
    buy: &[AlertRecord],
    sell: &[AlertRecord],
    display_currency: &str,
) -> Option<String> {
    let mut parts: Vec<String> = Vec::new();

    if let Some(msg) = group_message(buy, "💰 Buy alerts:", "<=", display_currency) {
        parts.push(msg);
    }
    if let Some(msg) = group_message(sell, "📈 Sell alerts:", ">=", display_currency) {
        parts.push(msg);
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("\n\n"))
    }
}

fn group_message(
    alerts: &[AlertRecord],
    header: &str,
    op: &str,
    display_currency: &str,
) -> Option<String> {
    if alerts.is_empty() {
        return None;
    }

    let mut lines = vec![header.to_string()];
    for alert in alerts {
        let current = if display_currency.eq_ignore_ascii_case("RUB") {
            alert.current_price_rub
        } else {
            alert.current_price_usd
        };
        lines.push(format!(
            "{}: {:.2} {} {:.2} [LINK]({})",
            alert.item_name, current, op, alert.target_price, alert.url
        ));
        lines.push("-".repeat(SEPARATOR_WIDTH));
    }

    Some(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::evaluator::Currency;
    use mongodb::bson::oid::ObjectId;

    fn record(name: &str, usd: f64, rub: f64, target: f64) -> AlertRecord {
        AlertRecord {
            watch_entry_id: ObjectId::new(),
            item_id: ObjectId::new(),
            item_name: name.to_string(),
            listing_id: 730,
            current_price_usd: usd,
            current_price_rub: rub,
            target_price: target,
            difference: (target - usd).abs(),
            comparison_currency: Currency::Usd,
            url: "https://steamcommunity.com/market/listings/730/Fracture%20Case".to_string(),
        }
    }

    #[test]
    fn no_alerts_renders_nothing() {
        assert_eq!(alerts_message(&[], &[], "USD"), None);
    }

    #[test]
    fn buy_alert_line_shape() {
        let msg = alerts_message(&[record("Fracture Case", 18.5, 1700.0, 20.0)], &[], "USD")
            .expect("message");

        assert!(msg.starts_with("💰 Buy alerts:"));
        assert!(msg.contains("Fracture Case: 18.50 <= 20.00 [LINK]("));
        assert!(msg.contains(&"-".repeat(50)));
        assert!(!msg.contains("Sell alerts"));
    }

    #[test]
    fn sell_alert_uses_gte_operator() {
        let msg = alerts_message(&[], &[record("Fracture Case", 31.0, 2850.0, 30.0)], "USD")
            .expect("message");

        assert!(msg.starts_with("📈 Sell alerts:"));
        assert!(msg.contains("Fracture Case: 31.00 >= 30.00 [LINK]("));
    }

    #[test]
    fn both_groups_joined_by_blank_line() {
        let msg = alerts_message(
            &[record("Case A", 18.5, 1700.0, 20.0)],
            &[record("Case B", 31.0, 2850.0, 30.0)],
            "USD",
        )
        .expect("message");

        assert!(msg.contains("\n\n"));
        let buy_pos = msg.find("💰 Buy alerts:").unwrap();
        let sell_pos = msg.find("📈 Sell alerts:").unwrap();
        assert!(buy_pos < sell_pos);
    }

    #[test]
    fn rub_preference_shows_rub_price() {
        let msg = alerts_message(&[record("Fracture Case", 18.5, 1700.0, 20.0)], &[], "RUB")
            .expect("message");

        assert!(msg.contains("1700.00 <="));
        assert!(!msg.contains("18.50"));
    }
}
