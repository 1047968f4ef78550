//! Telegram Bot API notification dispatcher.

use reqwest::Client;
use serde_json::json;

use crate::models::User;
use crate::services::evaluator::AlertRecord;
use crate::services::format;

#[derive(Clone)]
pub struct TelegramNotifier {
    http: Client,
    token: String,
}

impl TelegramNotifier {
    pub fn new(token: String) -> Self {
        Self {
            http: Client::new(),
            token,
        }
    }

    fn has_token(&self) -> bool {
        !self.token.trim().is_empty()
    }

    /// Sends the rendered alert message for one user. Does not contact the
    /// user at all when both lists are empty.
    pub async fn send_alerts(
        &self,
        user: &User,
        buy: &[AlertRecord],
        sell: &[AlertRecord],
    ) -> Result<(), String> {
        let Some(message) = format::alerts_message(buy, sell, &user.currency) else {
            return Ok(());
        };

        self.send_message(user.telegram_id, &message).await
    }

    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), String> {
        if !self.has_token() {
            return Err("TELEGRAM_BOT_TOKEN is missing in .env".to_string());
        }

        let url = format!("https://api.telegram.org/bot{}/sendMessage", self.token);
        let res = self
            .http
            .post(&url)
            .json(&json!({
                "chat_id": chat_id,
                "text": text,
                "parse_mode": "Markdown",
                "disable_web_page_preview": true,
            }))
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(format!("telegram sendMessage failed: {status} {body}"));
        }

        Ok(())
    }
}
