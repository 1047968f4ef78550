//! Periodic alert evaluation + notification sweep across subscribers.

use std::time::Duration;

use tokio::time;

use crate::{
    models::User,
    services::{evaluator::Currency, watchlist_service},
    AppState,
};

pub fn spawn_alert_notifier(state: AppState) {
    tokio::spawn(async move {
        let mut interval = time::interval(Duration::from_secs(state.settings.notify_interval_secs));

        loop {
            interval.tick().await;

            if let Err(e) = run_tick(&state).await {
                tracing::error!("[alert-notify] tick error: {}", e);
            }
        }
    });
}

async fn run_tick(state: &AppState) -> Result<(), String> {
    let subscribers = watchlist_service::get_subscribers(state).await?;

    if subscribers.is_empty() {
        return Ok(());
    }

    tracing::info!("evaluating alerts for {} subscribers", subscribers.len());

    for user in subscribers {
        // One failing subscriber must not end the sweep for the rest.
        if let Err(e) = notify_user(state, &user).await {
            tracing::error!("error notifying subscriber {}: {}", user.telegram_id, e);
        }

        // Inter-send delay for the Telegram rate limit.
        time::sleep(Duration::from_secs(1)).await;
    }

    Ok(())
}

async fn notify_user(state: &AppState, user: &User) -> Result<(), String> {
    let currency = Currency::parse(&user.currency);
    let alerts = watchlist_service::alerts_for_user(state, user.id, currency).await?;

    if alerts.is_empty() {
        tracing::debug!("no alerts for subscriber {}", user.telegram_id);
        return Ok(());
    }

    state
        .notifier
        .send_alerts(user, &alerts.buy, &alerts.sell)
        .await?;

    tracing::info!(
        "notified subscriber {}: {} buy, {} sell",
        user.telegram_id,
        alerts.buy.len(),
        alerts.sell.len()
    );

    Ok(())
}
