//! Periodic price refresh sweep across all tracked items.

use std::time::Duration;

use tokio::time;

use crate::{services::watchlist_service, AppState};

pub fn spawn_price_refresh(state: AppState) {
    tokio::spawn(async move {
        let mut interval = time::interval(Duration::from_secs(state.settings.update_interval_secs));

        loop {
            interval.tick().await;

            if let Err(e) = run_tick(&state).await {
                tracing::error!("[price-refresh] tick error: {}", e);
            }
        }
    });
}

async fn run_tick(state: &AppState) -> Result<(), String> {
    let items = watchlist_service::get_all_items(state).await?;

    if items.is_empty() {
        return Ok(());
    }

    tracing::info!("refreshing prices for {} items", items.len());

    for item in items {
        match state.steam.fetch_dual_price(&item.name, item.listing_id).await {
            Ok(price) => {
                match watchlist_service::update_item_price(state, &item.name, price.usd, price.rub)
                    .await
                {
                    Ok(true) => tracing::info!(
                        "updated price for '{}': {:.2} USD / {:.2} RUB",
                        item.name,
                        price.usd,
                        price.rub
                    ),
                    Ok(false) => tracing::warn!("item vanished before price write: '{}'", item.name),
                    Err(e) => tracing::error!("price write failed for '{}': {}", item.name, e),
                }
            }
            // Previous stored price stays valid until the next cycle.
            Err(e) => tracing::warn!("no price update for '{}' this cycle: {}", item.name, e),
        }

        // Spacing between items keeps Steam from rate-limiting the sweep.
        time::sleep(Duration::from_secs(1)).await;
    }

    Ok(())
}
