use std::net::SocketAddr;

use mongodb::Client;
use tracing_subscriber;

use steamwatch::{config, routes, services, AppState};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let settings = config::load();

    // Mongo connection
    let client = Client::with_uri_str(&settings.mongodb_uri)
        .await
        .expect("Failed to connect to MongoDB");
    let db = client.database(&settings.mongodb_db);

    if let Err(e) = services::db_init::ensure_indexes(&db).await {
        tracing::warn!("could not ensure indexes: {}", e);
    }

    let steam = services::steam_market::SteamMarketClient::new(
        settings.request_timeout_secs,
        settings.max_retries,
    );
    let notifier = services::telegram::TelegramNotifier::new(settings.telegram_bot_token.clone());

    let state = AppState {
        db,
        settings: settings.clone(),
        steam,
        notifier,
    };

    // The two sweeps run on independent timers and only meet through the
    // database; a notification pass may read a price mid-refresh, which is
    // fine because each item's price write is a single atomic update.
    services::price_monitor::spawn_price_refresh(state.clone());
    services::notify_monitor::spawn_alert_notifier(state.clone());

    let app = routes::app(state);

    let addr = SocketAddr::from((settings.host.parse::<std::net::IpAddr>().unwrap(), settings.port));
    tracing::info!("listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
