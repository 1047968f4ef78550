use axum::{routing::get, Router};

use crate::{controllers::alerts_controller, AppState};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router.route(
        "/users/:id/watchlist/alerts",
        get(alerts_controller::get_watchlist_alerts),
    )
}
