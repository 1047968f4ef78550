use axum::{
    routing::{delete, get, put},
    Router,
};

use crate::{controllers::watchlist_controller, AppState};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    // ":entry" is the item id for delete/check and the watchlist entry id
    // for the prices update, matching how each handler looks it up.
    router
        .route(
            "/users/:id/watchlist",
            get(watchlist_controller::get_watchlist).post(watchlist_controller::post_add_entry),
        )
        .route(
            "/users/:id/watchlist/check/:entry",
            get(watchlist_controller::get_check_entry),
        )
        .route(
            "/users/:id/watchlist/:entry",
            delete(watchlist_controller::delete_entry),
        )
        .route(
            "/users/:id/watchlist/:entry/prices",
            put(watchlist_controller::put_entry_targets),
        )
}
