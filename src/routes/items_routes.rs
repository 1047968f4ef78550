use axum::{
    routing::{get, post, put},
    Router,
};

use crate::{controllers::items_controller, AppState};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route(
            "/items",
            post(items_controller::post_create_item).get(items_controller::get_all_items),
        )
        .route("/items/price", put(items_controller::put_item_price))
        .route("/items/exists/:name", get(items_controller::get_item_exists))
        .route("/items/:id", get(items_controller::get_item))
}
