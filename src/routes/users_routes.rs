use axum::{
    routing::{get, post, put},
    Router,
};

use crate::{controllers::users_controller, AppState};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/users", post(users_controller::post_create_user))
        .route("/users/subscribers", get(users_controller::get_subscribers))
        .route("/users/:id", get(users_controller::get_user))
        .route(
            "/users/:id/subscription",
            put(users_controller::put_subscription),
        )
        .route("/users/:id/currency", put(users_controller::put_currency))
}
