use axum::Router;

use crate::{controllers::home_controller, AppState};

pub mod home_routes;
pub mod users_routes;
pub mod items_routes;
pub mod watchlist_routes;
pub mod alerts_routes;

pub fn app(state: AppState) -> Router {
    let router = Router::<AppState>::new();

    let router = home_routes::add_routes(router);
    let router = users_routes::add_routes(router);
    let router = items_routes::add_routes(router);
    let router = watchlist_routes::add_routes(router);
    let router = alerts_routes::add_routes(router);

    router
        .fallback(home_controller::not_found)
        .with_state(state)
}
