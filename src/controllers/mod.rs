pub mod home_controller;
pub mod users_controller;
pub mod items_controller;
pub mod watchlist_controller;
pub mod alerts_controller;
