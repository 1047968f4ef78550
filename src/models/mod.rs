pub mod user;
pub mod item;
pub mod watch_entry;

pub use user::User;
pub use item::Item;
pub use watch_entry::{WatchEntry, WatchEntryWithItem};
