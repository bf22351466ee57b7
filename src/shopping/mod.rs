//! Per-user shopping lists driven by slash commands and an inline menu.

pub mod engine;
pub mod menu;
pub mod replies;
pub mod session;
pub mod store;


pub use engine::{parse_command, Action, Event, ShoppingEngine};
pub use menu::MenuButton;
pub use store::ListStore;
