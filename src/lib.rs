pub mod bot_check;
pub mod config;
pub mod credentials;
pub mod item_checker;
pub mod models;
pub mod plugins;
pub mod scraper;
pub mod state_store;
pub mod utils;
pub mod watcher;

// Re-export commonly used types
pub use config::AppConfig;
pub use utils::error::{AppError, FetchError};
pub use watcher::{RunTotals, Watcher};

pub type Result<T> = std::result::Result<T, AppError>;
