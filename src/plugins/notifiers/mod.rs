// Notifier implementations
pub mod telegram;

pub use telegram::{ApiResponse, TelegramClient, TelegramNotifier};
