pub mod traits;
pub mod trackers;
pub mod notifiers;

pub use traits::{Notifier, PriceStrategy};
pub use trackers::PriceTracker;
pub use notifiers::TelegramNotifier;
