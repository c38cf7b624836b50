pub mod tracker;
pub mod notifier;

pub use tracker::{PageContent, PriceStrategy};
pub use notifier::{Notifier, NotificationResult, MISSING_CREDENTIALS};
