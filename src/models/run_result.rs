use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::TrackedItem;

/// Outcome of checking one item during the current run. Exported to the run
/// summary file and logged; never consulted for decisions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunResult {
    pub name: String,
    pub url: String,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub checked_at: DateTime<Utc>,
    pub price: Option<Decimal>,
    pub used_url: Option<String>,
    pub error: Option<String>,
    pub notified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notify_resp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notify_error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notified_price: Option<Decimal>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "chrono::serde::ts_seconds_option"
    )]
    pub notified_at: Option<DateTime<Utc>>,
}

impl RunResult {
    pub fn new(item: &TrackedItem, checked_at: DateTime<Utc>) -> Self {
        Self {
            name: item.display_name().to_string(),
            url: item.url.clone(),
            checked_at,
            price: None,
            used_url: None,
            error: None,
            notified: false,
            notify_resp: None,
            notify_error: None,
            notified_price: None,
            notified_at: None,
        }
    }

    /// Result for an item whose worker died before producing an outcome.
    pub fn fault(item: &TrackedItem, message: &str) -> Self {
        Self {
            error: Some(format!("exception: {}", message)),
            ..Self::new(item, Utc::now())
        }
    }

    /// Result for an item rejected before any request was made.
    pub fn invalid(item: &TrackedItem, message: &str) -> Self {
        Self {
            error: Some(format!("invalid item: {}", message)),
            ..Self::new(item, Utc::now())
        }
    }

    /// The one-line console summary for this item.
    pub fn summary_line(&self, currency_label: &str) -> String {
        if let Some(error) = &self.error {
            return format!("[{}] ERROR: {}", self.name, error);
        }
        match self.price {
            Some(price) => format!(
                "[{}] price={} {}; notified={}",
                self.name,
                price.normalize(),
                currency_label,
                self.notified
            ),
            None => format!(
                "[{}] price not found (used_url={})",
                self.name,
                self.used_url.as_deref().unwrap_or("None")
            ),
        }
    }
}
