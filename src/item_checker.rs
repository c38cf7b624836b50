use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;
use validator::Validate;

use crate::models::{Observation, RunResult, TrackedItem};
use crate::plugins::traits::Notifier;
use crate::plugins::trackers::PriceTracker;
use crate::scraper::PageFetcher;

/// Checks one tracked item end to end: fetch, extract, decide, notify.
///
/// Every outcome, including fetch failures, ends up in the returned
/// [`RunResult`]; nothing here returns an error.
pub struct ItemChecker {
    fetcher: PageFetcher,
    tracker: PriceTracker,
    notifier: Arc<dyn Notifier>,
    currency_label: String,
}

impl ItemChecker {
    pub fn new(
        fetcher: PageFetcher,
        tracker: PriceTracker,
        notifier: Arc<dyn Notifier>,
        currency_label: &str,
    ) -> Self {
        Self {
            fetcher,
            tracker,
            notifier,
            currency_label: currency_label.to_string(),
        }
    }

    pub async fn check(&self, item: &TrackedItem, previous: Option<&Observation>) -> RunResult {
        if let Err(e) = item.validate() {
            tracing::warn!("Skipping invalid item {}: {}", item.display_name(), e);
            return RunResult::invalid(item, &e.to_string());
        }

        let fetched = self.fetcher.fetch(&item.url).await;
        let checked_at = Utc::now();
        let mut result = RunResult::new(item, checked_at);

        match fetched {
            Ok(page) => {
                result.price = self.tracker.extract(&page.content);
                result.used_url = Some(page.used_url);
            }
            Err(e) => {
                result.used_url = e.attempted_url().map(str::to_string);
                result.error = Some(e.to_string());
            }
        }

        let Some(price) = result.price else {
            return result;
        };

        if !Observation::should_notify(previous, price, item.target_price) {
            return result;
        }

        self.send_alert(item, price, checked_at, &mut result).await;
        result
    }

    async fn send_alert(
        &self,
        item: &TrackedItem,
        price: Decimal,
        checked_at: DateTime<Utc>,
        result: &mut RunResult,
    ) {
        let link = result.used_url.as_deref().unwrap_or(&item.url);
        let message = format_message(item.display_name(), price, item.target_price, link, &self.currency_label);

        let outcome = self.notifier.notify(&message).await;
        result.notified = outcome.success;
        if outcome.success {
            result.notified_at = Some(checked_at);
            result.notified_price = Some(price);
        } else {
            result.notify_error = Some(outcome.response.clone());
        }
        result.notify_resp = Some(outcome.response);
    }
}

pub fn format_message(name: &str, price: Decimal, target: Decimal, link: &str, currency_label: &str) -> String {
    format!(
        "🎯 {}\nЦіна: {} {} (ціль: {} {})\n{}",
        name,
        price.normalize(),
        currency_label,
        target.normalize(),
        currency_label,
        link
    )
}
