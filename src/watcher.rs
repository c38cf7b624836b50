use futures::stream::{FuturesUnordered, StreamExt};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinError;

use crate::config::AppConfig;
use crate::credentials::TelegramCredentials;
use crate::item_checker::ItemChecker;
use crate::models::{load_items, MalformedItem, Observation, RunResult, TrackedItem};
use crate::plugins::notifiers::{TelegramClient, TelegramNotifier};
use crate::plugins::trackers::PriceTracker;
use crate::scraper::PageFetcher;
use crate::state_store::StateStore;
use crate::utils::files::save_json;

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunTotals {
    pub checked: usize,
    pub prices_found: usize,
    pub notified: usize,
    pub errors: usize,
}

impl RunTotals {
    fn add(&mut self, result: &RunResult) {
        self.checked += 1;
        if result.price.is_some() {
            self.prices_found += 1;
        }
        if result.notified {
            self.notified += 1;
        }
        if result.error.is_some() {
            self.errors += 1;
        }
    }

    pub fn merge(&mut self, other: RunTotals) {
        self.checked += other.checked;
        self.prices_found += other.prices_found;
        self.notified += other.notified;
        self.errors += other.errors;
    }
}

impl fmt::Display for RunTotals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "checked={} prices_found={} notified={} errors={}",
            self.checked, self.prices_found, self.notified, self.errors
        )
    }
}

/// Runs item checks on a bounded pool and folds the outcomes into the state
/// store. Workers only read previous observations handed to them up front;
/// all writes happen in the aggregation loop.
pub struct Watcher {
    checker: Arc<ItemChecker>,
    workers: usize,
    currency_label: String,
}

impl Watcher {
    pub fn new(checker: Arc<ItemChecker>, workers: usize, currency_label: &str) -> Self {
        Self {
            checker,
            workers: workers.max(1),
            currency_label: currency_label.to_string(),
        }
    }

    pub fn from_config(config: &AppConfig, credentials: TelegramCredentials) -> crate::Result<Self> {
        let fetcher = PageFetcher::new(config.scraper.clone())?;
        let tracker = PriceTracker::with_currency_symbol(&config.scraper.currency_symbol);
        let api = TelegramClient::new(
            &config.telegram.api_base,
            Duration::from_secs(config.telegram.request_timeout),
        )?;
        let notifier = Arc::new(TelegramNotifier::new(api, credentials));

        let checker = ItemChecker::new(fetcher, tracker, notifier, &config.scraper.currency_label);
        Ok(Self::new(
            Arc::new(checker),
            config.watcher.workers,
            &config.scraper.currency_label,
        ))
    }

    /// Check every item, updating `store` as results arrive. Results come
    /// back in completion order.
    pub async fn check_all(&self, items: Vec<TrackedItem>, store: &mut StateStore) -> (Vec<RunResult>, RunTotals) {
        warn_on_duplicates(&items);

        let semaphore = Arc::new(Semaphore::new(self.workers));
        let mut pending: FuturesUnordered<_> = items
            .into_iter()
            .map(|item| {
                let previous = store.get(&item.url).cloned();
                let checker = Arc::clone(&self.checker);
                let semaphore = Arc::clone(&semaphore);
                let task_item = item.clone();

                let handle = tokio::spawn(async move {
                    let Ok(_permit) = semaphore.acquire_owned().await else {
                        return RunResult::fault(&task_item, "worker pool closed");
                    };
                    checker.check(&task_item, previous.as_ref()).await
                });

                async move { (item, handle.await) }
            })
            .collect();

        let mut results = Vec::with_capacity(pending.len());
        let mut totals = RunTotals::default();

        while let Some((item, joined)) = pending.next().await {
            let result = match joined {
                Ok(result) => {
                    store.record(Observation::from_result(&result));
                    result
                }
                Err(e) => {
                    let message = panic_message(e);
                    tracing::error!("Worker for {} failed: {}", item.url, message);
                    RunResult::fault(&item, &message)
                }
            };

            self.report(result, &mut results, &mut totals);
        }

        (results, totals)
    }

    /// Turn item list entries that could not be read into error results.
    /// Nothing is fetched for them and the state store is left alone.
    pub fn reject_all(&self, malformed: Vec<MalformedItem>) -> (Vec<RunResult>, RunTotals) {
        let mut results = Vec::with_capacity(malformed.len());
        let mut totals = RunTotals::default();

        for entry in malformed {
            let result = RunResult::invalid(&entry.item, &entry.reason);
            self.report(result, &mut results, &mut totals);
        }

        (results, totals)
    }

    fn report(&self, result: RunResult, results: &mut Vec<RunResult>, totals: &mut RunTotals) {
        let line = result.summary_line(&self.currency_label);
        if result.error.is_some() {
            tracing::warn!("{}", line);
        } else {
            tracing::info!("{}", line);
        }

        totals.add(&result);
        results.push(result);
    }
}

/// One full watch run: load items and state, check everything, persist.
pub async fn run(config: &AppConfig, credentials: TelegramCredentials) -> crate::Result<RunTotals> {
    if !credentials.is_complete() {
        tracing::warn!(
            "TELEGRAM_BOT_TOKEN or TELEGRAM_CHAT_ID not set. Telegram notifications will be skipped."
        );
    }

    let entries = load_items(&config.watcher.items_file);
    if entries.is_empty() {
        tracing::info!("No items found in {}", config.watcher.items_file.display());
        return Ok(RunTotals::default());
    }

    let mut items = Vec::with_capacity(entries.len());
    let mut malformed = Vec::new();
    for entry in entries {
        match entry {
            Ok(item) => items.push(item),
            Err(bad) => malformed.push(bad),
        }
    }

    let mut store = StateStore::load(&config.watcher.state_file);
    let watcher = Watcher::from_config(config, credentials)?;

    tracing::info!("Checking {} items with {} workers", items.len(), watcher.workers);
    let (mut results, mut totals) = watcher.reject_all(malformed);
    let (checked, checked_totals) = watcher.check_all(items, &mut store).await;
    results.extend(checked);
    totals.merge(checked_totals);

    store.save()?;
    save_json(&config.watcher.results_file, &results)?;

    tracing::info!("Run complete: {}", totals);
    Ok(totals)
}

fn warn_on_duplicates(items: &[TrackedItem]) {
    let mut seen = HashSet::new();
    for item in items {
        if !seen.insert(item.url.as_str()) {
            tracing::warn!("Duplicate item URL {}; the last result to finish wins", item.url);
        }
    }
}

fn panic_message(error: JoinError) -> String {
    if !error.is_panic() {
        return error.to_string();
    }
    let payload = error.into_panic();
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "worker panicked".to_string()
    }
}
