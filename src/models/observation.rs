use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::RunResult;

/// Last known state of one tracked URL, persisted between runs.
///
/// `notified` describes only the send attempt of the run that wrote this
/// record. `notified_price` is the price of the last successful alert and is
/// what later runs compare against to decide whether a further drop is news.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Observation {
    pub name: String,
    pub url: String,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub checked_at: DateTime<Utc>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub notified: bool,
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub notified_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notified_price: Option<Decimal>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notify_error: Option<String>,
}

impl Observation {
    /// Whether `price` is news given the previous record for the same URL.
    ///
    /// A price at or below target is sent when the last run did not deliver
    /// an alert, or when it undercuts the last successfully alerted price.
    pub fn should_notify(previous: Option<&Observation>, price: Decimal, target: Decimal) -> bool {
        if price > target {
            return false;
        }

        match previous {
            None => true,
            Some(prev) if !prev.notified => true,
            Some(prev) => prev.notified_price.is_some_and(|last| price < last),
        }
    }

    /// The record that replaces whatever was stored for this URL.
    pub fn from_result(result: &RunResult) -> Self {
        Self {
            name: result.name.clone(),
            url: result.url.clone(),
            checked_at: result.checked_at,
            price: result.price,
            notified: result.notified,
            notified_at: result.notified_at,
            notified_price: result.notified_price,
            error: result.error.clone(),
            notify_error: result.notify_error.clone(),
        }
    }
}
