use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use validator::{Validate, ValidationError};

use crate::utils::files::load_json_or_default;

/// One entry of the item list: a page to watch and the price worth an alert.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct TrackedItem {
    #[serde(default)]
    pub name: Option<String>,

    #[validate(url)]
    pub url: String,

    #[serde(default)]
    #[validate(custom(function = "non_negative"))]
    pub target_price: Decimal,
}

impl TrackedItem {
    pub fn new(name: &str, url: &str, target_price: Decimal) -> Self {
        Self {
            name: Some(name.to_string()),
            url: url.to_string(),
            target_price,
        }
    }

    /// Name used in messages and logs; items without one are shown by URL.
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.url,
        }
    }
}

fn non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO {
        return Err(ValidationError::new("negative_target_price"));
    }
    Ok(())
}

/// An item list entry that could not be read. `item` carries whatever name
/// and URL the raw entry had, so the failure can be reported against it.
#[derive(Debug, Clone, PartialEq)]
pub struct MalformedItem {
    pub item: TrackedItem,
    pub reason: String,
}

/// Read one raw entry of the item list.
pub fn parse_item(position: usize, raw: Value) -> Result<TrackedItem, MalformedItem> {
    let text_field = |key: &str| {
        raw.get(key)
            .and_then(Value::as_str)
            .map(str::to_string)
            .filter(|v| !v.trim().is_empty())
    };
    let url = text_field("url");
    let name = text_field("name").or_else(|| url.is_none().then(|| format!("item #{}", position + 1)));

    serde_json::from_value(raw).map_err(|e| MalformedItem {
        item: TrackedItem {
            name,
            url: url.unwrap_or_default(),
            target_price: Decimal::ZERO,
        },
        reason: e.to_string(),
    })
}

/// Load the item list entry by entry, so one bad entry does not hide the
/// rest. A missing file or one that is not a JSON array yields an empty list,
/// which callers treat as "nothing to do".
pub fn load_items(path: &Path) -> Vec<Result<TrackedItem, MalformedItem>> {
    let raw: Vec<Value> = load_json_or_default(path);
    raw.into_iter()
        .enumerate()
        .map(|(position, entry)| parse_item(position, entry))
        .collect()
}
