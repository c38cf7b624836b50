use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::plugins::traits::{PageContent, PriceStrategy};

/// Last resort: a `"price"` or `"currentPrice"` key anywhere in the raw
/// markup, including inline scripts and embedded JSON state.
pub struct RawMarkupStrategy {
    pattern: Regex,
}

impl RawMarkupStrategy {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(r#""(?:price|currentPrice)"\s*:\s*"?(\d{1,6})"?"#).unwrap(),
        }
    }
}

impl Default for RawMarkupStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl PriceStrategy for RawMarkupStrategy {
    fn name(&self) -> &str {
        "raw-markup"
    }

    fn extract(&self, page: &PageContent<'_>) -> Option<Decimal> {
        let captures = self.pattern.captures(page.raw)?;
        Decimal::from_str(captures.get(1)?.as_str()).ok()
    }
}
