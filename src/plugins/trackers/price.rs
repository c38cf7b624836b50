use rust_decimal::Decimal;
use std::str::FromStr;

use super::{CurrencyTextStrategy, PriceAttributeStrategy, RawMarkupStrategy, StructuredDataStrategy};
use crate::plugins::traits::{PageContent, PriceStrategy};

pub const DEFAULT_CURRENCY_SYMBOL: &str = "₴";

/// Best-effort price extraction over an ordered chain of strategies. The
/// first strategy producing a positive number wins; later ones never run.
pub struct PriceTracker {
    strategies: Vec<Box<dyn PriceStrategy>>,
}

impl PriceTracker {
    pub fn new() -> Self {
        Self::with_currency_symbol(DEFAULT_CURRENCY_SYMBOL)
    }

    pub fn with_currency_symbol(currency_symbol: &str) -> Self {
        Self {
            strategies: vec![
                Box::new(StructuredDataStrategy),
                Box::new(PriceAttributeStrategy),
                Box::new(CurrencyTextStrategy::new(currency_symbol)),
                Box::new(RawMarkupStrategy::new()),
            ],
        }
    }

    pub fn strategy_names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub fn extract(&self, html: &str) -> Option<Decimal> {
        let page = PageContent::parse(html);

        self.strategies.iter().find_map(|strategy| {
            let price = strategy
                .extract(&page)
                .filter(|price| *price > Decimal::ZERO)?;
            tracing::debug!(strategy = strategy.name(), %price, "Price extracted");
            Some(price)
        })
    }
}

impl Default for PriceTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a price string after dropping narrow/non-breaking and plain spaces.
/// Accepts ASCII digits with at most one decimal point and nothing else.
pub fn normalize_price(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '\u{202f}' | '\u{a0}' | ' '))
        .collect();

    let digits = cleaned.chars().filter(|c| c.is_ascii_digit()).count();
    let points = cleaned.chars().filter(|c| *c == '.').count();
    if digits == 0 || points > 1 || digits + points != cleaned.chars().count() {
        return None;
    }

    let canonical = cleaned.trim_end_matches('.');
    if canonical.starts_with('.') {
        Decimal::from_str(&format!("0{}", canonical)).ok()
    } else {
        Decimal::from_str(canonical).ok()
    }
}
