use regex::Regex;
use rust_decimal::Decimal;
use scraper::Html;
use std::str::FromStr;

use crate::plugins::traits::{PageContent, PriceStrategy};

/// Number followed by the local currency glyph in the visible page text,
/// e.g. `1 299 ₴`.
pub struct CurrencyTextStrategy {
    pattern: Regex,
}

impl CurrencyTextStrategy {
    pub fn new(currency_symbol: &str) -> Self {
        let pattern = format!(
            r"([0-9]{{1,3}}(?:[ 0-9]{{0,6}}))\s*{}",
            regex::escape(currency_symbol)
        );
        Self {
            pattern: Regex::new(&pattern).expect("escaped currency pattern compiles"),
        }
    }
}

fn visible_text(document: &Html) -> String {
    let mut text = String::new();
    for node in document.root_element().descendants() {
        let Some(fragment) = node.value().as_text() else {
            continue;
        };
        let hidden = node
            .parent()
            .and_then(|parent| parent.value().as_element())
            .is_some_and(|e| matches!(e.name(), "script" | "style" | "noscript"));
        if !hidden {
            text.push_str(fragment);
        }
    }
    text
}

impl PriceStrategy for CurrencyTextStrategy {
    fn name(&self) -> &str {
        "currency-text"
    }

    fn extract(&self, page: &PageContent<'_>) -> Option<Decimal> {
        let text = visible_text(&page.document)
            .replace('\u{202f}', "")
            .replace('\u{a0}', " ");

        let captures = self.pattern.captures(&text)?;
        let digits = captures.get(1)?.as_str().replace(' ', "");
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        Decimal::from_str(&digits).ok()
    }
}
