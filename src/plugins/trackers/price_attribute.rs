use rust_decimal::Decimal;
use scraper::Selector;

use super::price::normalize_price;
use crate::plugins::traits::{PageContent, PriceStrategy};

/// First element carrying a `data-price` attribute.
pub struct PriceAttributeStrategy;

impl PriceStrategy for PriceAttributeStrategy {
    fn name(&self) -> &str {
        "data-price-attribute"
    }

    fn extract(&self, page: &PageContent<'_>) -> Option<Decimal> {
        let selector = Selector::parse("[data-price]").ok()?;
        let element = page.document.select(&selector).next()?;
        element.value().attr("data-price").and_then(normalize_price)
    }
}
