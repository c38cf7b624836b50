use rust_decimal::Decimal;
use scraper::Selector;
use serde_json::Value;

use super::price::normalize_price;
use crate::plugins::traits::{PageContent, PriceStrategy};

/// Reads schema.org product metadata from `application/ld+json` blocks:
/// `offers[].price` first, then the node's own `price`.
pub struct StructuredDataStrategy;

impl StructuredDataStrategy {
    fn price_from_node(node: &Value) -> Option<Decimal> {
        let node = node.as_object()?;

        let from_offers = node.get("offers").and_then(|offers| {
            let offers = match offers {
                Value::Array(list) => list.iter().collect::<Vec<_>>(),
                other => vec![other],
            };
            offers
                .into_iter()
                .filter_map(|offer| offer.as_object()?.get("price"))
                .find_map(price_value)
        });

        from_offers.or_else(|| node.get("price").and_then(price_value))
    }
}

fn price_value(value: &Value) -> Option<Decimal> {
    let price = match value {
        Value::String(s) => normalize_price(s),
        Value::Number(n) => normalize_price(&n.to_string()),
        _ => None,
    }?;
    (price > Decimal::ZERO).then_some(price)
}

impl PriceStrategy for StructuredDataStrategy {
    fn name(&self) -> &str {
        "structured-data"
    }

    fn extract(&self, page: &PageContent<'_>) -> Option<Decimal> {
        let selector = Selector::parse(r#"script[type="application/ld+json"]"#).ok()?;

        page.document.select(&selector).find_map(|script| {
            let body = script.text().collect::<String>();
            let data: Value = match serde_json::from_str(body.trim()) {
                Ok(data) => data,
                Err(e) => {
                    tracing::trace!("Skipping malformed ld+json block: {}", e);
                    return None;
                }
            };

            match &data {
                Value::Array(nodes) => nodes.iter().find_map(Self::price_from_node),
                node => Self::price_from_node(node),
            }
        })
    }
}
