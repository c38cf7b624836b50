use rust_decimal::Decimal;
use scraper::Html;

/// A fetched page, kept both as raw markup and as a parsed document so each
/// strategy can read whichever form it needs.
pub struct PageContent<'a> {
    pub raw: &'a str,
    pub document: Html,
}

impl<'a> PageContent<'a> {
    pub fn parse(raw: &'a str) -> Self {
        Self {
            raw,
            document: Html::parse_document(raw),
        }
    }
}

/// One way of locating a price on a page. Strategies are pure: malformed
/// input yields `None`, never an error.
pub trait PriceStrategy: Send + Sync {
    fn name(&self) -> &str;

    fn extract(&self, page: &PageContent<'_>) -> Option<Decimal>;
}
