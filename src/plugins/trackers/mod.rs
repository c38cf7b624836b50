// Price extraction strategies, in priority order
pub mod structured_data;
pub mod price_attribute;
pub mod currency_text;
pub mod raw_markup;
pub mod price;

pub use structured_data::StructuredDataStrategy;
pub use price_attribute::PriceAttributeStrategy;
pub use currency_text::CurrencyTextStrategy;
pub use raw_markup::RawMarkupStrategy;
pub use price::{PriceTracker, normalize_price};
