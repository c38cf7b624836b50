use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parsing error: {message}")]
    Parse { message: String },

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(format!("{}", err))
    }
}

/// Failure to resolve a tracked URL to product page content.
///
/// The `Display` output is what gets recorded as the item's error, so the
/// wording is part of the persisted state format.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Transport(String),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("no-product-found-in-search")]
    NoProductFound,

    #[error("prod HTTP error: {message}")]
    ProductTransport { product_url: String, message: String },

    #[error("prod HTTP status {status}")]
    ProductStatus { product_url: String, status: u16 },
}

impl FetchError {
    /// Product page that was attempted before the failure, if any.
    pub fn attempted_url(&self) -> Option<&str> {
        match self {
            FetchError::ProductTransport { product_url, .. }
            | FetchError::ProductStatus { product_url, .. } => Some(product_url),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
