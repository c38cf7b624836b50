use reqwest::header::{ACCEPT_LANGUAGE, HeaderMap, HeaderValue};
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;
use url::Url;

use crate::config::ScraperConfig;
use crate::utils::error::{AppError, FetchError};

/// Content of the page a tracked URL finally resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub content: String,
    pub used_url: String,
}

pub struct PageFetcher {
    client: Client,
    config: ScraperConfig,
}

impl PageFetcher {
    pub fn new(config: ScraperConfig) -> crate::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_str(&config.accept_language).map_err(|e| AppError::Parse {
                message: format!("Invalid Accept-Language header: {}", e),
            })?,
        );

        let client = Client::builder()
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .timeout(Duration::from_secs(config.request_timeout))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn is_search_url(&self, url: &str) -> bool {
        self.config.search_markers.iter().any(|marker| url.contains(marker.as_str()))
    }

    /// Resolve a tracked URL to product page content. Search URLs take a
    /// second request to the first product linked from the results.
    pub async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let content = self
            .get(url)
            .await
            .map_err(|e| match e {
                RequestFailure::Transport(message) => FetchError::Transport(message),
                RequestFailure::Status(status) => FetchError::Status(status),
            })?;

        if !self.is_search_url(url) {
            return Ok(FetchedPage {
                content,
                used_url: url.to_string(),
            });
        }

        let product_url = find_first_product_url(&content, url, &self.config.product_path)
            .ok_or(FetchError::NoProductFound)?;
        tracing::debug!("Search page {} resolved to {}", url, product_url);

        let content = self.get(&product_url).await.map_err(|e| match e {
            RequestFailure::Transport(message) => FetchError::ProductTransport {
                product_url: product_url.clone(),
                message,
            },
            RequestFailure::Status(status) => FetchError::ProductStatus {
                product_url: product_url.clone(),
                status,
            },
        })?;

        Ok(FetchedPage {
            content,
            used_url: product_url,
        })
    }

    async fn get(&self, url: &str) -> Result<String, RequestFailure> {
        if self.config.request_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.request_delay_ms)).await;
        }

        tracing::debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| RequestFailure::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RequestFailure::Status(status.as_u16()));
        }

        response
            .text()
            .await
            .map_err(|e| RequestFailure::Transport(e.to_string()))
    }
}

enum RequestFailure {
    Transport(String),
    Status(u16),
}

/// First `<a href>` whose target contains `product_path`, made absolute
/// against the page it was found on.
pub fn find_first_product_url(html: &str, base_url: &str, product_path: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("a[href]").ok()?;
    let base = Url::parse(base_url).ok()?;

    document
        .select(&selector)
        .filter_map(|a| a.value().attr("href"))
        .map(str::trim)
        .find(|href| href.contains(product_path))
        .and_then(|href| base.join(href).ok())
        .map(|url| url.to_string())
}
