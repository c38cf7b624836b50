// Shared fixtures for the end-to-end tests: a fake shop, a fake Bot API and
// a scratch directory holding items, state and results.

pub mod bot_check_tests;
pub mod watch_run_tests;

use price_watcher::AppConfig;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub struct TestEnv {
    pub dir: TempDir,
    pub shop: MockServer,
    pub telegram: MockServer,
}

impl TestEnv {
    pub async fn start() -> anyhow::Result<Self> {
        Ok(Self {
            dir: TempDir::new()?,
            shop: MockServer::start().await,
            telegram: MockServer::start().await,
        })
    }

    pub fn config(&self) -> AppConfig {
        let mut config = AppConfig::default();
        config.watcher.items_file = self.dir.path().join("items.json");
        config.watcher.state_file = self.dir.path().join("state.json");
        config.watcher.results_file = self.dir.path().join("last_run_results.json");
        config.watcher.workers = 3;
        config.scraper.request_delay_ms = 0;
        config.scraper.request_timeout = 5;
        config.telegram.api_base = self.telegram.uri();
        config.telegram.request_timeout = 5;
        config
    }

    pub fn shop_url(&self, path: &str) -> String {
        format!("{}{}", self.shop.uri(), path)
    }

    pub fn write_items(&self, items: Value) -> anyhow::Result<()> {
        std::fs::write(self.dir.path().join("items.json"), serde_json::to_string_pretty(&items)?)?;
        Ok(())
    }

    pub fn state(&self) -> anyhow::Result<Value> {
        read_json(&self.dir.path().join("state.json"))
    }

    pub fn results(&self) -> anyhow::Result<Value> {
        read_json(&self.dir.path().join("last_run_results.json"))
    }
}

pub fn read_json(path: &Path) -> anyhow::Result<Value> {
    Ok(serde_json::from_str(&std::fs::read_to_string(path)?)?)
}

pub async fn mount_page(server: &MockServer, page_path: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

pub fn product_page(name: &str, price: &str) -> String {
    format!(
        r#"<html><head>
            <script type="application/ld+json">{{"@type": "Product", "name": "{}", "offers": {{"@type": "Offer", "price": "{}", "priceCurrency": "UAH"}}}}</script>
        </head><body><h1>{}</h1><div class="price">{} ₴</div></body></html>"#,
        name, price, name, price
    )
}
