use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub watcher: WatcherConfig,
    pub scraper: ScraperConfig,
    pub telegram: TelegramConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatcherConfig {
    pub items_file: PathBuf,
    pub state_file: PathBuf,
    pub results_file: PathBuf,
    pub workers: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    pub user_agent: String,
    pub accept_language: String,
    /// Seconds.
    pub request_timeout: u64,
    pub request_delay_ms: u64,
    pub search_markers: Vec<String>,
    pub product_path: String,
    pub currency_symbol: String,
    pub currency_label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    pub api_base: String,
    /// Seconds.
    pub request_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub log_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            watcher: WatcherConfig {
                items_file: PathBuf::from("items.json"),
                state_file: PathBuf::from("state.json"),
                results_file: PathBuf::from("last_run_results.json"),
                workers: 6,
            },
            scraper: ScraperConfig {
                user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/128.0 Safari/537.36".to_string(),
                accept_language: "uk,ru;q=0.8,en;q=0.7".to_string(),
                request_timeout: 20,
                request_delay_ms: 1000,
                search_markers: vec!["/search".to_string(), "find=".to_string()],
                product_path: "/product/".to_string(),
                currency_symbol: "₴".to_string(),
                currency_label: "грн".to_string(),
            },
            telegram: TelegramConfig {
                api_base: "https://api.telegram.org".to_string(),
                request_timeout: 10,
            },
            logging: LoggingConfig {
                level: "price_watcher=info".to_string(),
                log_dir: None,
            },
        }
    }
}

impl AppConfig {
    /// Layered load: built-in defaults, `config/default`, `config/local`, an
    /// optional explicit file, then `PRICEWATCH__SECTION__KEY` variables.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .add_source(Config::try_from(&AppConfig::default())?)
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false));

        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path).required(true));
        }

        let s = builder
            .add_source(
                Environment::with_prefix("PRICEWATCH")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        let config: AppConfig = s.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.watcher.workers == 0 {
            return Err(ConfigError::Message("Watcher workers must be greater than 0".into()));
        }

        if self.scraper.request_timeout == 0 {
            return Err(ConfigError::Message("Scraper request_timeout must be greater than 0".into()));
        }

        if self.scraper.search_markers.iter().any(|m| m.is_empty()) {
            return Err(ConfigError::Message("Scraper search_markers must not contain empty entries".into()));
        }

        if self.scraper.product_path.is_empty() {
            return Err(ConfigError::Message("Scraper product_path must not be empty".into()));
        }

        if self.scraper.currency_symbol.is_empty() {
            return Err(ConfigError::Message("Scraper currency_symbol must not be empty".into()));
        }

        if Url::parse(&self.telegram.api_base).is_err() {
            return Err(ConfigError::Message("Invalid Telegram api_base URL".into()));
        }

        if self.telegram.request_timeout == 0 {
            return Err(ConfigError::Message("Telegram request_timeout must be greater than 0".into()));
        }

        Ok(())
    }
}
