use serde::{Deserialize, Serialize};

pub const TOKEN_ENV: &str = "TELEGRAM_BOT_TOKEN";
pub const CHAT_ID_ENV: &str = "TELEGRAM_CHAT_ID";

/// One place a setting may come from. Sources are tried in order and the
/// first one holding a non-empty value wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    Argument(Option<String>),
    Environment(&'static str),
}

impl CredentialSource {
    pub fn name(&self) -> String {
        match self {
            CredentialSource::Argument(_) => "command-line argument".to_string(),
            CredentialSource::Environment(var) => format!("environment variable {}", var),
        }
    }

    fn value(&self) -> Option<String> {
        let raw = match self {
            CredentialSource::Argument(value) => value.clone(),
            CredentialSource::Environment(var) => std::env::var(var).ok(),
        };
        raw.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub value: String,
    pub source: String,
}

pub fn resolve(sources: &[CredentialSource]) -> Option<Resolved> {
    sources.iter().find_map(|source| {
        source.value().map(|value| Resolved {
            value,
            source: source.name(),
        })
    })
}

/// Bot token and destination chat. Either may be missing; the gateway refuses
/// to send in that case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelegramCredentials {
    pub token: Option<String>,
    pub chat_id: Option<String>,
}

impl TelegramCredentials {
    pub fn new(token: &str, chat_id: &str) -> Self {
        Self {
            token: Some(token.to_string()),
            chat_id: Some(chat_id.to_string()),
        }
    }

    /// Credentials for the watch run: environment only.
    pub fn from_env() -> Self {
        Self {
            token: resolve(&[CredentialSource::Environment(TOKEN_ENV)]).map(|r| r.value),
            chat_id: resolve(&[CredentialSource::Environment(CHAT_ID_ENV)]).map(|r| r.value),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.token.is_some() && self.chat_id.is_some()
    }
}
