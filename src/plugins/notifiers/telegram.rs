use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::credentials::TelegramCredentials;
use crate::plugins::traits::{MISSING_CREDENTIALS, NotificationResult, Notifier};

/// Raw outcome of one Bot API call. `status` is `None` when the request never
/// produced a response; `body` then holds the transport error text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: Option<u16>,
    pub body: String,
}

impl ApiResponse {
    pub fn is_ok(&self) -> bool {
        self.status == Some(200)
    }

    pub fn status_label(&self) -> String {
        self.status
            .map(|s| s.to_string())
            .unwrap_or_else(|| "None".to_string())
    }
}

/// Thin client over `<api_base>/bot<token>/<method>`.
#[derive(Clone)]
pub struct TelegramClient {
    client: Client,
    api_base: String,
}

impl TelegramClient {
    pub fn new(api_base: &str, timeout: Duration) -> crate::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    fn method_url(&self, token: &str, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, token, method)
    }

    async fn into_api_response(result: reqwest::Result<reqwest::Response>) -> ApiResponse {
        match result {
            Ok(response) => {
                let status = response.status().as_u16();
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|e| format!("<unreadable body: {}>", e));
                ApiResponse {
                    status: Some(status),
                    body,
                }
            }
            Err(e) => ApiResponse {
                status: None,
                body: e.to_string(),
            },
        }
    }

    pub async fn get(&self, token: &str, method: &str) -> ApiResponse {
        tracing::debug!("Telegram GET {}", method);
        let result = self.client.get(self.method_url(token, method)).send().await;
        Self::into_api_response(result).await
    }

    pub async fn post_form(&self, token: &str, method: &str, form: &[(&str, &str)]) -> ApiResponse {
        tracing::debug!("Telegram POST {}", method);
        let result = self
            .client
            .post(self.method_url(token, method))
            .form(form)
            .send()
            .await;
        Self::into_api_response(result).await
    }

    pub async fn get_me(&self, token: &str) -> ApiResponse {
        self.get(token, "getMe").await
    }

    pub async fn get_updates(&self, token: &str) -> ApiResponse {
        self.get(token, "getUpdates").await
    }

    pub async fn send_message(&self, token: &str, chat_id: &str, text: &str) -> ApiResponse {
        self.post_form(token, "sendMessage", &[("chat_id", chat_id), ("text", text)])
            .await
    }
}

/// Sends alerts to one fixed chat.
pub struct TelegramNotifier {
    api: TelegramClient,
    credentials: TelegramCredentials,
}

impl TelegramNotifier {
    pub fn new(api: TelegramClient, credentials: TelegramCredentials) -> Self {
        Self { api, credentials }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, message: &str) -> NotificationResult {
        let (Some(token), Some(chat_id)) = (&self.credentials.token, &self.credentials.chat_id)
        else {
            tracing::warn!("[Telegram] Missing token or chat_id; skipping send.");
            return NotificationResult::failed(MISSING_CREDENTIALS);
        };

        let response = self.api.send_message(token, chat_id, message).await;
        if response.is_ok() {
            NotificationResult::sent(response.body)
        } else {
            tracing::warn!("[Telegram] sendMessage failed ({}): {}", response.status_label(), response.body);
            NotificationResult::failed(response.body)
        }
    }
}
