use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Sentinel response when a send is refused for lack of credentials.
pub const MISSING_CREDENTIALS: &str = "no-token-or-chat";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationResult {
    pub success: bool,
    /// Raw response body on success or failure, or the transport error text.
    pub response: String,
}

impl NotificationResult {
    pub fn sent(response: impl Into<String>) -> Self {
        Self {
            success: true,
            response: response.into(),
        }
    }

    pub fn failed(response: impl Into<String>) -> Self {
        Self {
            success: false,
            response: response.into(),
        }
    }
}

/// Delivery channel for price alerts. A send is a single attempt; failures are
/// reported in the result, never as errors.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, message: &str) -> NotificationResult;
}
