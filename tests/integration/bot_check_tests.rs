use super::*;
use price_watcher::bot_check::{check_bot, TEST_MESSAGE};
use price_watcher::plugins::notifiers::TelegramClient;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_check_bot_reports_each_call() -> anyhow::Result<()> {
    let env = TestEnv::start().await?;
    Mock::given(method("GET"))
        .and(path("/botT0KEN/getMe"))
        .respond_with(ResponseTemplate::new(401).set_body_string(r#"{"ok":false,"error_code":401,"description":"Unauthorized"}"#))
        .expect(1)
        .mount(&env.telegram)
        .await;
    Mock::given(method("GET"))
        .and(path("/botT0KEN/getUpdates"))
        .respond_with(ResponseTemplate::new(401).set_body_string(r#"{"ok":false}"#))
        .expect(1)
        .mount(&env.telegram)
        .await;
    Mock::given(method("POST"))
        .and(path("/botT0KEN/sendMessage"))
        .respond_with(ResponseTemplate::new(401).set_body_string(r#"{"ok":false}"#))
        .expect(1)
        .mount(&env.telegram)
        .await;

    let api = TelegramClient::new(&env.telegram.uri(), Duration::from_secs(5))?;
    let mut out = Vec::new();
    check_bot(&api, Some("T0KEN".to_string()), Some("42".to_string()), &mut out).await?;

    let printed = String::from_utf8(out)?;
    assert!(printed.contains("getMe: 401\n"));
    assert!(printed.contains("Unauthorized"));
    assert!(printed.contains("getUpdates: 401\n"));
    assert!(printed.contains("sendMessage: 401\n"));
    assert!(!TEST_MESSAGE.is_empty());

    Ok(())
}
