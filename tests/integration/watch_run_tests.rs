use super::*;
use price_watcher::credentials::TelegramCredentials;
use price_watcher::watcher;
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, ResponseTemplate};

fn credentials() -> TelegramCredentials {
    TelegramCredentials::new("T0KEN", "777")
}

#[tokio::test]
async fn test_alert_is_sent_once_across_runs() -> anyhow::Result<()> {
    let env = TestEnv::start().await?;
    mount_page(&env.shop, "/product/phone", &product_page("Phone", "450")).await;
    Mock::given(method("POST"))
        .and(path("/botT0KEN/sendMessage"))
        .and(body_string_contains("chat_id=777"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"ok":true,"result":{"message_id":1}}"#))
        .expect(1)
        .mount(&env.telegram)
        .await;

    let url = env.shop_url("/product/phone");
    env.write_items(json!([{"name": "Phone", "url": url, "target_price": 500}]))?;

    let first = watcher::run(&env.config(), credentials()).await?;
    assert_eq!(first.notified, 1);

    let state = env.state()?;
    assert_eq!(state[&url]["price"], 450.0);
    assert_eq!(state[&url]["notified"], true);
    assert_eq!(state[&url]["notified_price"], 450.0);
    assert!(state[&url]["notified_at"].is_i64());

    let results = env.results()?;
    assert_eq!(results[0]["notified"], true);
    assert!(results[0]["notify_resp"].as_str().unwrap_or_default().contains("message_id"));

    let second = watcher::run(&env.config(), credentials()).await?;
    assert_eq!(second.notified, 0);

    let state = env.state()?;
    assert_eq!(state[&url]["notified"], false);
    assert!(state[&url]["notified_price"].is_null());

    Ok(())
}

#[tokio::test]
async fn test_failed_send_is_retried_next_run() -> anyhow::Result<()> {
    let env = TestEnv::start().await?;
    mount_page(&env.shop, "/product/kettle", &product_page("Kettle", "899")).await;
    Mock::given(method("POST"))
        .and(path("/botT0KEN/sendMessage"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&env.telegram)
        .await;
    Mock::given(method("POST"))
        .and(path("/botT0KEN/sendMessage"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"ok":true}"#))
        .expect(1)
        .mount(&env.telegram)
        .await;

    let url = env.shop_url("/product/kettle");
    env.write_items(json!([{"name": "Kettle", "url": url, "target_price": 1000}]))?;

    watcher::run(&env.config(), credentials()).await?;
    let state = env.state()?;
    assert_eq!(state[&url]["notified"], false);
    assert_eq!(state[&url]["notify_error"], "Bad Gateway");
    assert!(state[&url]["notified_price"].is_null());

    watcher::run(&env.config(), credentials()).await?;
    let state = env.state()?;
    assert_eq!(state[&url]["notified"], true);
    assert_eq!(state[&url]["notified_price"], 899.0);
    assert!(state[&url].get("notify_error").is_none());

    Ok(())
}

#[tokio::test]
async fn test_search_url_alerts_with_product_link() -> anyhow::Result<()> {
    let env = TestEnv::start().await?;
    mount_page(
        &env.shop,
        "/search",
        r#"<ul><li><a href="/category/dairy">Dairy</a></li><li><a href="/product/milk-2-5">Milk</a></li></ul>"#,
    )
    .await;
    mount_page(&env.shop, "/product/milk-2-5", r#"<span data-price="54">54 ₴</span>"#).await;

    let product_url = env.shop_url("/product/milk-2-5");
    Mock::given(method("POST"))
        .and(path("/botT0KEN/sendMessage"))
        .and(body_string_contains("milk-2-5"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"ok":true}"#))
        .expect(1)
        .mount(&env.telegram)
        .await;

    let url = env.shop_url("/search?q=milk");
    env.write_items(json!([{"name": "Milk", "url": url, "target_price": 60}]))?;

    watcher::run(&env.config(), credentials()).await?;

    let results = env.results()?;
    assert_eq!(results[0]["used_url"], product_url.as_str());
    assert_eq!(results[0]["price"], 54.0);

    // State stays keyed by the tracked search URL.
    let state = env.state()?;
    assert_eq!(state[&url]["notified"], true);

    Ok(())
}

#[tokio::test]
async fn test_missing_credentials_skip_the_network() -> anyhow::Result<()> {
    let env = TestEnv::start().await?;
    mount_page(&env.shop, "/product/phone", &product_page("Phone", "450")).await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&env.telegram)
        .await;

    let url = env.shop_url("/product/phone");
    env.write_items(json!([{"name": "Phone", "url": url, "target_price": 500}]))?;

    let partial = TelegramCredentials {
        token: Some("T0KEN".to_string()),
        chat_id: None,
    };
    watcher::run(&env.config(), partial).await?;

    let state = env.state()?;
    assert_eq!(state[&url]["notified"], false);
    assert_eq!(state[&url]["notify_error"], "no-token-or-chat");

    Ok(())
}

#[tokio::test]
async fn test_state_from_earlier_versions_is_honoured() -> anyhow::Result<()> {
    let env = TestEnv::start().await?;
    mount_page(&env.shop, "/product/phone", &product_page("Phone", "450")).await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&env.telegram)
        .await;

    let url = env.shop_url("/product/phone");
    env.write_items(json!([{"name": "Phone", "url": url, "target_price": 500}]))?;
    std::fs::write(
        env.dir.path().join("state.json"),
        serde_json::to_string(&json!({
            url.clone(): {
                "name": "Phone",
                "url": url,
                "checked_at": 1700000000,
                "price": 440.0,
                "notified": true,
                "notified_at": 1700000000,
                "notified_price": 440.0,
                "error": null
            }
        }))?,
    )?;

    let totals = watcher::run(&env.config(), credentials()).await?;

    assert_eq!(totals.notified, 0);
    assert_eq!(env.state()?[&url]["price"], 450.0);

    Ok(())
}

#[tokio::test]
async fn test_malformed_entries_do_not_stop_the_run() -> anyhow::Result<()> {
    let env = TestEnv::start().await?;
    mount_page(&env.shop, "/product/phone", &product_page("Phone", "650")).await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&env.telegram)
        .await;

    let phone = env.shop_url("/product/phone");
    let kettle = env.shop_url("/product/kettle");
    env.write_items(json!([
        {"name": "Phone", "url": phone, "target_price": 500},
        {"name": "Typo", "target_price": 10},
        {"name": "Kettle", "url": kettle, "target_price": null}
    ]))?;

    let totals = watcher::run(&env.config(), credentials()).await?;
    assert_eq!(totals.checked, 3);
    assert_eq!(totals.prices_found, 1);
    assert_eq!(totals.errors, 2);

    let results = env.results()?;
    let rows = results.as_array().cloned().unwrap_or_default();
    assert_eq!(rows.len(), 3);
    for name in ["Typo", "Kettle"] {
        let row = rows.iter().find(|r| r["name"] == name).unwrap();
        assert!(row["error"].as_str().unwrap_or_default().starts_with("invalid item: "));
    }
    let kettle_row = rows.iter().find(|r| r["name"] == "Kettle").unwrap();
    assert_eq!(kettle_row["url"], kettle.as_str());

    let state = env.state()?;
    assert_eq!(state[&phone]["price"], 650.0);
    assert!(state.get(&kettle).is_none());
    assert_eq!(state.as_object().map(|o| o.len()), Some(1));

    Ok(())
}
