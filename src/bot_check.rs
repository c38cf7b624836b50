use std::io::Write;

use crate::credentials::{resolve, CredentialSource, CHAT_ID_ENV, TOKEN_ENV};
use crate::plugins::notifiers::{ApiResponse, TelegramClient};
use crate::AppError;

pub const TEST_MESSAGE: &str = "Тестове повідомлення від price-watcher check-bot";

/// Exercise a bot token against the Bot API and report each raw response to
/// `out`: `getMe`, `getUpdates`, then a test message when a chat id is known.
pub async fn check_bot<W: Write>(
    api: &TelegramClient,
    token_arg: Option<String>,
    chat_id_arg: Option<String>,
    out: &mut W,
) -> crate::Result<()> {
    let token = resolve(&[
        CredentialSource::Argument(token_arg),
        CredentialSource::Environment(TOKEN_ENV),
    ])
    .ok_or_else(|| {
        AppError::Validation(format!(
            "no bot token: pass it as an argument or set {}. Example: {}=<TOKEN> price-watcher check-bot",
            TOKEN_ENV, TOKEN_ENV
        ))
    })?;
    tracing::debug!("Using bot token from {}", token.source);

    report(out, "getMe", &api.get_me(&token.value).await)?;
    writeln!(out)?;
    report(out, "getUpdates", &api.get_updates(&token.value).await)?;

    let chat_id = resolve(&[
        CredentialSource::Argument(chat_id_arg),
        CredentialSource::Environment(CHAT_ID_ENV),
    ]);

    writeln!(out)?;
    match chat_id {
        Some(chat_id) => {
            tracing::debug!("Using chat id from {}", chat_id.source);
            let response = api.send_message(&token.value, &chat_id.value, TEST_MESSAGE).await;
            report(out, "sendMessage", &response)?;
        }
        None => {
            writeln!(
                out,
                "No chat id given. To send a test message run: price-watcher check-bot <TOKEN> <CHAT_ID>"
            )?;
            writeln!(out, "Or set {} and run without the second argument.", CHAT_ID_ENV)?;
        }
    }

    Ok(())
}

fn report<W: Write>(out: &mut W, method: &str, response: &ApiResponse) -> std::io::Result<()> {
    writeln!(out, "{}: {}", method, response.status_label())?;
    if response.status.is_some() {
        writeln!(out, "{}", response.body)
    } else {
        writeln!(out, "Exception: {}", response.body)
    }
}
