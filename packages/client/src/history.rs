//! Room history over HTTP.

use agora_server::infrastructure::dto::MessageDto;

use crate::{error::ClientError, url::history_url};

/// Fetch the history of `room`; any failure is logged and yields an empty list
pub async fn fetch_history(http: &reqwest::Client, server: &str, room: &str) -> Vec<MessageDto> {
    match try_fetch_history(http, server, room).await {
        Ok(messages) => messages,
        Err(e) => {
            tracing::warn!("Could not load history of '{}': {}", room, e);
            Vec::new()
        }
    }
}

/// Fetch the history of `room`, returning the first failure
pub async fn try_fetch_history(
    http: &reqwest::Client,
    server: &str,
    room: &str,
) -> Result<Vec<MessageDto>, ClientError> {
    let url = history_url(server, room)?;
    let messages = http
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .json::<Vec<MessageDto>>()
        .await?;
    Ok(messages)
}
