//! Endpoint URLs derived from the server base URL.

use reqwest::Url;

use crate::error::ClientError;

/// `http(s)://host` → `ws(s)://host/ws`
pub fn websocket_url(server: &str) -> Result<Url, ClientError> {
    let mut url = parse(server)?;
    let scheme = match url.scheme() {
        "http" | "ws" => "ws",
        "https" | "wss" => "wss",
        _ => return Err(ClientError::InvalidUrl(server.to_string())),
    };
    url.set_scheme(scheme)
        .map_err(|_| ClientError::InvalidUrl(server.to_string()))?;
    push_segments(&mut url, server, &["ws"])?;
    Ok(url)
}

/// `GET /messages/{room}`, with the room id percent-encoded
pub fn history_url(server: &str, room: &str) -> Result<Url, ClientError> {
    let mut url = parse(server)?;
    push_segments(&mut url, server, &["messages", room])?;
    Ok(url)
}

fn parse(server: &str) -> Result<Url, ClientError> {
    Url::parse(server).map_err(|_| ClientError::InvalidUrl(server.to_string()))
}

fn push_segments(url: &mut Url, server: &str, segments: &[&str]) -> Result<(), ClientError> {
    url.path_segments_mut()
        .map_err(|_| ClientError::InvalidUrl(server.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(())
}
