//! Comic metadata fetcher
//!
//! One HTTP GET against the xkcd JSON endpoint per call. The id string is
//! substituted into the URL verbatim (no numeric validation — a bad id gets
//! whatever the server answers, typically a 404). No retry, no deduplication:
//! overlapping calls are simply independent requests.

use egui::Context;
use serde::{Deserialize, Serialize};
use std::sync::mpsc::Sender;
use thiserror::Error;

/// Metadata for a single comic.
///
/// Serde renames keep the serialized keys (`title`/`alt`/`img`) identical on
/// the wire and in the saved file. Unknown fields in the server response are
/// ignored; a missing field is a parse error, so a partial record can never
/// be constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComicRecord {
    pub title: String,
    #[serde(rename = "alt")]
    pub caption: String,
    #[serde(rename = "img")]
    pub image_url: String,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("bad comic data: {0}")]
    BadData(#[from] serde_json::Error),
}

/// Build the metadata URL for a comic id.
pub fn comic_url(id: &str) -> String {
    format!("https://xkcd.com/{}/info.0.json", id)
}

/// Parse a response body into a record. Pure, so the wire-format edge cases
/// are testable without a server.
pub fn parse_comic(json: &str) -> Result<ComicRecord, serde_json::Error> {
    serde_json::from_str(json)
}

/// Fetch and parse one comic. Blocking; callers run this off the UI thread.
pub fn fetch_comic(
    client: &reqwest::blocking::Client,
    id: &str,
) -> Result<ComicRecord, FetchError> {
    let response = client.get(comic_url(id)).send()?.error_for_status()?;
    let body = response.text()?;
    Ok(parse_comic(&body)?)
}

/// Run a fetch on a worker thread, delivering the result over `tx`.
///
/// The error is stringified so the channel payload stays `Send` and the
/// controller only ever sees the human-readable message. A repaint is
/// requested after sending so the completion is picked up without waiting
/// for the next input event.
pub fn spawn_fetch(id: String, tx: Sender<Result<ComicRecord, String>>, ctx: Context) {
    std::thread::spawn(move || {
        let client = reqwest::blocking::Client::new();
        let result = fetch_comic(&client, &id).map_err(|e| e.to_string());
        if let Err(ref msg) = result {
            log::warn!("fetch for comic {} failed: {}", id, msg);
        }
        let _ = tx.send(result);
        ctx.request_repaint();
    });
}
