//! Direct stream resolution
//!
//! page → player iframe → stream URL in the frame's inline script. Depends
//! entirely on the remote markup, so every step may come back empty and the
//! caller simply skips the item.

use tracing::debug;
use url::Url;

use crate::client::{DizipalClient, FetchOutcome};
use crate::parser::{find_player_frame, find_stream_url};

/// Resolve a content page to its direct stream URL.
///
/// `referer` is sent with the frame request; players refuse to serve
/// without one. Returns `None` on any failure.
pub async fn resolve_stream(client: &DizipalClient, page_url: &str, referer: &str) -> Option<String> {
    let page = match client.fetch_outcome(page_url).await {
        FetchOutcome::Body(body) => body,
        FetchOutcome::Empty => return None,
        FetchOutcome::Failed(err) => {
            debug!(url = %page_url, error = %err, "content page failed");
            return None;
        }
    };

    let Some(frame_src) = find_player_frame(&page) else {
        debug!(url = %page_url, "no player frame");
        return None;
    };
    let frame_url = Url::parse(page_url).ok()?.join(&frame_src).ok()?;

    let frame = match client.fetch_with_referer(frame_url.as_str(), referer).await {
        Ok(body) => body,
        Err(err) => {
            debug!(url = %frame_url, error = %err, "player frame failed");
            return None;
        }
    };

    let stream = find_stream_url(&frame);
    if stream.is_none() {
        debug!(url = %frame_url, "no stream in player frame");
    }
    stream
}
