//! Upstream playlist sources.
//!
//! The broadcast never talks to the network directly: it asks a
//! [`PlaylistSource`] for the bytes behind a playlist URL. Production uses
//! [`HttpPlaylistSource`]; tests plug in their own implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use switchcast_common::{Error, Result, StreamName};
use switchcast_playlist::Playlist;

use crate::config::UpstreamConfig;

/// Fetches the raw text of an upstream playlist.
#[async_trait]
pub trait PlaylistSource: Send + Sync {
    /// Return the body found at `url`, or an [`Error::Upstream`] describing the failure.
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// [`PlaylistSource`] backed by a `reqwest` client.
pub struct HttpPlaylistSource {
    client: Client,
}

impl HttpPlaylistSource {
    pub fn new(timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build HTTP client with timeout: {}", e);
                Client::new()
            });

        Self { client }
    }

    pub fn from_config(config: &UpstreamConfig) -> Self {
        Self::new(Duration::from_secs(config.fetch_timeout_secs))
    }
}

#[async_trait]
impl PlaylistSource for HttpPlaylistSource {
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::upstream(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::upstream(url, format!("HTTP {}", status)));
        }

        response.text().await.map_err(|e| Error::upstream(url, e))
    }
}

/// URL of the playlist published under `name`.
pub fn playlist_url(base: &str, name: &StreamName) -> String {
    format!("{}{}.m3u8", base, name)
}

/// Fetch `url` from `source` and parse it.
pub async fn load_playlist(source: &dyn PlaylistSource, url: &str) -> Result<Playlist> {
    let text = source.fetch(url).await?;
    let playlist = Playlist::parse(&text).map_err(|e| {
        tracing::warn!(url = %url, error = %e, "Upstream playlist is malformed");
        Error::playlist(e)
    })?;
    tracing::trace!(url = %url, entries = playlist.entries().len(), "Loaded upstream playlist");
    Ok(playlist)
}
