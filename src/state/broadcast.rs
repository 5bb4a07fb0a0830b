use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use switchcast_common::{Error, Result, StreamName};
use switchcast_playlist::{DynamicPlaylist, Playlist, END_LIST_TAG, TARGET_DURATION};
use tokio::sync::Mutex;
use tokio::time::Instant;

use super::StreamRegistry;
use crate::config::Config;
use crate::source::{load_playlist, playlist_url, PlaylistSource};

/// Snapshot of the broadcast for the status endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct BroadcastStatus {
    pub current: Option<StreamName>,
    pub streaming: bool,
    pub outward_sequence: Option<i64>,
    pub entries: usize,
    pub target_duration_secs: f64,
    pub sources: Vec<StreamName>,
}

struct Inner {
    registry: StreamRegistry,
    live: Option<DynamicPlaylist>,
    current: Option<StreamName>,
    streaming: bool,
    target_duration: Duration,
    time_to_wait: Duration,
    last_update: Instant,
}

/// The outward broadcast: which upstream is live and the stitched playlist.
pub struct Broadcast {
    inner: Mutex<Inner>,
    source: Arc<dyn PlaylistSource>,
    base_url: String,
    segment_prefix: String,
    discontinuity_tags: bool,
    default_target_duration: Duration,
}

impl Broadcast {
    pub fn new(config: &Config, source: Arc<dyn PlaylistSource>) -> Self {
        let default_target_duration =
            Duration::try_from_secs_f64(config.playlist.default_target_duration_secs)
                .unwrap_or(Duration::from_secs(2));

        Self {
            inner: Mutex::new(Inner {
                registry: StreamRegistry::new(),
                live: None,
                current: None,
                streaming: false,
                target_duration: default_target_duration,
                time_to_wait: default_target_duration,
                last_update: Instant::now(),
            }),
            source,
            base_url: config.upstream.playlist_base_url.clone(),
            segment_prefix: config.playlist.segment_prefix.clone(),
            discontinuity_tags: config.playlist.discontinuity_tags,
            default_target_duration,
        }
    }

    /// Render the outward playlist, refreshing from the current source first
    /// when the wait interval has elapsed.
    pub async fn serve_playlist(&self) -> Result<String> {
        let mut inner = self.inner.lock().await;

        if inner.live.is_none() {
            return Ok(Playlist::empty().render());
        }

        if inner.streaming && inner.last_update.elapsed() >= inner.time_to_wait {
            self.refresh(&mut inner).await?;
        }

        let mut text = match inner.live.as_ref() {
            Some(live) => live.render(),
            None => return Ok(Playlist::empty().render()),
        };
        if !inner.streaming {
            text.push_str(END_LIST_TAG);
            text.push('\n');
        }
        Ok(text)
    }

    /// Put `name` on air.
    ///
    /// Starts a fresh outward playlist when nothing is streaming, otherwise
    /// splices the new source onto the live one.
    pub async fn transition(&self, name: &StreamName) -> Result<()> {
        let mut inner = self.inner.lock().await;

        if !inner.registry.contains(name) {
            return Err(Error::not_found("source", name));
        }

        let url = playlist_url(&self.base_url, name);
        let snapshot = load_playlist(self.source.as_ref(), &url).await?;

        let streaming = inner.streaming;
        match inner.live.as_mut() {
            Some(live) if streaming => {
                live.update(&snapshot, true).map_err(Error::playlist)?;
                tracing::info!(source = %name, "Switched live source");
            }
            _ => {
                let target_duration = self.target_duration_of(&snapshot)?;
                inner.live = Some(DynamicPlaylist::new(
                    &snapshot,
                    self.segment_prefix.clone(),
                    self.discontinuity_tags,
                ));
                inner.target_duration = target_duration;
                inner.streaming = true;
                tracing::info!(
                    source = %name,
                    target_duration_secs = target_duration.as_secs_f64(),
                    "Started broadcast"
                );
            }
        }

        inner.current = Some(name.clone());
        inner.last_update = Instant::now();
        inner.time_to_wait = inner.target_duration;
        Ok(())
    }

    /// Record that `name` started publishing upstream.
    pub async fn stream_begin(&self, name: StreamName) {
        let mut inner = self.inner.lock().await;
        if inner.registry.publish(name.clone()) {
            tracing::info!(source = %name, "Stream published");
        } else {
            tracing::debug!(source = %name, "Stream already published");
        }
    }

    /// Record that `name` stopped publishing.
    ///
    /// If it was on air, the longest-publishing remaining stream takes over;
    /// with no streams left the outward stream ends.
    pub async fn stream_end(&self, name: &StreamName) {
        let mut inner = self.inner.lock().await;

        if !inner.registry.unpublish(name) {
            tracing::debug!(source = %name, "Unpublish for unknown stream ignored");
            return;
        }
        tracing::info!(source = %name, "Stream unpublished");

        if inner.registry.is_empty() {
            if inner.streaming {
                tracing::info!("No streams left, ending broadcast");
            }
            inner.streaming = false;
            inner.current = None;
            return;
        }

        if inner.current.as_ref() != Some(name) {
            return;
        }

        let Some(next) = inner.registry.first().cloned() else {
            return;
        };
        inner.current = Some(next.clone());

        if !inner.streaming {
            return;
        }

        let url = playlist_url(&self.base_url, &next);
        let merged = match load_playlist(self.source.as_ref(), &url).await {
            Ok(snapshot) => match inner.live.as_mut() {
                Some(live) => live.update(&snapshot, true).map_err(Error::playlist),
                None => Ok(false),
            },
            Err(e) => Err(e),
        };

        match merged {
            Ok(_) => {
                tracing::info!(from = %name, to = %next, "Switched to remaining stream");
            }
            Err(e) => {
                tracing::warn!(to = %next, error = %e, "Failed to switch to remaining stream");
            }
        }

        inner.last_update = Instant::now();
        inner.time_to_wait = inner.target_duration;
    }

    /// Names of the currently publishing streams.
    pub async fn sources(&self) -> Vec<StreamName> {
        self.inner.lock().await.registry.names().to_vec()
    }

    pub async fn status(&self) -> BroadcastStatus {
        let inner = self.inner.lock().await;
        BroadcastStatus {
            current: inner.current.clone(),
            streaming: inner.streaming,
            outward_sequence: inner.live.as_ref().map(DynamicPlaylist::outward_sequence),
            entries: inner.live.as_ref().map_or(0, |live| live.entries().len()),
            target_duration_secs: inner.target_duration.as_secs_f64(),
            sources: inner.registry.names().to_vec(),
        }
    }

    async fn refresh(&self, inner: &mut Inner) -> Result<()> {
        let Some(current) = inner.current.clone() else {
            return Ok(());
        };

        let url = playlist_url(&self.base_url, &current);
        let snapshot = load_playlist(self.source.as_ref(), &url).await?;

        let updated = match inner.live.as_mut() {
            Some(live) => live.update(&snapshot, false).map_err(Error::playlist)?,
            None => false,
        };

        inner.last_update = Instant::now();
        inner.time_to_wait = if updated {
            inner.target_duration
        } else {
            inner.target_duration / 2
        };
        tracing::trace!(
            source = %current,
            updated,
            wait_ms = inner.time_to_wait.as_millis() as u64,
            "Refreshed live playlist"
        );
        Ok(())
    }

    fn target_duration_of(&self, snapshot: &Playlist) -> Result<Duration> {
        let Some(value) = snapshot.header(TARGET_DURATION) else {
            return Ok(self.default_target_duration);
        };

        let secs = value
            .as_float()
            .map_err(|e| Error::playlist(format!("{}: {}", TARGET_DURATION, e)))?;
        Duration::try_from_secs_f64(secs)
            .ok()
            .filter(|d| !d.is_zero())
            .ok_or_else(|| Error::playlist(format!("{}: {} is not a valid duration", TARGET_DURATION, value)))
    }
}
