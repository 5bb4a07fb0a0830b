//! Live playlist stitching.
//!
//! [`DynamicPlaylist`] owns the playlist served to players and merges freshly
//! fetched upstream snapshots into it. Two kinds of merge exist:
//!
//! - **Continuity**: the same upstream was polled again. New segments after
//!   the last one already held are appended and the result is capped to a
//!   sliding window of [`LIVE_WINDOW`] entries.
//! - **Source switch**: the snapshot comes from a different upstream. The
//!   last [`SWITCH_TAIL`] playable segments are appended, optionally behind a
//!   discontinuity marker.
//!
//! Both advance the outward `EXT-X-MEDIA-SEQUENCE`. The type holds no lock;
//! callers serialize access to it.

use tracing::{debug, trace};

use crate::error::Result;
use crate::header::HeaderValue;
use crate::playlist::{Entry, Playlist, END_LIST_TAG, MEDIA_SEQUENCE};

/// Maximum number of entries kept after a continuity merge.
pub const LIVE_WINDOW: usize = 12;

/// Number of trailing entries taken from a snapshot on a source switch.
pub const SWITCH_TAIL: usize = 4;

/// The accumulated live playlist plus merge bookkeeping.
#[derive(Debug, Clone)]
pub struct DynamicPlaylist {
    playlist: Playlist,
    last_observed_sequence: i64,
    outward_sequence: i64,
    location_prefix: String,
    discontinuity_tags: bool,
}

impl DynamicPlaylist {
    /// Start a live playlist from an initial snapshot.
    ///
    /// The snapshot is copied; later changes to it are not observed. Until the
    /// first merge the rendered `EXT-X-MEDIA-SEQUENCE` is the snapshot's own,
    /// after which it becomes [`outward_sequence`](Self::outward_sequence) and
    /// may move backwards; players can treat that as a restart.
    pub fn new(
        source: &Playlist,
        location_prefix: impl Into<String>,
        discontinuity_tags: bool,
    ) -> Self {
        Self {
            playlist: source.clone(),
            last_observed_sequence: 0,
            outward_sequence: 1,
            location_prefix: location_prefix.into(),
            discontinuity_tags,
        }
    }

    /// Merge a snapshot into the live playlist.
    ///
    /// Returns `Ok(false)` when a continuity snapshot carries the same media
    /// sequence as the previous one; nothing changes in that case. A
    /// continuity snapshot without a numeric `EXT-X-MEDIA-SEQUENCE` fails and
    /// leaves the state untouched. Switch merges always succeed.
    pub fn update(&mut self, source: &Playlist, is_source_switch: bool) -> Result<bool> {
        if is_source_switch {
            self.stitch_switch(source);
            self.advance_sequence();
            return Ok(true);
        }

        let sequence = source.media_sequence()?;
        if sequence == self.last_observed_sequence {
            trace!(sequence, "Upstream playlist unchanged");
            return Ok(false);
        }

        self.stitch_continuation(source);
        self.advance_sequence();
        self.last_observed_sequence = sequence;
        Ok(true)
    }

    /// Render for delivery: locations carry the prefix and the terminator is
    /// omitted.
    ///
    /// Before the first merge the media sequence header is the upstream's,
    /// not the outward one.
    pub fn render(&self) -> String {
        let mut text = self
            .playlist
            .render_with(|location| format!("{}{}", self.location_prefix, location));
        let terminator = format!("{END_LIST_TAG}\n");
        if text.ends_with(&terminator) {
            text.truncate(text.len() - terminator.len());
        }
        text
    }

    pub fn header(&self, name: &str) -> Option<&HeaderValue> {
        self.playlist.header(name)
    }

    pub fn entries(&self) -> &[Entry] {
        self.playlist.entries()
    }

    /// The accumulated playlist.
    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    /// The `EXT-X-MEDIA-SEQUENCE` this playlist publishes.
    pub fn outward_sequence(&self) -> i64 {
        self.outward_sequence
    }

    /// Upstream media sequence recorded by the last continuity merge.
    pub fn last_observed_sequence(&self) -> i64 {
        self.last_observed_sequence
    }

    pub fn location_prefix(&self) -> &str {
        &self.location_prefix
    }

    pub fn discontinuity_tags(&self) -> bool {
        self.discontinuity_tags
    }

    fn advance_sequence(&mut self) {
        self.outward_sequence += 1;
        self.playlist.headers.insert(
            MEDIA_SEQUENCE.to_string(),
            HeaderValue::from(self.outward_sequence),
        );
    }

    /// Append the tail of a snapshot from a newly activated upstream.
    ///
    /// The tail starts [`SWITCH_TAIL`] entries from the end and reaches one
    /// entry further back for every discontinuity marker it collects.
    fn stitch_switch(&mut self, source: &Playlist) {
        let entries = source.entries();
        let mut start = entries.len().saturating_sub(SWITCH_TAIL);
        let mut index = entries.len();
        let mut tail = Vec::with_capacity(SWITCH_TAIL + 1);

        while index > start {
            index -= 1;
            let entry = &entries[index];
            tail.push(entry.clone());
            if entry.is_discontinuity() {
                start = start.saturating_sub(1);
            }
        }

        if self.discontinuity_tags {
            tail.push(Entry::discontinuity());
        }
        tail.reverse();

        debug!(
            appended = tail.len(),
            snapshot = entries.len(),
            "Stitched switched source"
        );
        self.playlist.entries.extend(tail);
    }

    /// Append the entries of a snapshot that follow the last entry already held.
    ///
    /// The overlap point is the last non-discontinuity snapshot entry whose
    /// location equals the location of the live playlist's last entry. With no
    /// overlap the whole snapshot is appended.
    fn stitch_continuation(&mut self, source: &Playlist) {
        let anchor = self.playlist.latest_entry().map(Entry::location);
        let entries = source.entries();

        let start = anchor
            .and_then(|location| {
                entries
                    .iter()
                    .rposition(|e| !e.is_discontinuity() && e.location() == location)
            })
            .map_or(0, |overlap| overlap + 1);

        if start == 0 && !entries.is_empty() {
            debug!("No overlap with upstream snapshot, appending all entries");
        }

        self.playlist.entries.extend_from_slice(&entries[start..]);

        let len = self.playlist.entries.len();
        if len > LIVE_WINDOW {
            self.playlist.entries.drain(..len - LIVE_WINDOW);
        }

        debug!(
            appended = entries.len() - start,
            window = self.playlist.entries.len(),
            "Stitched continuation"
        );
    }
}
