//! Playlist model and M3U8 serialization.

use std::collections::HashMap;
use std::fmt::{self, Write};
use std::io::BufRead;
use std::str::FromStr;

use crate::error::{PlaylistError, Result};
use crate::header::HeaderValue;
use crate::parser;

/// First line of every playlist.
pub const FORMAT_MARKER: &str = "#EXTM3U";
/// End-of-stream terminator.
pub const END_LIST_TAG: &str = "#EXT-X-ENDLIST";
/// Discontinuity marker.
pub const DISCONTINUITY_TAG: &str = "#EXT-X-DISCONTINUITY";
/// Segment duration tag prefix.
pub const SEGMENT_TAG: &str = "#EXTINF:";
/// Name of the media sequence tag (without the leading `#`).
pub const MEDIA_SEQUENCE: &str = "EXT-X-MEDIA-SEQUENCE";
/// Name of the target duration tag (without the leading `#`).
pub const TARGET_DURATION: &str = "EXT-X-TARGETDURATION";

/// One playlist element: a media segment or a discontinuity marker.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    duration: f32,
    location: String,
    discontinuity: bool,
}

impl Entry {
    /// A media segment of `duration` seconds at `location`.
    pub fn segment(duration: f32, location: impl Into<String>) -> Self {
        Self {
            duration,
            location: location.into(),
            discontinuity: false,
        }
    }

    /// A discontinuity marker.
    pub fn discontinuity() -> Self {
        Self {
            duration: 0.0,
            location: String::new(),
            discontinuity: true,
        }
    }

    /// Segment duration in seconds (zero for a discontinuity).
    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Segment location (empty for a discontinuity).
    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn is_discontinuity(&self) -> bool {
        self.discontinuity
    }

    /// Render this entry, passing the location through `rewrite`.
    ///
    /// A segment spans two lines; no trailing newline is written.
    pub fn render_with<F>(&self, rewrite: F) -> String
    where
        F: Fn(&str) -> String,
    {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_to(&mut out, &rewrite);
        out
    }

    fn write_to<W, F>(&self, out: &mut W, rewrite: &F) -> fmt::Result
    where
        W: Write,
        F: Fn(&str) -> String,
    {
        if self.discontinuity {
            return out.write_str(DISCONTINUITY_TAG);
        }
        write!(
            out,
            "{}{:.3},\n{}",
            SEGMENT_TAG,
            self.duration,
            rewrite(&self.location)
        )
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_to(f, &|location: &str| location.to_string())
    }
}

/// A parsed playlist: unordered header tags plus ordered entries.
///
/// Header iteration order is unspecified, so rendered text may list tags in
/// any order. Compare playlists structurally rather than textually.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Playlist {
    pub(crate) headers: HashMap<String, HeaderValue>,
    pub(crate) entries: Vec<Entry>,
}

impl Playlist {
    /// A playlist with no headers and no entries.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse M3U8 text.
    pub fn parse(text: &str) -> Result<Self> {
        parser::parse_playlist(text)
    }

    /// Parse M3U8 text from a reader.
    pub fn parse_reader<R: BufRead>(reader: R) -> Result<Self> {
        parser::parse_reader(reader)
    }

    /// Look up a header tag by name (without the leading `#`).
    pub fn header(&self, name: &str) -> Option<&HeaderValue> {
        self.headers.get(name)
    }

    /// Look up a header tag, failing with [`PlaylistError::MissingTag`] when absent.
    pub fn require_header(&self, name: &str) -> Result<&HeaderValue> {
        self.header(name)
            .ok_or_else(|| PlaylistError::MissingTag(name.to_string()))
    }

    pub fn headers(&self) -> &HashMap<String, HeaderValue> {
        &self.headers
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// The last entry, if any.
    pub fn latest_entry(&self) -> Option<&Entry> {
        self.entries.last()
    }

    /// Read the media sequence tag as an integer.
    pub fn media_sequence(&self) -> Result<i64> {
        self.require_header(MEDIA_SEQUENCE)?
            .as_int()
            .map_err(|e| PlaylistError::header(MEDIA_SEQUENCE, e))
    }

    /// Render to M3U8 text, terminator included.
    pub fn render(&self) -> String {
        self.render_with(|location| location.to_string())
    }

    /// Render to M3U8 text, passing every segment location through `rewrite`.
    pub fn render_with<F>(&self, rewrite: F) -> String
    where
        F: Fn(&str) -> String,
    {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_to(&mut out, &rewrite);
        out
    }

    fn write_to<W, F>(&self, out: &mut W, rewrite: &F) -> fmt::Result
    where
        W: Write,
        F: Fn(&str) -> String,
    {
        writeln!(out, "{FORMAT_MARKER}")?;

        for (name, value) in &self.headers {
            if value.as_str().is_empty() {
                writeln!(out, "#{name}")?;
            } else {
                writeln!(out, "#{name}:{value}")?;
            }
        }

        for entry in &self.entries {
            entry.write_to(out, rewrite)?;
            out.write_char('\n')?;
        }

        writeln!(out, "{END_LIST_TAG}")
    }
}

impl fmt::Display for Playlist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_to(f, &|location: &str| location.to_string())
    }
}

impl FromStr for Playlist {
    type Err = PlaylistError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
