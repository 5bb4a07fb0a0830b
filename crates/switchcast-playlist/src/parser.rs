//! Line-oriented M3U8 parser.
//!
//! Each line after the `#EXTM3U` marker is one of:
//! - the `#EXT-X-ENDLIST` terminator, which stops parsing,
//! - a `#EXT-X-DISCONTINUITY` marker,
//! - a segment duration tag (`#EXTINF:<float>,`), whose location is the next line,
//! - any other `#NAME:VALUE` tag, stored as a header.
//!
//! Parsing is all-or-nothing: the first malformed line fails the whole call.

use std::io::{self, BufRead};

use crate::error::{PlaylistError, Result};
use crate::header::HeaderValue;
use crate::playlist::{
    Entry, Playlist, DISCONTINUITY_TAG, END_LIST_TAG, FORMAT_MARKER, SEGMENT_TAG,
};

/// Parse playlist text.
pub fn parse_playlist(text: &str) -> Result<Playlist> {
    parse_lines(text.lines().map(|line| Ok(line.to_string())))
}

/// Parse playlist text from a buffered reader.
pub fn parse_reader<R: BufRead>(reader: R) -> Result<Playlist> {
    parse_lines(reader.lines())
}

fn parse_lines<I>(lines: I) -> Result<Playlist>
where
    I: Iterator<Item = io::Result<String>>,
{
    let mut lines = lines.enumerate().map(|(i, line)| line.map(|l| (i + 1, l)));

    let (_, first) = lines.next().ok_or(PlaylistError::MissingHeader)??;
    if !first.trim_start_matches('\u{feff}').starts_with(FORMAT_MARKER) {
        return Err(PlaylistError::NotAPlaylist);
    }

    let mut playlist = Playlist::empty();

    while let Some(next) = lines.next() {
        let (number, raw) = next?;
        let line = raw.trim();

        if line.is_empty() {
            continue;
        }
        if line == END_LIST_TAG {
            break;
        }
        if line == DISCONTINUITY_TAG {
            playlist.entries.push(Entry::discontinuity());
            continue;
        }

        if line.ends_with(',') || line.starts_with(SEGMENT_TAG) {
            let duration = parse_duration(number, line)?;
            let location = next_location(number, &mut lines)?;
            playlist.entries.push(Entry::segment(duration, location));
            continue;
        }

        let (name, value) = parse_tag(number, line)?;
        playlist.headers.insert(name, value);
    }

    tracing::trace!(
        headers = playlist.headers.len(),
        entries = playlist.entries.len(),
        "Parsed playlist"
    );

    Ok(playlist)
}

/// Parse the duration of a `#EXTINF:<float>,[title]` line. Titles are dropped.
fn parse_duration(number: usize, line: &str) -> Result<f32> {
    let Some((_, rest)) = line.split_once(':') else {
        return Err(PlaylistError::MalformedTag {
            line: number,
            text: line.to_string(),
        });
    };
    let value = rest.split_once(',').map_or(rest, |(duration, _)| duration);

    match value.trim().parse::<f32>() {
        Ok(duration) if duration.is_finite() && duration >= 0.0 => Ok(duration),
        _ => Err(PlaylistError::InvalidDuration {
            line: number,
            value: value.to_string(),
        }),
    }
}

/// Consume the line after a segment tag and return it trimmed as the
/// segment's location. A missing, blank or tag line truncates the segment.
fn next_location<I>(number: usize, lines: &mut I) -> Result<String>
where
    I: Iterator<Item = io::Result<(usize, String)>>,
{
    let truncated = || PlaylistError::TruncatedSegment { line: number };

    let (_, raw) = lines.next().ok_or_else(truncated)??;
    let location = raw.trim();
    if location.is_empty() || location.starts_with('#') {
        return Err(truncated());
    }
    Ok(location.to_string())
}

/// Split `#NAME:VALUE` into its name and value. A tag without `:` has an
/// empty value.
fn parse_tag(number: usize, line: &str) -> Result<(String, HeaderValue)> {
    let Some(tag) = line.strip_prefix('#') else {
        return Err(PlaylistError::MalformedTag {
            line: number,
            text: line.to_string(),
        });
    };

    let (name, value) = tag.split_once(':').unwrap_or((tag, ""));
    if name.is_empty() {
        return Err(PlaylistError::MalformedTag {
            line: number,
            text: line.to_string(),
        });
    }

    Ok((name.to_string(), HeaderValue::from(value)))
}
