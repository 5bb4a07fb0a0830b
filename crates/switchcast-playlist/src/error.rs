//! Error types for switchcast-playlist.

use std::io;
use std::num::{ParseFloatError, ParseIntError};
use thiserror::Error;

/// Result type for playlist operations.
pub type Result<T> = std::result::Result<T, PlaylistError>;

/// Error raised when a typed accessor is applied to a tag value that does not
/// match the requested sub-grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderError {
    /// The value is not a floating point number.
    #[error("'{value}' is not a number: {source}")]
    NotAFloat {
        value: String,
        source: ParseFloatError,
    },

    /// The value is not an integer.
    #[error("'{value}' is not an integer: {source}")]
    NotAnInteger {
        value: String,
        source: ParseIntError,
    },

    /// The value lacks the separator the accessor splits on.
    #[error("'{value}' has no '{separator}' separator")]
    MissingSeparator { value: String, separator: char },
}

/// Error type for parsing and stitching playlists.
#[derive(Debug, Error)]
pub enum PlaylistError {
    /// The input was empty.
    #[error("missing header: playlist is empty")]
    MissingHeader,

    /// The first line is not the `#EXTM3U` marker.
    #[error("not a playlist: first line is not #EXTM3U")]
    NotAPlaylist,

    /// A `#EXTINF` duration is not numeric.
    #[error("malformed playlist: invalid segment duration '{value}' on line {line}")]
    InvalidDuration { line: usize, value: String },

    /// A `#EXTINF` line is the last line of the input.
    #[error("malformed playlist: segment on line {line} has no location")]
    TruncatedSegment { line: usize },

    /// A tag line is not of the form `#NAME:VALUE`.
    #[error("malformed playlist: cannot parse tag '{text}' on line {line}")]
    MalformedTag { line: usize, text: String },

    /// A tag required by the caller is absent.
    #[error("tag {0} is missing")]
    MissingTag(String),

    /// A tag is present but its value has the wrong shape.
    #[error("tag {name}: {source}")]
    Header {
        name: String,
        #[source]
        source: HeaderError,
    },

    /// Reading the playlist text failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl PlaylistError {
    /// Wrap a header accessor failure with the name of the tag it came from.
    pub fn header(name: impl Into<String>, source: HeaderError) -> Self {
        Self::Header {
            name: name.into(),
            source,
        }
    }
}
