//! Switchcast-Playlist: M3U8 playlists and live source stitching.
//!
//! # Modules
//!
//! - `header` - typed accessors over raw tag values
//! - `playlist` - the [`Playlist`] / [`Entry`] model and serialization
//! - `parser` - M3U8 text to [`Playlist`]
//! - `dynamic` - [`DynamicPlaylist`], the live window that upstream snapshots
//!   are merged into
//!
//! # Example
//!
//! ```
//! use switchcast_playlist::{DynamicPlaylist, Playlist};
//!
//! let first = Playlist::parse("#EXTM3U\n#EXT-X-MEDIA-SEQUENCE:1\n#EXTINF:2.0,\na.ts\n")?;
//! let mut live = DynamicPlaylist::new(&first, "hls/", true);
//!
//! let next = Playlist::parse(
//!     "#EXTM3U\n#EXT-X-MEDIA-SEQUENCE:2\n#EXTINF:2.0,\na.ts\n#EXTINF:2.0,\nb.ts\n",
//! )?;
//! assert!(live.update(&next, false)?);
//! assert_eq!(live.entries().len(), 2);
//! assert!(live.render().ends_with("hls/b.ts\n"));
//! # Ok::<(), switchcast_playlist::PlaylistError>(())
//! ```

pub mod dynamic;
pub mod error;
pub mod header;
pub mod parser;
pub mod playlist;

pub use dynamic::{DynamicPlaylist, LIVE_WINDOW, SWITCH_TAIL};
pub use error::{HeaderError, PlaylistError, Result};
pub use header::HeaderValue;
pub use parser::{parse_playlist, parse_reader};
pub use playlist::{Entry, Playlist, END_LIST_TAG, MEDIA_SEQUENCE, TARGET_DURATION};
