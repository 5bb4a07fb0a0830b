use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub upstream: UpstreamConfig,

    #[serde(default)]
    pub playlist: PlaylistConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Where upstream stream playlists are fetched from.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    /// Base URL; a stream named `N` is fetched from `{playlist_base_url}{N}.m3u8`
    #[serde(default = "default_playlist_base_url")]
    pub playlist_base_url: String,

    /// Timeout for a single playlist fetch
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,
}

fn default_playlist_base_url() -> String {
    "http://localhost:8080/hls/".to_string()
}
fn default_fetch_timeout() -> u64 {
    5
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            playlist_base_url: default_playlist_base_url(),
            fetch_timeout_secs: default_fetch_timeout(),
        }
    }
}

/// Settings for the stitched outward playlist.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaylistConfig {
    /// Prefix prepended to every segment location on render
    #[serde(default = "default_segment_prefix")]
    pub segment_prefix: String,

    /// Mark source switches with `#EXT-X-DISCONTINUITY`
    #[serde(default = "default_true")]
    pub discontinuity_tags: bool,

    /// Target duration used when the upstream omits `EXT-X-TARGETDURATION`
    #[serde(default = "default_target_duration")]
    pub default_target_duration_secs: f64,
}

fn default_segment_prefix() -> String {
    "hls/".to_string()
}
fn default_true() -> bool {
    true
}
fn default_target_duration() -> f64 {
    2.0
}

impl Default for PlaylistConfig {
    fn default() -> Self {
        Self {
            segment_prefix: default_segment_prefix(),
            discontinuity_tags: default_true(),
            default_target_duration_secs: default_target_duration(),
        }
    }
}
