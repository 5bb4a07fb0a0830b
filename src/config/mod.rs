mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./switchcast.toml",
        "./config.toml",
        "~/.config/switchcast/config.toml",
        "/etc/switchcast/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.server.port == 0 {
        anyhow::bail!("Server port cannot be 0");
    }

    let base = &config.upstream.playlist_base_url;
    url::Url::parse(base)
        .with_context(|| format!("Invalid upstream playlist_base_url: {}", base))?;
    if !base.ends_with('/') {
        tracing::warn!(
            "Upstream playlist_base_url does not end with '/': {} (stream URLs are built by appending)",
            base
        );
    }

    if config.upstream.fetch_timeout_secs == 0 {
        anyhow::bail!("Upstream fetch_timeout_secs cannot be 0");
    }

    let target = config.playlist.default_target_duration_secs;
    if !target.is_finite() || target <= 0.0 {
        anyhow::bail!("Playlist default_target_duration_secs must be positive, got {}", target);
    }

    Ok(())
}
