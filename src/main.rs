mod cli;

use switchcast::{config, server};
use switchcast_playlist::Playlist;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::io::BufReader;
use std::path::Path;

async fn start_server(
    host: Option<String>,
    port: Option<u16>,
    config_path: Option<&Path>,
) -> Result<()> {
    let mut config = config::load_config_or_default(config_path)?;

    // Override host/port from CLI if specified
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    config::validate_config(&config)?;

    tracing::info!("Starting Switchcast server");
    tracing::info!(
        "Server will listen on {}:{}",
        config.server.host,
        config.server.port
    );

    server::start_server(config).await
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "switchcast=trace,switchcast_playlist=trace,switchcast_common=debug,tower_http=debug"
                .to_string()
        } else {
            "switchcast=info,switchcast_playlist=info,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    match cli.command {
        Commands::Start { host, port } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_server(host, port, cli.config.as_deref()))
        }
        Commands::Inspect { file } => inspect_playlist(&file),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("switchcast {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn inspect_playlist(path: &Path) -> Result<()> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open playlist: {:?}", path))?;
    let playlist = Playlist::parse_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse playlist: {:?}", path))?;

    println!("Playlist: {}", path.display());

    let mut headers: Vec<_> = playlist.headers().iter().collect();
    headers.sort_by(|a, b| a.0.cmp(b.0));
    println!("\nHeaders ({}):", headers.len());
    for (name, value) in headers {
        if value.as_str().is_empty() {
            println!("  {}", name);
        } else {
            println!("  {} = {}", name, value);
        }
    }

    let entries = playlist.entries();
    let segments = entries.iter().filter(|e| !e.is_discontinuity()).count();
    let total: f64 = entries.iter().map(|e| f64::from(e.duration())).sum();
    println!(
        "\nEntries ({} segments, {} discontinuities, {:.3}s):",
        segments,
        entries.len() - segments,
        total
    );
    for entry in entries {
        if entry.is_discontinuity() {
            println!("  -- discontinuity --");
        } else {
            println!("  {:>8.3}s  {}", entry.duration(), entry.location());
        }
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            config::load_config(p)?
        }
        None => {
            println!("No config file specified, checking default locations");
            config::load_config_or_default(None)?
        }
    };

    println!("✓ Configuration is valid");
    println!("  Server: {}:{}", config.server.host, config.server.port);
    println!("  Upstream: {}", config.upstream.playlist_base_url);
    println!("  Fetch timeout: {}s", config.upstream.fetch_timeout_secs);
    println!("  Segment prefix: {}", config.playlist.segment_prefix);
    println!(
        "  Discontinuity tags: {}",
        config.playlist.discontinuity_tags
    );

    Ok(())
}
