//! Segment Router server.
//!
//! Serves the routes of a TOML configuration file, answering each with a
//! static body or a JSON echo of the matched parameters.
//!
//! ```text
//! segment-router --config routes.toml --watch
//! segment-router --config routes.toml --print-routes
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use segment_router::config::{load_config, watcher::ConfigWatcher, ServerConfig};
use segment_router::lifecycle::{signals, Shutdown};
use segment_router::observability::{logging, metrics};
use segment_router::HttpServer;

#[derive(Parser)]
#[command(name = "segment-router")]
#[command(about = "HTTP server dispatching through a segment route tree", long_about = None)]
struct Cli {
    /// TOML configuration file (defaults apply when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address
    #[arg(short, long)]
    bind: Option<String>,

    /// Reload routes when the configuration file changes
    #[arg(short, long, requires = "config")]
    watch: bool,

    /// Print the route trees and exit
    #[arg(long)]
    print_routes: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    let server = HttpServer::new(config.clone())?;
    if cli.print_routes {
        print!("{}", server.routes());
        return Ok(());
    }

    logging::init_logging(&config.observability)?;
    tracing::info!("segment-router v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        routes = config.routes.len(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    // Keep the watcher alive for the whole run.
    let (_watcher, config_updates) = match (&cli.config, cli.watch) {
        (Some(path), true) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (Some(watcher.run()?), updates)
        }
        _ => {
            let (_, updates) = mpsc::unbounded_channel();
            (None, updates)
        }
    };

    let shutdown = Shutdown::new();
    let listener_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        signals::shutdown_signal().await;
        shutdown.trigger();
    });

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    server.run(listener, config_updates, listener_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
