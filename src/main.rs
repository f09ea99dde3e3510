//! Priority Expiry Cache - command driver
//!
//! Reads commands from stdin, one per line, and applies them to a single
//! shared cache. See the `command` module for the syntax.

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use priority_expiry_cache::command::Command;
use priority_expiry_cache::{spawn_expiry_sweep, Config, SharedCache};

/// Main entry point for the command driver.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the shared cache
/// 4. Start the expiry sweep if configured
/// 5. Execute stdin commands until EOF or Ctrl+C
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var.
    // Logs go to stderr so replies on stdout stay machine-readable.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "priority_expiry_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env();
    info!(
        "Configuration loaded: max_items={}, sweep_interval={}s",
        config.max_items, config.sweep_interval
    );

    let cache = SharedCache::<String>::from_config(&config);

    let sweep_handle = config
        .sweep_enabled()
        .then(|| spawn_expiry_sweep(cache.clone(), config.sweep_interval));

    tokio::select! {
        result = run_script(&cache) => result?,
        _ = signal::ctrl_c() => {
            info!("Received Ctrl+C, stopping");
        }
    }

    if let Some(handle) = sweep_handle {
        handle.abort();
        warn!("Expiry sweep task aborted");
    }

    let stats = cache.stats().await;
    info!(
        "Done: entries={}, hits={}, misses={}, expirations={}, evictions={}",
        stats.total_entries, stats.hits, stats.misses, stats.expirations, stats.evictions
    );
    Ok(())
}

/// Executes stdin line by line. A bad line is reported and skipped.
async fn run_script(cache: &SharedCache<String>) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut line_no = 0usize;

    while let Some(line) = lines.next_line().await.context("reading stdin")? {
        line_no += 1;

        let reply = match Command::parse_line(&line) {
            Ok(None) => continue,
            Ok(Some(invocation)) => invocation.execute(cache).await,
            Err(err) => Err(err),
        };

        match reply {
            Ok(reply) => println!("{}", reply),
            Err(err) => {
                warn!("line {}: {}", line_no, err);
                println!("ERR {}", err);
            }
        }
    }

    Ok(())
}
