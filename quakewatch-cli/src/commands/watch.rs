//! Watch command - poll the feed and print new events.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use quakewatch::annotate::{annotate_snapshot, AnnotatedEvent};
use quakewatch::cities::NearestNeighborIndex;
use quakewatch::feed::{FeedClient, FeedSnapshot, ReqwestClient};
use quakewatch::poller::{ChangeAwarePoller, PollerStatsSnapshot};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::common::{load_index, resolve_neighbors, CommandContext};
use crate::error::CliError;
use crate::render;

/// Arguments for the watch command.
pub struct WatchArgs {
    pub interval_ms: Option<u64>,
    pub resource: Option<String>,
    pub neighbors: Option<usize>,
    pub cities: Option<PathBuf>,
}

/// An accepted snapshot with every event annotated.
struct SnapshotBatch {
    generation: i64,
    generated_at: Option<DateTime<Utc>>,
    events: Vec<AnnotatedEvent>,
}

/// Run the watch command.
pub fn run(args: WatchArgs) -> Result<(), CliError> {
    let context = CommandContext::load()?;
    let config = &context.config;

    let interval = args
        .interval_ms
        .map(Duration::from_millis)
        .unwrap_or_else(|| config.poll_interval());
    let k = resolve_neighbors(args.neighbors, config);
    let resource = args
        .resource
        .unwrap_or_else(|| config.feed.resource.clone());
    let cities_path = args
        .cities
        .unwrap_or_else(|| config.cities.path.clone());

    let index = Arc::new(load_index(&cities_path, &config.city_columns())?);
    let http = ReqwestClient::with_timeout(config.feed.timeout_secs)?;
    let client = FeedClient::new(http, config.feed.base_url.clone(), resource);

    // Print banner
    println!();
    println!("QuakeWatch v{}", quakewatch::VERSION);
    println!("=============");
    println!();
    println!("Feed:      {}", client.resource_url(None));
    println!("Interval:  {} ms", interval.as_millis());
    println!("Cities:    {} ({})", index.len(), cities_path.display());
    println!("Neighbors: {}", k);
    println!();
    println!("Press Ctrl+C to stop");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::RuntimeCreation(e.to_string()))?;

    // Set up signal handler for graceful shutdown
    let shutdown = CancellationToken::new();
    let shutdown_signal = shutdown.clone();
    ctrlc::set_handler(move || {
        println!();
        println!("Received shutdown signal, stopping...");
        shutdown_signal.cancel();
    })
    .map_err(|e| CliError::SignalHandler(e.to_string()))?;

    let stats = runtime.block_on(watch(client, index, k, interval, shutdown))?;

    println!();
    println!("Session Summary");
    println!("───────────────");
    println!(
        "  Polls:     {} ({} skipped while a fetch was running)",
        stats.ticks, stats.overlapping_ticks
    );
    println!(
        "  Snapshots: {} new, {} unchanged",
        stats.accepted, stats.stale
    );
    println!("  Failures:  {}", stats.fetch_failures);

    Ok(())
}

/// Polls until `shutdown` is cancelled, printing each accepted snapshot.
async fn watch(
    client: FeedClient<ReqwestClient>,
    index: Arc<NearestNeighborIndex>,
    k: usize,
    interval: Duration,
    shutdown: CancellationToken,
) -> Result<PollerStatsSnapshot, CliError> {
    let (tx, mut rx) = mpsc::unbounded_channel();

    let poller = ChangeAwarePoller::new(client, interval, move |snapshot: FeedSnapshot| {
        let batch = SnapshotBatch {
            generation: snapshot.generation,
            generated_at: snapshot.generated_at(),
            events: annotate_snapshot(&snapshot, &index, k),
        };
        if tx.send(batch).is_err() {
            debug!("Render loop closed, dropping snapshot");
        }
    })?;

    let handle = poller.spawn(shutdown.clone());

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            batch = rx.recv() => match batch {
                Some(batch) => {
                    info!(
                        generation = batch.generation,
                        events = batch.events.len(),
                        "Rendering snapshot"
                    );
                    render::print_batch(batch.generated_at, &batch.events);
                }
                None => break,
            },
        }
    }

    // Also ends the poller when the render loop exits on its own
    shutdown.cancel();
    if let Err(e) = handle.await {
        warn!(error = %e, "Poller task ended abnormally");
    }

    Ok(poller.stats())
}
