//! A single crawl phase
//!
//! A phase hands a URL set to the fetcher and consumes the outcome stream until
//! it closes, folding every outcome into a [`StatsAccumulator`].

use crate::config::HttpConfig;
use crate::crawler::fetcher::{FetchOutcome, Fetcher};
use crate::interrupt::StopSignal;
use crate::stats::{CrawlStats, StatsAccumulator};
use std::time::Duration;

/// Everything a finished phase produced
#[derive(Debug)]
pub struct PhaseOutcome {
    /// Every outcome, in arrival order
    pub results: Vec<FetchOutcome>,

    /// Finalized statistics for this phase
    pub stats: CrawlStats,

    /// Sum of server time over 200 responses
    pub success_time_sum: Duration,

    /// True if the stream closed on the stop signal before every URL was
    /// attempted
    pub stopped: bool,
}

/// Runs one throttled fetch pass over `urls`
///
/// Returns once the fetcher closes its stream, either because every URL was
/// attempted or because it honored the stop signal.
pub async fn run_phase(
    urls: Vec<String>,
    config: &HttpConfig,
    throttle: usize,
    fetcher: &dyn Fetcher,
    stop: &StopSignal,
) -> PhaseOutcome {
    let requested = urls.len();
    let mut stream = fetcher.fetch(urls, config, throttle.max(1), stop.clone());

    let mut accumulator = StatsAccumulator::new();
    let mut results = Vec::with_capacity(requested);

    while let Some(outcome) = stream.recv().await {
        tracing::debug!(
            "{} {} ({:?})",
            outcome.status_code,
            outcome.url,
            outcome.server_time.unwrap_or_default()
        );
        accumulator.fold(&outcome);
        results.push(outcome);
    }

    // A signal arriving after the last outcome does not cut the phase short
    let stopped = stop.is_fired() && accumulator.total() < requested as u64;
    if stopped {
        tracing::warn!(
            "Phase stopped early: {} of {} URLs crawled",
            accumulator.total(),
            requested
        );
    }

    let (stats, success_time_sum) = accumulator.finish();

    PhaseOutcome {
        results,
        stats,
        success_time_sum,
        stopped,
    }
}
