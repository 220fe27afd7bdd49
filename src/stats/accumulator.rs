use crate::crawler::FetchOutcome;
use crate::stats::{CrawlResult, CrawlStats};
use std::collections::HashMap;
use std::time::Duration;

/// Running statistics for a single crawl pass
///
/// Outcomes are folded in as they stream from the fetcher. The 200 average is
/// only computed by [`finish`](Self::finish), once the pass is over.
#[derive(Debug, Default)]
pub struct StatsAccumulator {
    total: u64,
    status_codes: HashMap<u16, u64>,
    non_200_urls: Vec<CrawlResult>,
    success_time_sum: Duration,
    max_200_time: Duration,
}

impl StatsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one fetch outcome into the running statistics
    ///
    /// Must be called exactly once per outcome.
    pub fn fold(&mut self, outcome: &FetchOutcome) {
        self.total += 1;
        *self.status_codes.entry(outcome.status_code).or_insert(0) += 1;

        let server_time = outcome.server_time.unwrap_or(Duration::ZERO);

        if outcome.status_code == 200 {
            self.success_time_sum += server_time;
            if server_time > self.max_200_time {
                self.max_200_time = server_time;
            }
        } else {
            self.non_200_urls.push(CrawlResult {
                url: outcome.url.clone(),
                status_code: outcome.status_code,
                time: server_time,
                linking_urls: Vec::new(),
            });
        }
    }

    /// Number of outcomes folded so far
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Finalizes the pass
    ///
    /// Returns the statistics with the 200 average computed, and the raw sum
    /// of 200 server time it was computed from.
    pub fn finish(self) -> (CrawlStats, Duration) {
        let mut stats = CrawlStats {
            total: self.total,
            status_codes: self.status_codes,
            average_200_time: Duration::ZERO,
            max_200_time: self.max_200_time,
            non_200_urls: self.non_200_urls,
        };
        stats.finalize_average(self.success_time_sum);

        (stats, self.success_time_sum)
    }
}
