//! Crawl statistics
//!
//! This module holds the aggregate view of a crawl pass:
//! - `CrawlResult`: one non-200 outcome kept for reporting
//! - `CrawlStats`: status-code histogram, 200 latency figures and failures
//! - `StatsAccumulator`: folds raw fetch outcomes into a `CrawlStats`
//! - `merge_crawl_stats`: combines the stats of two independent passes

mod accumulator;
mod merge;

pub use accumulator::StatsAccumulator;
pub use merge::merge_crawl_stats;

use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::time::Duration;

/// The result of a single crawled URL that did not answer 200
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrawlResult {
    pub url: String,

    #[serde(rename = "status-code")]
    pub status_code: u16,

    /// Server time measured by the fetcher
    #[serde(rename = "server-time-ms", serialize_with = "serialize_millis")]
    pub time: Duration,

    /// First-hop pages that linked to this URL, in discovery order (second hop only)
    #[serde(rename = "linking-urls")]
    pub linking_urls: Vec<String>,
}

/// Aggregate statistics for one or more crawl passes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrawlStats {
    /// Number of fetch outcomes folded in
    pub total: u64,

    /// Occurrences of each status code
    #[serde(rename = "status-codes")]
    pub status_codes: HashMap<u16, u64>,

    #[serde(rename = "average-200-time-ms", serialize_with = "serialize_millis")]
    pub average_200_time: Duration,

    #[serde(rename = "max-200-time-ms", serialize_with = "serialize_millis")]
    pub max_200_time: Duration,

    #[serde(rename = "non-200-urls")]
    pub non_200_urls: Vec<CrawlResult>,
}

impl CrawlStats {
    /// Number of outcomes that answered 200
    pub fn count_200(&self) -> u64 {
        self.status_codes.get(&200).copied().unwrap_or(0)
    }

    /// Number of outcomes that did not answer 200
    pub fn count_non_200(&self) -> u64 {
        self.total.saturating_sub(self.count_200())
    }

    /// Sets the 200 average from the summed 200 server time
    ///
    /// Leaves the average untouched when no 200 was recorded.
    pub fn finalize_average(&mut self, success_time_sum: Duration) {
        let count = self.count_200();
        if count > 0 {
            self.average_200_time = divide_duration(success_time_sum, count);
        }
    }

    /// Merges with another set of statistics, see [`merge_crawl_stats`]
    pub fn merge(&self, other: &CrawlStats) -> CrawlStats {
        merge_crawl_stats(self, other)
    }
}

/// Divides a duration by a count, at nanosecond precision
pub(crate) fn divide_duration(sum: Duration, count: u64) -> Duration {
    nanos_to_duration(sum.as_nanos() / u128::from(count))
}

pub(crate) fn nanos_to_duration(nanos: u128) -> Duration {
    Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
}

fn serialize_millis<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_nanos() as f64 / 1_000_000.0)
}
