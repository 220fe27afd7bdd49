use crate::stats::{nanos_to_duration, CrawlStats};
use std::time::Duration;

/// Merges two sets of crawl statistics together
///
/// Neither input is modified. Totals and status codes are summed, the maximum
/// 200 time is the larger of the two, and non-200 results are concatenated
/// (`a` first, then `b`). The 200 average is recomputed as the average of both
/// inputs weighted by their 200 counts.
///
/// A side with no 200 response carries no weight. A non-zero average paired
/// with a zero 200 count is inconsistent input; it is logged and ignored.
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
/// use std::time::Duration;
/// use sitemap_crawl::stats::{merge_crawl_stats, CrawlStats};
///
/// let a = CrawlStats {
///     total: 1,
///     status_codes: HashMap::from([(200, 1)]),
///     average_200_time: Duration::from_millis(10),
///     max_200_time: Duration::from_millis(10),
///     non_200_urls: vec![],
/// };
/// let b = CrawlStats {
///     total: 3,
///     status_codes: HashMap::from([(200, 3)]),
///     average_200_time: Duration::from_millis(30),
///     max_200_time: Duration::from_millis(50),
///     non_200_urls: vec![],
/// };
///
/// let merged = merge_crawl_stats(&a, &b);
/// assert_eq!(merged.total, 4);
/// assert_eq!(merged.average_200_time, Duration::from_millis(25));
/// assert_eq!(merged.max_200_time, Duration::from_millis(50));
/// ```
pub fn merge_crawl_stats(a: &CrawlStats, b: &CrawlStats) -> CrawlStats {
    let mut stats = CrawlStats {
        total: a.total + b.total,
        max_200_time: a.max_200_time.max(b.max_200_time),
        ..Default::default()
    };

    for (code, count) in a.status_codes.iter().chain(b.status_codes.iter()) {
        *stats.status_codes.entry(*code).or_insert(0) += count;
    }

    if a.average_200_time != Duration::ZERO || b.average_200_time != Duration::ZERO {
        let weighted = weighted_nanos(a) + weighted_nanos(b);
        let count = u128::from(stats.count_200());
        if count > 0 {
            stats.average_200_time = nanos_to_duration(weighted / count);
        }
    }

    stats.non_200_urls.extend(a.non_200_urls.iter().cloned());
    stats.non_200_urls.extend(b.non_200_urls.iter().cloned());

    stats
}

fn weighted_nanos(stats: &CrawlStats) -> u128 {
    let count = stats.count_200();
    if count == 0 {
        if stats.average_200_time != Duration::ZERO {
            tracing::warn!(
                "Ignoring 200 average of {:?} with no 200 responses while merging stats",
                stats.average_200_time
            );
        }
        return 0;
    }
    stats.average_200_time.as_nanos() * u128::from(count)
}
