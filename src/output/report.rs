use crate::crawler::CrawlReport;
use crate::stats::CrawlStats;
use serde::Serialize;
use std::fmt::Write;
use std::time::Duration;

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    stats: &'a CrawlStats,
    stopped: bool,
    error: Option<String>,
}

/// Serializes a report to pretty-printed JSON
///
/// The statistics fields sit at the top level next to `stopped` and `error`,
/// the latter holding the verdict message when the crawl failed.
pub fn report_to_json(report: &CrawlReport) -> Result<String, serde_json::Error> {
    let json = JsonReport {
        stats: &report.stats,
        stopped: report.stopped,
        error: report.verdict().err().map(|e| e.to_string()),
    };
    serde_json::to_string_pretty(&json)
}

/// Formats a report as a human-readable summary
pub fn format_report(report: &CrawlReport) -> String {
    let stats = &report.stats;
    let mut out = String::new();

    let _ = writeln!(out, "=== Crawl Statistics ===\n");
    let _ = writeln!(out, "Total URLs crawled: {}", stats.total);
    if report.stopped {
        let _ = writeln!(out, "Crawl was interrupted before completion");
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "Status Codes:");
    let mut codes: Vec<_> = stats.status_codes.iter().collect();
    codes.sort_by_key(|(code, _)| **code);
    for (code, count) in codes {
        let percentage = if stats.total > 0 {
            (*count as f64 / stats.total as f64) * 100.0
        } else {
            0.0
        };
        let _ = writeln!(out, "  {}: {} ({:.1}%)", status_label(*code), count, percentage);
    }
    let _ = writeln!(out);

    let _ = writeln!(
        out,
        "Average 200 time: {}",
        format_millis(stats.average_200_time)
    );
    let _ = writeln!(out, "Max 200 time: {}", format_millis(stats.max_200_time));

    if !stats.non_200_urls.is_empty() {
        let _ = writeln!(out, "\nNon-200 URLs ({}):", stats.non_200_urls.len());
        for result in &stats.non_200_urls {
            let _ = writeln!(
                out,
                "  - [{}] {} ({})",
                status_label(result.status_code),
                result.url,
                format_millis(result.time)
            );
            for linking_url in &result.linking_urls {
                let _ = writeln!(out, "      linked from {}", linking_url);
            }
        }
    }

    out
}

/// Prints a report to stdout
pub fn print_report(report: &CrawlReport) {
    print!("{}", format_report(report));
}

fn status_label(code: u16) -> String {
    if code == 0 {
        "no response".to_string()
    } else {
        code.to_string()
    }
}

fn format_millis(duration: Duration) -> String {
    format!("{:.1}ms", duration.as_nanos() as f64 / 1_000_000.0)
}
