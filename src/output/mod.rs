//! Output module for crawl reports
//!
//! This module handles:
//! - Printing a human-readable summary of a crawl
//! - Serializing a crawl report to JSON

mod report;

pub use report::{format_report, print_report, report_to_json};
