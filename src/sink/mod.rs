// Row sinks: aligned console table and durable CSV log

mod console;
mod csv_log;

pub use console::ConsoleSink;
pub use csv_log::{CsvLogSink, spawn_log_writer};

use crate::aggregator::format_addresses;
use crate::config::DisplayConfig;
use crate::models::TrafficSummary;
use chrono::{Local, TimeZone};
use serde::Serialize;

/// Column headers shared by the console and the CSV log.
pub const HEADER: [&str; 6] = ["Time", "SRC IP(s)", "DST IP(s)", "S", "R", "Event"];

/// Console width of the SRC/DST columns; `display.max_length` may not exceed it.
pub const ADDRESS_CELL_WIDTH: usize = 25;

pub const ROW_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("failed to open log file {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write log row: {0}")]
    Write(#[from] csv::Error),
    #[error("failed to flush: {0}")]
    Flush(#[from] std::io::Error),
}

/// A summary rendered for display: the same six cells on every sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub time: String,
    pub sources: String,
    pub destinations: String,
    pub sent: u64,
    pub received: u64,
    pub event: String,
}

impl SummaryRow {
    pub fn from_summary(summary: &TrafficSummary, display: &DisplayConfig) -> Self {
        Self {
            time: format_timestamp(summary.timestamp),
            sources: format_addresses(
                &summary.source_addresses,
                display.max_ips,
                display.max_length,
            ),
            destinations: format_addresses(
                &summary.destination_addresses,
                display.max_ips,
                display.max_length,
            ),
            sent: summary.sent_count,
            received: summary.received_count,
            event: summary.event.to_string(),
        }
    }
}

/// Epoch milliseconds as local wall-clock time.
pub fn format_timestamp(timestamp_ms: u64) -> String {
    match Local.timestamp_millis_opt(timestamp_ms as i64).single() {
        Some(t) => t.format(ROW_TIME_FORMAT).to_string(),
        None => String::new(),
    }
}
