// Domain models: captured packets, per-slice summaries, history points

mod history;
mod packet;
mod summary;

pub use history::HistoryPoint;
pub use packet::{AddressSet, Endpoints, Packet};
pub use summary::{TrafficEvent, TrafficSummary};

/// Milliseconds since the Unix epoch; 0 if the system clock is before the epoch.
pub fn epoch_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_else(|e| {
            tracing::warn!(
                error = %e,
                operation = "get_timestamp",
                "system time error"
            );
            0
        })
}
