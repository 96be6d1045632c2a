// Per-slice traffic summary and its coarse event classification

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::net::IpAddr;

/// Slice classification; serializes as "SENT" / "RCVD" / "OTHER".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrafficEvent {
    #[serde(rename = "SENT")]
    Sent,
    #[serde(rename = "RCVD")]
    Received,
    #[serde(rename = "OTHER")]
    Other,
}

impl TrafficEvent {
    /// SENT when sent traffic reaches `threshold` and dominates, RCVD symmetrically.
    /// Equal counts are always OTHER, whatever the threshold.
    pub fn classify(sent_count: u64, received_count: u64, threshold: u64) -> Self {
        if sent_count >= threshold && sent_count > received_count {
            TrafficEvent::Sent
        } else if received_count >= threshold && received_count > sent_count {
            TrafficEvent::Received
        } else {
            TrafficEvent::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TrafficEvent::Sent => "SENT",
            TrafficEvent::Received => "RCVD",
            TrafficEvent::Other => "OTHER",
        }
    }
}

impl fmt::Display for TrafficEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything observed for the monitored application in one slice.
/// `member_count` includes member packets whose direction was Unknown;
/// the sent/received counters and address sets do not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficSummary {
    /// Slice end, epoch milliseconds.
    pub timestamp: u64,
    pub source_addresses: BTreeSet<IpAddr>,
    pub destination_addresses: BTreeSet<IpAddr>,
    pub sent_count: u64,
    pub received_count: u64,
    pub sent_bytes: u64,
    pub received_bytes: u64,
    pub member_count: u64,
    pub event: TrafficEvent,
}

impl TrafficSummary {
    pub fn total_bytes(&self) -> u64 {
        self.sent_bytes + self.received_bytes
    }
}
