// Slice aggregation: membership filter + direction + counters -> one TrafficSummary

use std::collections::BTreeSet;
use std::net::IpAddr;

use crate::classifier::{Direction, classify_direction, is_member};
use crate::models::{AddressSet, Packet, TrafficEvent, TrafficSummary, epoch_millis};

/// Turns a batch of packets captured in one slice into a summary.
#[derive(Debug, Clone)]
pub struct WindowAggregator {
    event_threshold: u64,
}

impl WindowAggregator {
    pub fn new(event_threshold: u64) -> Self {
        Self { event_threshold }
    }

    /// Aggregates `packets` stamped with the current time.
    pub fn aggregate(
        &self,
        packets: &[Packet],
        local: &AddressSet,
        targets: &AddressSet,
    ) -> TrafficSummary {
        self.aggregate_at(packets, local, targets, epoch_millis())
    }

    /// Aggregates `packets` into a summary ending at `timestamp` (epoch ms).
    /// Unknown-direction members count toward `member_count` only.
    pub fn aggregate_at(
        &self,
        packets: &[Packet],
        local: &AddressSet,
        targets: &AddressSet,
        timestamp: u64,
    ) -> TrafficSummary {
        let mut sent_count = 0u64;
        let mut received_count = 0u64;
        let mut sent_bytes = 0u64;
        let mut received_bytes = 0u64;
        let mut member_count = 0u64;
        let mut source_addresses = BTreeSet::new();
        let mut destination_addresses = BTreeSet::new();

        for packet in packets.iter().filter(|p| is_member(p, targets)) {
            member_count += 1;
            match classify_direction(packet, local) {
                Direction::Sent => {
                    sent_count += 1;
                    sent_bytes += packet.size;
                }
                Direction::Received => {
                    received_count += 1;
                    received_bytes += packet.size;
                }
                Direction::Unknown => continue,
            }
            if let Some(e) = packet.endpoints {
                source_addresses.insert(e.source);
                destination_addresses.insert(e.destination);
            }
        }

        TrafficSummary {
            timestamp,
            source_addresses,
            destination_addresses,
            sent_count,
            received_count,
            sent_bytes,
            received_bytes,
            member_count,
            event: TrafficEvent::classify(sent_count, received_count, self.event_threshold),
        }
    }
}

/// Joins at most `max_ips` addresses with ", " (",..." marks the cut), then caps the
/// result at `max_length` characters, ending in "..." when cut.
pub fn format_addresses<'a, I>(addresses: I, max_ips: usize, max_length: usize) -> String
where
    I: IntoIterator<Item = &'a IpAddr>,
{
    let mut iter = addresses.into_iter();
    let shown: Vec<String> = iter.by_ref().take(max_ips).map(|a| a.to_string()).collect();
    let mut formatted = shown.join(", ");
    if iter.next().is_some() {
        formatted.push_str(",...");
    }
    if formatted.chars().count() > max_length {
        let mut cut: String = formatted
            .chars()
            .take(max_length.saturating_sub(3))
            .collect();
        cut.push_str("...");
        return cut;
    }
    formatted
}
