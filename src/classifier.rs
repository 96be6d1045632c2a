// Packet membership and direction relative to the local host

use crate::models::{AddressSet, Packet};

/// Direction of a packet relative to the local address set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Sent,
    Received,
    Unknown,
}

/// True iff the packet's source or destination is a target address.
/// Packets without an IP layer are never members.
pub fn is_member(packet: &Packet, targets: &AddressSet) -> bool {
    match packet.endpoints {
        Some(e) => targets.contains(&e.source) || targets.contains(&e.destination),
        None => false,
    }
}

/// Sent if the source is local, else Received if the destination is local, else Unknown.
/// Local-to-local traffic resolves to Sent.
pub fn classify_direction(packet: &Packet, local: &AddressSet) -> Direction {
    let Some(e) = packet.endpoints else {
        return Direction::Unknown;
    };
    if local.contains(&e.source) {
        Direction::Sent
    } else if local.contains(&e.destination) {
        Direction::Received
    } else {
        Direction::Unknown
    }
}
