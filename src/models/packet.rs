// Captured packet: only the IP-layer endpoints and the on-wire size survive decoding

use std::collections::HashSet;
use std::net::IpAddr;

/// Flat set of addresses; IPv4 and IPv6 may be mixed.
pub type AddressSet = HashSet<IpAddr>;

/// Source and destination of an IPv4 or IPv6 header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoints {
    pub source: IpAddr,
    pub destination: IpAddr,
}

/// One captured frame. `endpoints` is `None` when no IP layer was recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    pub endpoints: Option<Endpoints>,
    pub size: u64,
}

impl Packet {
    pub fn new(source: IpAddr, destination: IpAddr, size: u64) -> Self {
        Self {
            endpoints: Some(Endpoints {
                source,
                destination,
            }),
            size,
        }
    }

    /// A frame that carried no IPv4/IPv6 header.
    pub fn without_ip(size: u64) -> Self {
        Self {
            endpoints: None,
            size,
        }
    }

    pub fn source(&self) -> Option<IpAddr> {
        self.endpoints.map(|e| e.source)
    }

    pub fn destination(&self) -> Option<IpAddr> {
        self.endpoints.map(|e| e.destination)
    }
}
