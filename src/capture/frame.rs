// Link-layer frame -> Packet (IP endpoints + wire length) via etherparse

use crate::models::Packet;
use etherparse::{LaxNetSlice, LaxSlicedPacket};
use std::net::IpAddr;

// DLT_* values (pcap-linktype.h)
const DLT_NULL: i32 = 0;
const DLT_EN10MB: i32 = 1;
const DLT_RAW_BSD: i32 = 12;
const DLT_RAW: i32 = 101;
const DLT_LOOP: i32 = 108;
const DLT_LINUX_SLL: i32 = 113;
const DLT_IPV4: i32 = 228;
const DLT_IPV6: i32 = 229;

const NULL_HEADER_LEN: usize = 4;
const SLL_HEADER_LEN: usize = 16;

/// Decodes one captured frame. Only the IP header has to be intact: a damaged or
/// cut-off transport layer still yields the endpoints. Anything without a parsable
/// IPv4/IPv6 header becomes `Packet::without_ip`, never an error.
pub fn decode_frame(datalink: i32, data: &[u8], wire_len: u64) -> Packet {
    let sliced = match datalink {
        DLT_EN10MB => LaxSlicedPacket::from_ethernet(data).ok(),
        DLT_RAW | DLT_RAW_BSD | DLT_IPV4 | DLT_IPV6 => LaxSlicedPacket::from_ip(data).ok(),
        DLT_NULL | DLT_LOOP => data
            .get(NULL_HEADER_LEN..)
            .and_then(|ip| LaxSlicedPacket::from_ip(ip).ok()),
        DLT_LINUX_SLL => data
            .get(SLL_HEADER_LEN..)
            .and_then(|ip| LaxSlicedPacket::from_ip(ip).ok()),
        _ => None,
    };

    let endpoints = sliced.and_then(|s| match s.net {
        Some(LaxNetSlice::Ipv4(ipv4)) => {
            let h = ipv4.header();
            Some((
                IpAddr::V4(h.source_addr()),
                IpAddr::V4(h.destination_addr()),
            ))
        }
        Some(LaxNetSlice::Ipv6(ipv6)) => {
            let h = ipv6.header();
            Some((
                IpAddr::V6(h.source_addr()),
                IpAddr::V6(h.destination_addr()),
            ))
        }
        _ => None,
    });

    match endpoints {
        Some((source, destination)) => Packet::new(source, destination, wire_len),
        None => Packet::without_ip(wire_len),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use etherparse::PacketBuilder;

    fn ipv4_ethernet_frame() -> Vec<u8> {
        let builder = PacketBuilder::ethernet2([1, 2, 3, 4, 5, 6], [7, 8, 9, 10, 11, 12])
            .ipv4([10, 0, 0, 5], [157, 240, 0, 1], 64)
            .udp(40000, 443);
        let payload = [0u8; 8];
        let mut out = Vec::with_capacity(builder.size(payload.len()));
        builder.write(&mut out, &payload).unwrap();
        out
    }

    fn ipv4_ethernet_tcp_frame() -> Vec<u8> {
        let builder = PacketBuilder::ethernet2([1, 2, 3, 4, 5, 6], [7, 8, 9, 10, 11, 12])
            .ipv4([10, 0, 0, 5], [157, 240, 0, 1], 64)
            .tcp(40000, 443, 1, 1024);
        let payload = [0u8; 16];
        let mut out = Vec::with_capacity(builder.size(payload.len()));
        builder.write(&mut out, &payload).unwrap();
        out
    }

    fn ipv6_raw_packet() -> Vec<u8> {
        let src = "2001:db8::5".parse::<std::net::Ipv6Addr>().unwrap().octets();
        let dst = "2a03:2880:f0ff::1"
            .parse::<std::net::Ipv6Addr>()
            .unwrap()
            .octets();
        let builder = PacketBuilder::ipv6(src, dst, 64).tcp(40000, 443, 1, 1024);
        let payload = [0u8; 4];
        let mut out = Vec::with_capacity(builder.size(payload.len()));
        builder.write(&mut out, &payload).unwrap();
        out
    }

    #[test]
    fn decodes_ipv4_over_ethernet() {
        let frame = ipv4_ethernet_frame();
        let p = decode_frame(DLT_EN10MB, &frame, frame.len() as u64);
        assert_eq!(p.source(), Some("10.0.0.5".parse().unwrap()));
        assert_eq!(p.destination(), Some("157.240.0.1".parse().unwrap()));
        assert_eq!(p.size, frame.len() as u64);
    }

    #[test]
    fn decodes_raw_ipv6() {
        let pkt = ipv6_raw_packet();
        let p = decode_frame(DLT_RAW, &pkt, 1500);
        assert_eq!(p.source(), Some("2001:db8::5".parse().unwrap()));
        assert_eq!(p.destination(), Some("2a03:2880:f0ff::1".parse().unwrap()));
        assert_eq!(p.size, 1500);
    }

    #[test]
    fn decodes_loopback_null_header() {
        let mut frame = vec![2, 0, 0, 0];
        let builder = PacketBuilder::ipv4([127, 0, 0, 1], [127, 0, 0, 2], 64).udp(1, 2);
        builder.write(&mut frame, &[]).unwrap();
        let p = decode_frame(DLT_NULL, &frame, frame.len() as u64);
        assert_eq!(p.source(), Some("127.0.0.1".parse().unwrap()));
    }

    #[test]
    fn truncated_transport_header_keeps_ip_endpoints() {
        let mut frame = ipv4_ethernet_tcp_frame();
        // ethernet + ipv4 + first 8 bytes of the 20-byte tcp header
        frame.truncate(14 + 20 + 8);
        let p = decode_frame(DLT_EN10MB, &frame, 1514);
        assert_eq!(p.source(), Some("10.0.0.5".parse().unwrap()));
        assert_eq!(p.destination(), Some("157.240.0.1".parse().unwrap()));
        assert_eq!(p.size, 1514);
    }

    #[test]
    fn zero_total_length_keeps_ip_endpoints() {
        let mut frame = ipv4_ethernet_tcp_frame();
        // ipv4 total_len as reported by segmentation offload
        frame[14 + 2] = 0;
        frame[14 + 3] = 0;
        let p = decode_frame(DLT_EN10MB, &frame, frame.len() as u64);
        assert_eq!(p.source(), Some("10.0.0.5".parse().unwrap()));
        assert_eq!(p.destination(), Some("157.240.0.1".parse().unwrap()));
    }

    #[test]
    fn bad_tcp_data_offset_keeps_ip_endpoints() {
        let mut frame = ipv4_ethernet_tcp_frame();
        // data offset below the 5-word minimum
        frame[14 + 20 + 12] = 0x20;
        let p = decode_frame(DLT_EN10MB, &frame, frame.len() as u64);
        assert_eq!(p.source(), Some("10.0.0.5".parse().unwrap()));
    }

    #[test]
    fn garbage_has_no_ip_layer() {
        let p = decode_frame(DLT_EN10MB, &[0xff; 10], 10);
        assert!(p.endpoints.is_none());
        assert_eq!(p.size, 10);
    }

    #[test]
    fn unsupported_datalink_has_no_ip_layer() {
        let frame = ipv4_ethernet_frame();
        let p = decode_frame(147, &frame, frame.len() as u64);
        assert!(p.endpoints.is_none());
    }

    #[test]
    fn short_sll_frame_has_no_ip_layer() {
        let p = decode_frame(DLT_LINUX_SLL, &[0u8; 8], 8);
        assert!(p.endpoints.is_none());
    }
}
