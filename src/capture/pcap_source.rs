// libpcap-backed PacketSource; the device is opened lazily and reopened after errors

use super::{CaptureError, PacketSource, decode_frame};
use crate::models::Packet;
use pcap::{Active, Capture};
use std::time::{Duration, Instant};

const READ_TIMEOUT_MS: i32 = 100;
const SNAPLEN: i32 = 65535;

pub struct PcapSource {
    interface: String,
    filter: String,
    capture: Option<Capture<Active>>,
}

impl PcapSource {
    pub fn new(interface: impl Into<String>, filter: impl Into<String>) -> Self {
        Self {
            interface: interface.into(),
            filter: filter.into(),
            capture: None,
        }
    }

    pub fn interface(&self) -> &str {
        &self.interface
    }

    fn open(&self) -> Result<Capture<Active>, CaptureError> {
        let mut cap = Capture::from_device(self.interface.as_str())
            .and_then(|c| {
                c.promisc(false)
                    .snaplen(SNAPLEN)
                    .timeout(READ_TIMEOUT_MS)
                    .open()
            })
            .map_err(|source| CaptureError::Open {
                interface: self.interface.clone(),
                source,
            })?;
        cap.filter(&self.filter, true)
            .map_err(|source| CaptureError::Filter {
                filter: self.filter.clone(),
                source,
            })?;
        tracing::info!(interface = %self.interface, filter = %self.filter, "capture opened");
        Ok(cap)
    }

    fn read_until(cap: &mut Capture<Active>, deadline: Instant) -> Result<Vec<Packet>, CaptureError> {
        let datalink = cap.get_datalink().0;
        let mut packets = Vec::new();
        while Instant::now() < deadline {
            match cap.next_packet() {
                Ok(frame) => {
                    packets.push(decode_frame(datalink, frame.data, frame.header.len as u64));
                }
                Err(pcap::Error::TimeoutExpired) => continue,
                Err(e) => return Err(CaptureError::Read(e)),
            }
        }
        Ok(packets)
    }
}

impl PacketSource for PcapSource {
    fn capture(&mut self, window: Duration) -> Result<Vec<Packet>, CaptureError> {
        let deadline = Instant::now() + window;
        let result = match self.capture.take() {
            Some(cap) => Ok(cap),
            None => self.open(),
        }
        .and_then(|mut cap| {
            let r = Self::read_until(&mut cap, deadline);
            if r.is_ok() {
                self.capture = Some(cap);
            }
            r
        });
        if result.is_err() {
            // sleep out the rest of the slice
            let remaining = deadline.saturating_duration_since(Instant::now());
            std::thread::sleep(remaining);
        }
        result
    }
}
