// Packet capture: a blocking source per slice, driven from tokio's blocking pool

mod frame;
mod pcap_source;

pub use frame::decode_frame;
pub use pcap_source::PcapSource;

use crate::models::{Packet, epoch_millis};
use std::time::Duration;
use tokio::sync::mpsc;

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("failed to open capture on {interface}: {source}")]
    Open {
        interface: String,
        #[source]
        source: pcap::Error,
    },
    #[error("invalid capture filter {filter:?}: {source}")]
    Filter {
        filter: String,
        #[source]
        source: pcap::Error,
    },
    #[error("capture read failed: {0}")]
    Read(#[from] pcap::Error),
    #[error("capture source unavailable: {0}")]
    Unavailable(String),
}

/// Yields the packets seen during one slice. Blocks for at most `window`.
pub trait PacketSource: Send + 'static {
    fn capture(&mut self, window: Duration) -> Result<Vec<Packet>, CaptureError>;
}

/// One slice's capture result, stamped when the slice ended.
#[derive(Debug)]
pub struct CaptureBatch {
    pub finished_at: u64,
    pub packets: Result<Vec<Packet>, CaptureError>,
}

/// Runs `source` slice after slice on the blocking pool, sending each batch to `tx`.
/// Stops once the receiver is gone.
pub fn spawn_capture_loop<S: PacketSource>(
    mut source: S,
    window: Duration,
    tx: mpsc::Sender<CaptureBatch>,
) -> tokio::task::JoinHandle<()> {
    tokio::task::spawn_blocking(move || {
        loop {
            if tx.is_closed() {
                break;
            }
            let packets = source.capture(window);
            let batch = CaptureBatch {
                finished_at: epoch_millis(),
                packets,
            };
            if tx.blocking_send(batch).is_err() {
                break;
            }
        }
        tracing::debug!("Capture loop shutting down");
    })
}
