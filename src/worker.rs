// Monitor worker: one capture batch in, one summary out (console, log writer, live feed).
// Capture runs on the blocking pool (capture::spawn_capture_loop); CSV writes run in the
// log writer task (sink::spawn_log_writer).

use crate::address_repo::AddressSets;
use crate::aggregator::WindowAggregator;
use crate::capture::CaptureBatch;
use crate::config::DisplayConfig;
use crate::history::HistoryBuffer;
use crate::models::{HistoryPoint, TrafficSummary, epoch_millis};
use crate::sink::{ConsoleSink, SummaryRow};
use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::time::{Duration, Instant, interval};
use tracing::Instrument;

/// Rate limit for "no receivers" debug line (avoid logging every slice when no one is on /ws/traffic)
const NO_RECEIVERS_LOG_INTERVAL: Duration = Duration::from_secs(60);

/// Channel capacity between the capture loop and the worker, and between the worker and the log writer.
pub const SLICE_CHANNEL_CAPACITY: usize = 32;

/// Per-slice state owned by the worker: aggregation settings and the rolling history.
pub struct Monitor {
    aggregator: WindowAggregator,
    history: HistoryBuffer,
    display: DisplayConfig,
}

/// What one slice produced.
#[derive(Debug, Clone)]
pub struct SliceOutput {
    pub summary: TrafficSummary,
    pub row: SummaryRow,
    pub capture_failed: bool,
}

impl Monitor {
    pub fn new(config: &MonitorConfig, start_timestamp: u64) -> Self {
        Self {
            aggregator: WindowAggregator::new(config.event_threshold),
            history: HistoryBuffer::new(config.history_length, start_timestamp),
            display: config.display.clone(),
        }
    }

    /// Aggregates one batch against the address snapshots current right now.
    /// A failed capture is an empty slice.
    pub fn process(&mut self, batch: CaptureBatch, addresses: &AddressSets) -> SliceOutput {
        let (packets, capture_failed) = match batch.packets {
            Ok(p) => (p, false),
            Err(e) => {
                tracing::warn!(error = %e, operation = "capture", "capture failed; slice treated as empty");
                (Vec::new(), true)
            }
        };
        let targets = addresses.targets();
        let local = addresses.local();
        let summary = self
            .aggregator
            .aggregate_at(&packets, &local, &targets, batch.finished_at);
        self.history.push(summary.timestamp, summary.member_count);
        let row = SummaryRow::from_summary(&summary, &self.display);
        SliceOutput {
            summary,
            row,
            capture_failed,
        }
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }
}

/// Channels, shared state and shutdown for the worker.
pub struct MonitorDeps<W: Write + Send + 'static> {
    pub addresses: Arc<AddressSets>,
    pub batch_rx: mpsc::Receiver<CaptureBatch>,
    pub rows_tx: mpsc::Sender<SummaryRow>,
    pub summary_tx: broadcast::Sender<TrafficSummary>,
    pub history_tx: watch::Sender<Vec<HistoryPoint>>,
    pub console: ConsoleSink<W>,
    pub ws_connections: Arc<AtomicUsize>,
    pub slices_total: Arc<AtomicU64>,
    pub capture_errors_total: Arc<AtomicU64>,
    pub rows_logged_total: Arc<AtomicU64>,
    pub shutdown_rx: oneshot::Receiver<()>,
}

/// Worker aggregation and logging config.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub event_threshold: u64,
    pub history_length: usize,
    pub display: DisplayConfig,
    /// How often to log app stats (real seconds).
    pub stats_log_interval_secs: u64,
}

pub fn spawn<W: Write + Send + 'static>(
    deps: MonitorDeps<W>,
    config: MonitorConfig,
) -> tokio::task::JoinHandle<()> {
    let MonitorDeps {
        addresses,
        mut batch_rx,
        rows_tx,
        summary_tx,
        history_tx,
        mut console,
        ws_connections,
        slices_total,
        capture_errors_total,
        rows_logged_total,
        mut shutdown_rx,
    } = deps;

    let stats_log_interval = Duration::from_secs(config.stats_log_interval_secs);

    let worker_span = tracing::span!(
        tracing::Level::DEBUG,
        "monitor",
        event_threshold = config.event_threshold
    );

    let task = async move {
        let mut monitor = Monitor::new(&config, epoch_millis());
        history_tx.send_replace(monitor.history().snapshot());

        let mut stats_log_tick = interval(stats_log_interval);
        stats_log_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut last_no_receivers_log: Option<Instant> = None;

        loop {
            tokio::select! {
                batch = batch_rx.recv() => {
                    let Some(batch) = batch else {
                        tracing::debug!("Capture channel closed");
                        break;
                    };
                    let out = monitor.process(batch, &addresses);
                    slices_total.fetch_add(1, Ordering::Relaxed);
                    if out.capture_failed {
                        capture_errors_total.fetch_add(1, Ordering::Relaxed);
                    }
                    history_tx.send_replace(monitor.history().snapshot());

                    if let Err(e) = console.write_row(&out.row) {
                        tracing::warn!(error = %e, operation = "console_row", "console write failed");
                    }
                    if rows_tx.send(out.row).await.is_err() {
                        tracing::debug!("Log writer channel closed");
                    }
                    if summary_tx.send(out.summary).is_err() {
                        let should_log = last_no_receivers_log
                            .is_none_or(|t| t.elapsed() >= NO_RECEIVERS_LOG_INTERVAL);
                        if should_log {
                            tracing::debug!(
                                operation = "broadcast_summary",
                                "No live feed clients; broadcast channel has no receivers"
                            );
                            last_no_receivers_log = Some(Instant::now());
                        }
                    }
                }
                _ = &mut shutdown_rx => {
                    tracing::debug!("Monitor shutting down");
                    break;
                }
                _ = stats_log_tick.tick() => {
                    tracing::info!(
                        slices_total = slices_total.load(Ordering::Relaxed),
                        capture_errors_total = capture_errors_total.load(Ordering::Relaxed),
                        rows_logged_total = rows_logged_total.load(Ordering::Relaxed),
                        target_addresses = addresses.targets().len(),
                        local_addresses = addresses.local().len(),
                        ws_traffic_clients = ws_connections.load(Ordering::Relaxed),
                        "app stats"
                    );
                }
            }
        }
    };
    tokio::spawn(task.instrument(worker_span))
}
