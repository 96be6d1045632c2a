// Durable CSV log: header on open, one flushed row per slice

use super::{HEADER, SinkError, SummaryRow};
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;

pub struct CsvLogSink {
    writer: csv::Writer<File>,
    path: String,
}

impl CsvLogSink {
    /// Creates (truncating) the log file and writes the header row.
    pub fn open(path: &str) -> Result<Self, SinkError> {
        let open_err = |source: std::io::Error| SinkError::Open {
            path: path.to_string(),
            source,
        };
        if let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(open_err)?;
        }
        let file = File::create(path).map_err(open_err)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.write_record(HEADER)?;
        writer.flush()?;
        Ok(Self {
            writer,
            path: path.to_string(),
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn write_row(&mut self, row: &SummaryRow) -> Result<(), SinkError> {
        self.writer.serialize(row)?;
        self.writer.flush()?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), SinkError> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Spawns the task that owns the log sink. Write failures are logged and the row is dropped;
/// when every sender is gone the sink is flushed and the task exits.
pub fn spawn_log_writer(
    mut rows_rx: mpsc::Receiver<SummaryRow>,
    mut sink: CsvLogSink,
    rows_logged_total: Arc<AtomicU64>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(row) = rows_rx.recv().await {
            match sink.write_row(&row) {
                Ok(()) => {
                    rows_logged_total.fetch_add(1, Ordering::Relaxed);
                }
                Err(e) => {
                    tracing::warn!(error = %e, path = %sink.path(), "log writer: write failed");
                }
            }
        }
        if let Err(e) = sink.flush() {
            tracing::warn!(error = %e, "log writer: final flush failed");
        }
        tracing::debug!("Log writer shutting down");
    })
}
