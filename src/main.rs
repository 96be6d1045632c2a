use anyhow::Result;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, watch};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;
use trafficwatch::*;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let app_config = config::AppConfig::load()?;
    tracing::info!("{}", version::banner());

    // Log file must be writable before capture starts.
    let log_sink = sink::CsvLogSink::open(&app_config.log.path)?;

    let local_provider = Arc::new(address_repo::SysinfoLocalAddresses);
    let local = address_repo::discover_local(local_provider.clone()).await;
    tracing::info!(local_addresses = ?local, "local addresses discovered");

    let resolver = address_repo::DnsResolver::new(Duration::from_millis(
        app_config.targets.resolve_timeout_ms,
    ));
    let mut target_resolver =
        address_repo::TargetResolver::new(resolver, app_config.targets.domains.clone());
    let initial = target_resolver.resolve_targets().await;
    if initial.addresses.is_empty() {
        tracing::warn!("no target addresses resolved at startup; nothing will match until a refresh succeeds");
    }
    let addresses = Arc::new(address_repo::AddressSets::new(initial.addresses, local));

    let refresh_handle = refresh_worker::spawn(
        target_resolver,
        local_provider,
        addresses.clone(),
        refresh_worker::RefreshWorkerConfig {
            ip_update_interval_secs: app_config.targets.ip_update_interval_secs,
            refresh_local_addresses: app_config.targets.refresh_local_addresses,
        },
    );

    let rows_logged_total = Arc::new(AtomicU64::new(0));
    let (rows_tx, rows_rx) = mpsc::channel(worker::SLICE_CHANNEL_CAPACITY);
    let writer_handle = sink::spawn_log_writer(rows_rx, log_sink, rows_logged_total.clone());

    let (batch_tx, batch_rx) = mpsc::channel(worker::SLICE_CHANNEL_CAPACITY);
    let window = Duration::from_secs(app_config.capture.update_interval_secs);
    let source = capture::PcapSource::new(
        app_config.capture.interface.clone(),
        app_config.capture.filter.clone(),
    );
    tracing::info!(interface = %source.interface(), "Starting packet capture");
    let _capture_handle = capture::spawn_capture_loop(source, window, batch_tx);

    let (summary_tx, _) = broadcast::channel(app_config.plotting.broadcast_capacity);
    let (history_tx, history_rx) = watch::channel(Vec::new());
    let ws_connections = Arc::new(AtomicUsize::new(0));
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

    let mut console = sink::ConsoleSink::stdout();
    if let Err(e) = console.write_header() {
        tracing::warn!(error = %e, "console header write failed");
    }

    let worker_handle = worker::spawn(
        worker::MonitorDeps {
            addresses: addresses.clone(),
            batch_rx,
            rows_tx,
            summary_tx: summary_tx.clone(),
            history_tx,
            console,
            ws_connections: ws_connections.clone(),
            slices_total: Arc::new(AtomicU64::new(0)),
            capture_errors_total: Arc::new(AtomicU64::new(0)),
            rows_logged_total,
            shutdown_rx,
        },
        worker::MonitorConfig {
            event_threshold: app_config.monitoring.event_threshold,
            history_length: app_config.monitoring.history_length,
            display: app_config.display.clone(),
            stats_log_interval_secs: app_config.monitoring.stats_log_interval_secs,
        },
    );

    let feed_handle = if app_config.plotting.enabled {
        let router = routes::app(
            summary_tx,
            history_rx,
            addresses,
            ws_connections,
            app_config.monitoring.history_length,
        );
        Some(routes::serve(router, &app_config.plotting.host, app_config.plotting.port).await?)
    } else {
        None
    };

    shutdown_signal().await;
    tracing::info!("Received shutdown signal");
    let _ = shutdown_tx.send(());
    let _ = worker_handle.await;
    // the worker owned the last row sender; the writer drains and flushes
    let _ = writer_handle.await;
    refresh_handle.abort();
    if let Some(h) = feed_handle {
        h.abort();
    }
    tracing::info!("Packet capturing stopped by user");
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(s) => s,
                Err(_) => {
                    let _ = tokio::signal::ctrl_c().await;
                    return;
                }
            };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
