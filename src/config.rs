use crate::sink::ADDRESS_CELL_WIDTH;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub capture: CaptureConfig,
    pub targets: TargetsConfig,
    #[serde(default)]
    pub monitoring: MonitoringConfig,
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub plotting: PlottingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CaptureConfig {
    #[serde(default = "default_interface")]
    pub interface: String,
    /// Slice duration; each capture call blocks for at most this long.
    #[serde(default = "default_update_interval_secs")]
    pub update_interval_secs: u64,
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            interface: default_interface(),
            update_interval_secs: default_update_interval_secs(),
            filter: default_filter(),
        }
    }
}

fn default_interface() -> String {
    "en2".into()
}

fn default_update_interval_secs() -> u64 {
    1
}

fn default_filter() -> String {
    "ip or ip6".into()
}

#[derive(Debug, Clone, Deserialize)]
pub struct TargetsConfig {
    /// Hostnames identifying the monitored application.
    pub domains: Vec<String>,
    #[serde(default = "default_ip_update_interval_secs")]
    pub ip_update_interval_secs: u64,
    #[serde(default = "default_resolve_timeout_ms")]
    pub resolve_timeout_ms: u64,
    /// Re-discover the host's own addresses on every target refresh.
    #[serde(default)]
    pub refresh_local_addresses: bool,
}

fn default_ip_update_interval_secs() -> u64 {
    3600
}

fn default_resolve_timeout_ms() -> u64 {
    5000
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitoringConfig {
    #[serde(default = "default_event_threshold")]
    pub event_threshold: u64,
    /// Number of slices kept in the rolling history.
    #[serde(default = "default_history_length")]
    pub history_length: usize,
    /// How often to log app stats (slices, capture errors, rows logged) at INFO level.
    #[serde(default = "default_stats_log_interval_secs")]
    pub stats_log_interval_secs: u64,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            event_threshold: default_event_threshold(),
            history_length: default_history_length(),
            stats_log_interval_secs: default_stats_log_interval_secs(),
        }
    }
}

fn default_event_threshold() -> u64 {
    3
}

fn default_history_length() -> usize {
    60
}

fn default_stats_log_interval_secs() -> u64 {
    60
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_path")]
    pub path: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            path: default_log_path(),
        }
    }
}

fn default_log_path() -> String {
    "traffic_log.csv".into()
}

#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    /// Addresses shown per cell before ",...".
    #[serde(default = "default_max_ips")]
    pub max_ips: usize,
    /// Characters per cell, including a trailing "..." when cut.
    #[serde(default = "default_max_length")]
    pub max_length: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            max_ips: default_max_ips(),
            max_length: default_max_length(),
        }
    }
}

fn default_max_ips() -> usize {
    2
}

fn default_max_length() -> usize {
    25
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlottingConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_plotting_host")]
    pub host: String,
    #[serde(default = "default_plotting_port")]
    pub port: u16,
    /// Max number of summaries kept in the broadcast channel for /ws/traffic (slow clients may lag).
    #[serde(default = "default_broadcast_capacity")]
    pub broadcast_capacity: usize,
}

impl Default for PlottingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            host: default_plotting_host(),
            port: default_plotting_port(),
            broadcast_capacity: default_broadcast_capacity(),
        }
    }
}

fn default_plotting_host() -> String {
    "127.0.0.1".into()
}

fn default_plotting_port() -> u16 {
    8090
}

fn default_broadcast_capacity() -> usize {
    60
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("reading config {}: {}", path, e))?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            !self.targets.domains.is_empty(),
            "targets.domains must list at least one domain"
        );
        anyhow::ensure!(
            self.targets.domains.iter().all(|d| !d.trim().is_empty()),
            "targets.domains must not contain blank entries"
        );
        anyhow::ensure!(
            self.targets.ip_update_interval_secs > 0,
            "targets.ip_update_interval_secs must be > 0, got {}",
            self.targets.ip_update_interval_secs
        );
        anyhow::ensure!(
            self.targets.resolve_timeout_ms > 0,
            "targets.resolve_timeout_ms must be > 0, got {}",
            self.targets.resolve_timeout_ms
        );
        anyhow::ensure!(
            !self.capture.interface.trim().is_empty(),
            "capture.interface must be non-empty"
        );
        anyhow::ensure!(
            self.capture.update_interval_secs > 0,
            "capture.update_interval_secs must be > 0, got {}",
            self.capture.update_interval_secs
        );
        anyhow::ensure!(
            self.monitoring.event_threshold > 0,
            "monitoring.event_threshold must be > 0, got {}",
            self.monitoring.event_threshold
        );
        anyhow::ensure!(
            self.monitoring.history_length > 0,
            "monitoring.history_length must be > 0, got {}",
            self.monitoring.history_length
        );
        anyhow::ensure!(
            self.monitoring.stats_log_interval_secs > 0,
            "monitoring.stats_log_interval_secs must be > 0, got {}",
            self.monitoring.stats_log_interval_secs
        );
        anyhow::ensure!(!self.log.path.trim().is_empty(), "log.path must be non-empty");
        anyhow::ensure!(
            self.display.max_ips > 0,
            "display.max_ips must be > 0, got {}",
            self.display.max_ips
        );
        anyhow::ensure!(
            (4..=ADDRESS_CELL_WIDTH).contains(&self.display.max_length),
            "display.max_length must be between 4 and {}, got {}",
            ADDRESS_CELL_WIDTH,
            self.display.max_length
        );
        if self.plotting.enabled {
            anyhow::ensure!(
                self.plotting.port > 0,
                "plotting.port must be between 1 and 65535, got {}",
                self.plotting.port
            );
        }
        anyhow::ensure!(
            self.plotting.broadcast_capacity > 0,
            "plotting.broadcast_capacity must be > 0, got {}",
            self.plotting.broadcast_capacity
        );
        Ok(())
    }
}
