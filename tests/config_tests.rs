// Config loading and validation tests

use trafficwatch::config::AppConfig;

const VALID_CONFIG: &str = r#"
[capture]
interface = "eth0"
update_interval_secs = 1
filter = "ip or ip6"

[targets]
domains = ["whatsapp.com", "web.whatsapp.com", "wa.me"]
ip_update_interval_secs = 3600

[monitoring]
event_threshold = 3
history_length = 60
stats_log_interval_secs = 60

[log]
path = "logs/traffic.csv"

[display]
max_ips = 2
max_length = 25

[plotting]
enabled = true
host = "127.0.0.1"
port = 8090
broadcast_capacity = 60
"#;

const MINIMAL_CONFIG: &str = r#"
[targets]
domains = ["whatsapp.net"]
"#;

#[test]
fn test_config_loads_from_str() {
    let config = AppConfig::load_from_str(VALID_CONFIG).expect("load_from_str");
    assert_eq!(config.capture.interface, "eth0");
    assert_eq!(config.targets.domains.len(), 3);
    assert_eq!(config.monitoring.event_threshold, 3);
    assert_eq!(config.log.path, "logs/traffic.csv");
    assert!(config.plotting.enabled);
    assert_eq!(config.plotting.port, 8090);
}

#[test]
fn test_config_defaults_when_sections_omitted() {
    let config = AppConfig::load_from_str(MINIMAL_CONFIG).expect("minimal");
    assert_eq!(config.capture.interface, "en2");
    assert_eq!(config.capture.update_interval_secs, 1);
    assert_eq!(config.capture.filter, "ip or ip6");
    assert_eq!(config.targets.ip_update_interval_secs, 3600);
    assert_eq!(config.targets.resolve_timeout_ms, 5000);
    assert!(!config.targets.refresh_local_addresses);
    assert_eq!(config.monitoring.history_length, 60);
    assert_eq!(config.monitoring.event_threshold, 3);
    assert_eq!(config.log.path, "traffic_log.csv");
    assert_eq!(config.display.max_ips, 2);
    assert_eq!(config.display.max_length, 25);
    assert!(!config.plotting.enabled);
}

#[test]
fn test_config_requires_targets_section() {
    let err = AppConfig::load_from_str("[capture]\ninterface = \"eth0\"\n").unwrap_err();
    assert!(err.to_string().contains("targets"));
}

#[test]
fn test_config_validation_rejects_empty_domains() {
    let err = AppConfig::load_from_str("[targets]\ndomains = []\n").unwrap_err();
    assert!(err.to_string().contains("targets.domains"));
}

#[test]
fn test_config_validation_rejects_blank_domain() {
    let bad = VALID_CONFIG.replace("\"wa.me\"", "\"  \"");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("targets.domains"));
}

#[test]
fn test_config_validation_rejects_update_interval_zero() {
    let bad = VALID_CONFIG.replace("update_interval_secs = 1", "update_interval_secs = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("capture.update_interval_secs"));
}

#[test]
fn test_config_validation_rejects_ip_update_interval_zero() {
    let bad = VALID_CONFIG.replace(
        "ip_update_interval_secs = 3600",
        "ip_update_interval_secs = 0",
    );
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("ip_update_interval_secs"));
}

#[test]
fn test_config_validation_rejects_blank_interface() {
    let bad = VALID_CONFIG.replace("interface = \"eth0\"", "interface = \"\"");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("capture.interface"));
}

#[test]
fn test_config_validation_rejects_history_length_zero() {
    let bad = VALID_CONFIG.replace("history_length = 60", "history_length = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("history_length"));
}

#[test]
fn test_config_validation_rejects_event_threshold_zero() {
    let bad = VALID_CONFIG.replace("event_threshold = 3", "event_threshold = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("event_threshold"));
}

#[test]
fn test_config_validation_rejects_empty_log_path() {
    let bad = VALID_CONFIG.replace("path = \"logs/traffic.csv\"", "path = \"\"");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("log.path"));
}

#[test]
fn test_config_validation_rejects_max_ips_zero() {
    let bad = VALID_CONFIG.replace("max_ips = 2", "max_ips = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("max_ips"));
}

#[test]
fn test_config_validation_rejects_max_length_too_small() {
    let bad = VALID_CONFIG.replace("max_length = 25", "max_length = 3");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("max_length"));
}

#[test]
fn test_config_validation_rejects_max_length_wider_than_console_column() {
    let bad = VALID_CONFIG.replace("max_length = 25", "max_length = 26");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("display.max_length"));
    let ok = VALID_CONFIG.replace("max_length = 25", "max_length = 4");
    assert!(AppConfig::load_from_str(&ok).is_ok());
}

#[test]
fn test_config_validation_rejects_port_zero_when_plotting() {
    let bad = VALID_CONFIG.replace("port = 8090", "port = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("plotting.port"));
}

#[test]
fn test_config_port_zero_ignored_when_plotting_disabled() {
    let cfg = VALID_CONFIG
        .replace("port = 8090", "port = 0")
        .replace("enabled = true", "enabled = false");
    assert!(AppConfig::load_from_str(&cfg).is_ok());
}

#[test]
fn test_config_validation_rejects_broadcast_capacity_zero() {
    let bad = VALID_CONFIG.replace("broadcast_capacity = 60", "broadcast_capacity = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("broadcast_capacity"));
}

#[test]
fn test_config_validation_rejects_invalid_toml() {
    let err = AppConfig::load_from_str("not valid toml [[[").unwrap_err();
    assert!(!err.to_string().is_empty());
}

#[test]
fn test_config_load_from_file_via_env() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, VALID_CONFIG).unwrap();
    unsafe { std::env::set_var("CONFIG_FILE", path.to_str().unwrap()) };
    let result = AppConfig::load();
    unsafe { std::env::remove_var("CONFIG_FILE") };
    let config = result.expect("load from CONFIG_FILE");
    assert_eq!(config.capture.interface, "eth0");
    assert_eq!(config.targets.domains[0], "whatsapp.com");
}
