use capshare_core::{init_logging_from_config, logging_status, HostConfig};

#[test]
fn configured_log_dir_starts_file_logging_once() {
    let root = tempfile::tempdir().expect("temp dir");
    let log_dir = root.path().join("logs");
    let config = HostConfig {
        log_level: "debug",
        log_dir: Some(log_dir.clone()),
        ..HostConfig::default()
    };

    assert!(logging_status().is_none());
    assert_eq!(init_logging_from_config(&config), Ok(true));
    assert!(log_dir.is_dir());

    let (level, active_dir) = logging_status().expect("logging active");
    assert_eq!(level, "debug");
    assert_eq!(active_dir, log_dir);

    assert_eq!(init_logging_from_config(&config), Ok(true));

    let louder = HostConfig {
        log_level: "info",
        ..config.clone()
    };
    let err = init_logging_from_config(&louder).expect_err("level switch rejected");
    assert!(err.contains("refusing to switch"));

    assert_eq!(init_logging_from_config(&HostConfig::default()), Ok(false));
    assert_eq!(logging_status().map(|(level, _)| level), Some("debug"));
}
