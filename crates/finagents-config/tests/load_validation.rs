//! Integration tests for loading configuration files from disk: the shipped
//! config, format detection, input guards and validation reporting.
//!
//! Run with:
//! ```bash
//! cargo test -p finagents-config --test load_validation
//! ```

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use finagents_config::{load_config, ConfigError, ConfigFormat, MAX_CONFIG_FILE_SIZE};
use finagents_models::{AgentKind, LogLevel, PipelineConfig};
use tempfile::TempDir;

fn shipped_config() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config/config.yaml")
}

fn write_config(dir: &TempDir, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents).unwrap();
    path
}

/// The config file shipped with the repository loads cleanly and carries the
/// pipeline defaults.
#[test]
fn shipped_config_matches_defaults() {
    let config = load_config(&shipped_config()).unwrap();
    assert_eq!(config, PipelineConfig::default());
    assert_eq!(
        config.agents.indicator_calculator.column_labels(),
        vec!["SMA_5", "SMA_20", "RSI_14"]
    );
}

#[test]
fn overrides_flow_through_to_agent_settings() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        &dir,
        "config.yml",
        br#"
llm:
  local_model: "qwen2.5:14b"
agents:
  defaults:
    timeout_seconds: 20
  pattern_identifier:
    timeout_seconds: 90
    llm_model_id: "llama3.1:70b"
system:
  logging_level: debug
"#,
    );

    let config = load_config(&path).unwrap();
    assert_eq!(config.system.logging_level, LogLevel::Debug);
    assert_eq!(
        config.agent_settings(AgentKind::DataLoader).timeout,
        Duration::from_secs(20)
    );
    assert_eq!(
        config.agent_settings(AgentKind::PatternIdentifier).timeout,
        Duration::from_secs(90)
    );
    assert_eq!(
        config.effective_model(AgentKind::PatternIdentifier),
        Some("llama3.1:70b")
    );
    assert_eq!(
        config.effective_model(AgentKind::ReportSynthesizer),
        Some("qwen2.5:14b")
    );
}

#[test]
fn toml_files_are_detected_by_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        &dir,
        "finagents.toml",
        br#"
[agents.indicator_calculator]
sma_periods = [9, 21]
rsi_period = 9
"#,
    );

    let config = load_config(&path).unwrap();
    assert_eq!(
        config.agents.indicator_calculator.column_labels(),
        vec!["SMA_9", "SMA_21", "RSI_9"]
    );
}

#[test]
fn invalid_values_are_all_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        &dir,
        "config.yaml",
        br#"
data:
  raw_data_path: ""
agents:
  indicator_calculator:
    sma_periods: []
    rsi_period: 0
"#,
    );

    match load_config(&path) {
        Err(ConfigError::Invalid(issues)) => {
            let keys: Vec<&str> = issues.iter().map(|i| i.key.as_str()).collect();
            assert_eq!(
                keys,
                vec![
                    "data.raw_data_path",
                    "agents.indicator_calculator.sma_periods",
                    "agents.indicator_calculator.rsi_period",
                ]
            );
        }
        other => panic!("expected Invalid, got {other:?}"),
    }
}

#[test]
fn warnings_do_not_fail_the_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        &dir,
        "config.yaml",
        b"agents:\n  pattern_identifier:\n    lookback_days: 5\n",
    );

    let config = load_config(&path).unwrap();
    assert_eq!(config.agents.pattern_identifier.lookback_days, 5);
}

#[test]
fn unknown_logging_level_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "config.yaml", b"system:\n  logging_level: LOUD\n");

    let err = load_config(&path).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::Parse {
            format: ConfigFormat::Yaml,
            ..
        }
    ));
    assert!(err.to_string().contains("LOUD"));
}

#[test]
fn negative_timeout_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        &dir,
        "config.yaml",
        b"agents:\n  defaults:\n    timeout_seconds: -1\n",
    );

    assert!(matches!(
        load_config(&path),
        Err(ConfigError::Parse { .. })
    ));
}

#[test]
fn oversized_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let payload = vec![b'#'; MAX_CONFIG_FILE_SIZE as usize + 1];
    let path = write_config(&dir, "config.yaml", &payload);

    let err = load_config(&path).unwrap_err();
    assert!(matches!(err, ConfigError::TooLarge { limit, .. } if limit == MAX_CONFIG_FILE_SIZE));
}

/// A FIFO reports a length of zero, so the limit has to hold on the bytes
/// read rather than on file metadata.
#[cfg(unix)]
#[test]
fn oversized_pipe_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    let status = std::process::Command::new("mkfifo")
        .arg(&path)
        .status()
        .unwrap();
    assert!(status.success());

    let writer_path = path.clone();
    let writer = std::thread::spawn(move || {
        let mut fifo = std::fs::OpenOptions::new()
            .write(true)
            .open(&writer_path)
            .unwrap();
        let payload = vec![b'#'; 2 * MAX_CONFIG_FILE_SIZE as usize];
        // The reader stops early, so the tail of the write hits a closed pipe.
        let _ = fifo.write_all(&payload);
    });

    let err = load_config(&path).unwrap_err();
    assert!(matches!(err, ConfigError::TooLarge { .. }), "got {err:?}");
    writer.join().unwrap();
}

#[test]
fn non_utf8_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "config.yaml", &[0xFF, 0xFE, 0xFF]);

    assert!(matches!(load_config(&path), Err(ConfigError::Encoding(_))));
}

#[test]
fn empty_file_loads_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "config.yaml", b"");

    assert_eq!(load_config(&path).unwrap(), PipelineConfig::default());
}
