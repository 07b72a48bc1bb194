//! finagents - configuration front end for the financial-analysis agent pipeline
//!
//! Loads, validates and inspects the single YAML document that drives the
//! data loader, indicator calculator, pattern identifier and report
//! synthesizer agents.
//!
//! # Library Usage
//!
//! ```rust,no_run
//! use finagents::config::{load_config, resolve_config_path};
//! use finagents::models::{AgentKind, PipelineConfig};
//! ```

pub use finagents_config as config;
pub use finagents_models as models;

use std::fs;
use std::path::Path;

use anyhow::{bail, Context};
use finagents_config::{lookup, render, OutputFormat};
use finagents_models::{AgentKind, LogLevel, PipelineConfig};
use serde::Serialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `RUST_LOG` wins when set; otherwise the
/// configured `system.logging_level` applies.
pub fn init_tracing(level: LogLevel) {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(level.level_filter()))
        .with_writer(std::io::stderr)
        .init();
}

/// Subscriber used while the config itself is being read, before the
/// configured level is known. `RUST_LOG` still wins over `default`.
pub fn bootstrap_subscriber(default: LevelFilter) -> impl tracing::Subscriber + Send + Sync {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(default))
        .with_writer(std::io::stderr)
        .finish()
}

fn env_filter(default: LevelFilter) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(default.into())
        .from_env_lossy()
}

/// One row of `finagents agents`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AgentRow {
    pub stage: u8,
    pub agent: AgentKind,
    pub timeout_seconds: u64,
    pub memory_limit_mb: u64,
    pub model: Option<String>,
}

/// Effective settings for every agent, in pipeline order.
pub fn agent_table(config: &PipelineConfig) -> Vec<AgentRow> {
    AgentKind::ALL
        .into_iter()
        .map(|kind| {
            let settings = config.agent_settings(kind);
            AgentRow {
                stage: kind.stage(),
                agent: kind,
                timeout_seconds: settings.timeout.as_secs(),
                memory_limit_mb: settings.memory_limit_mb,
                model: config.effective_model(kind).map(str::to_string),
            }
        })
        .collect()
}

/// Plain-text rendering of [`agent_table`].
pub fn format_agent_table(rows: &[AgentRow]) -> String {
    let mut out = format!(
        "{:<5} {:<22} {:>9} {:>11}  {}\n",
        "STAGE", "AGENT", "TIMEOUT", "MEMORY", "MODEL"
    );
    for row in rows {
        out.push_str(&format!(
            "{:<5} {:<22} {:>8}s {:>8} MB  {}\n",
            row.stage,
            row.agent.as_str(),
            row.timeout_seconds,
            row.memory_limit_mb,
            row.model.as_deref().unwrap_or("-"),
        ));
    }
    out
}

/// Value at a dotted key path, or an error naming the missing key.
pub fn get_value(config: &PipelineConfig, key: &str) -> anyhow::Result<serde_json::Value> {
    match lookup(config, key) {
        Some(value) => Ok(value),
        None => bail!("Key not found: {key}"),
    }
}

/// Write the default configuration as YAML. Refuses to replace an existing
/// file unless `force` is set.
pub fn write_default_config(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let body = render(&PipelineConfig::default(), OutputFormat::Yaml)?;
    let contents = format!("# Finance agents configuration.\n{body}");
    fs::write(path, contents).with_context(|| format!("Failed to write: {}", path.display()))?;

    tracing::info!(path = %path.display(), "Wrote default configuration");
    Ok(())
}
