use std::fmt;
use std::path::Path;

use finagents_models::PipelineConfig;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// On-disk syntax of a configuration file.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConfigFormat {
    #[default]
    Yaml,
    Toml,
}

impl ConfigFormat {
    /// Pick the format from the file extension. Anything that is not
    /// `.toml` is read as YAML.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("toml") => ConfigFormat::Toml,
            _ => ConfigFormat::Yaml,
        }
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigFormat::Yaml => f.write_str("YAML"),
            ConfigFormat::Toml => f.write_str("TOML"),
        }
    }
}

/// Output syntax for [`render`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
    Toml,
}

/// Deserialize a configuration document. Missing keys take their defaults.
///
/// No validation happens here; see [`crate::validate`].
pub fn parse_config(text: &str, format: ConfigFormat) -> Result<PipelineConfig, ConfigError> {
    if is_blank_document(text) || (format == ConfigFormat::Yaml && is_null_document(text)) {
        return Ok(PipelineConfig::default());
    }
    let parsed: Result<PipelineConfig, String> = match format {
        ConfigFormat::Yaml => serde_yaml::from_str(text).map_err(|e| e.to_string()),
        ConfigFormat::Toml => toml::from_str(text).map_err(|e| e.to_string()),
    };
    parsed.map_err(|message| ConfigError::Parse { format, message })
}

/// Serialize a configuration with every default filled in.
pub fn render(config: &PipelineConfig, format: OutputFormat) -> Result<String, ConfigError> {
    match format {
        OutputFormat::Yaml => {
            serde_yaml::to_string(config).map_err(|e| ConfigError::Render(e.to_string()))
        }
        OutputFormat::Json => {
            serde_json::to_string_pretty(config).map_err(|e| ConfigError::Render(e.to_string()))
        }
        OutputFormat::Toml => {
            toml::to_string(config).map_err(|e| ConfigError::Render(e.to_string()))
        }
    }
}

// Lines that carry data: comments and YAML document markers removed.
fn content_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().filter_map(|line| {
        let line = line.trim();
        let line = line.strip_prefix("---").unwrap_or(line).trim();
        (!line.is_empty() && !line.starts_with('#') && line != "...").then_some(line)
    })
}

fn is_blank_document(text: &str) -> bool {
    content_lines(text).next().is_none()
}

// A YAML document holding only a null scalar (`~`, `null`).
fn is_null_document(text: &str) -> bool {
    let mut content = content_lines(text);
    match (content.next(), content.next()) {
        (Some(only), None) => matches!(
            only.split(" #").next().unwrap_or(only).trim(),
            "~" | "null" | "Null" | "NULL"
        ),
        _ => false,
    }
}
