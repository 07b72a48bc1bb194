use std::path::PathBuf;

use thiserror::Error;

use crate::format::ConfigFormat;
use crate::validate::ValidationIssue;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config file {} exceeds size limit of {limit} bytes", .path.display())]
    TooLarge { path: PathBuf, limit: u64 },

    #[error("Config file {} is not valid UTF-8", .0.display())]
    Encoding(PathBuf),

    #[error("{format} parse error: {message}")]
    Parse {
        format: ConfigFormat,
        message: String,
    },

    #[error("Invalid configuration: {}", summarize(.0))]
    Invalid(Vec<ValidationIssue>),

    #[error("Render error: {0}")]
    Render(String),
}

fn summarize(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
