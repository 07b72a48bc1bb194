use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};

use finagents_models::PipelineConfig;
use tracing::{debug, info, warn};

use crate::error::ConfigError;
use crate::format::{parse_config, ConfigFormat};
use crate::validate::validate;

/// Config path used when neither a flag nor `FINAGENTS_CONFIG` names one.
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
pub const CONFIG_PATH_ENV: &str = "FINAGENTS_CONFIG";

/// Largest config file accepted, in bytes.
pub const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

/// Pick the config path: explicit argument, then `FINAGENTS_CONFIG`, then
/// `config.yaml` in the working directory.
pub fn resolve_config_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    match std::env::var_os(CONFIG_PATH_ENV) {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => PathBuf::from(DEFAULT_CONFIG_PATH),
    }
}

/// Read, parse and validate a configuration file.
///
/// Warnings are logged and do not fail the load; any error-severity issue
/// returns [`ConfigError::Invalid`] listing every error found.
pub fn load_config(path: &Path) -> Result<PipelineConfig, ConfigError> {
    info!(path = %path.display(), "Loading configuration");

    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(ConfigError::NotFound(path.to_path_buf()))
        }
        Err(e) => return Err(e.into()),
    };

    // Pipes and special files report no usable length; bound the read itself.
    let mut bytes = Vec::new();
    file.take(MAX_CONFIG_FILE_SIZE + 1).read_to_end(&mut bytes)?;
    if bytes.len() as u64 > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::TooLarge {
            path: path.to_path_buf(),
            limit: MAX_CONFIG_FILE_SIZE,
        });
    }

    let text = String::from_utf8(bytes).map_err(|_| ConfigError::Encoding(path.to_path_buf()))?;

    let format = ConfigFormat::from_path(path);
    debug!(%format, bytes = text.len(), "Parsing configuration");
    let config = parse_config(&text, format)?;

    let (errors, warnings): (Vec<_>, Vec<_>) =
        validate(&config).into_iter().partition(|issue| issue.is_error());
    for issue in &warnings {
        warn!(key = %issue.key, "{}", issue.message);
    }
    if !errors.is_empty() {
        return Err(ConfigError::Invalid(errors));
    }

    info!(
        path = %path.display(),
        logging_level = %config.system.logging_level,
        model = %config.llm.local_model,
        "Configuration loaded"
    );
    Ok(config)
}
