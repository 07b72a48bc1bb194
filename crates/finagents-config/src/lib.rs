//! Loading and validation for the pipeline configuration file.
//!
//! ```rust,no_run
//! use finagents_config::{load_config, resolve_config_path};
//! use finagents_models::AgentKind;
//!
//! let path = resolve_config_path(None);
//! let config = load_config(&path)?;
//! let settings = config.agent_settings(AgentKind::PatternIdentifier);
//! println!("pattern identifier timeout: {:?}", settings.timeout);
//! # Ok::<(), finagents_config::ConfigError>(())
//! ```

pub mod error;
pub mod format;
pub mod loader;
pub mod lookup;
pub mod validate;

pub use error::ConfigError;
pub use format::{parse_config, render, ConfigFormat, OutputFormat};
pub use loader::{
    load_config, resolve_config_path, CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH, MAX_CONFIG_FILE_SIZE,
};
pub use lookup::lookup;
pub use validate::{validate, Severity, ValidationIssue};
