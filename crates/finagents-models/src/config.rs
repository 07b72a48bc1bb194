use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::agents::{AgentKind, AgentSettings, AgentsConfig};
use crate::log_level::LogLevel;

/// Top-level configuration for the analysis pipeline.
///
/// Every section is optional on input; anything left out falls back to the
/// values the pipeline has always shipped with.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PipelineConfig {
    pub data: DataConfig,
    pub llm: LlmConfig,
    pub agents: AgentsConfig,
    pub system: SystemConfig,
}

impl PipelineConfig {
    /// Effective resource settings for one agent (override, else `agents.defaults`).
    pub fn agent_settings(&self, kind: AgentKind) -> AgentSettings {
        self.agents.settings(kind)
    }

    /// Model an LLM-backed agent talks to. Falls back to `llm.local_model`.
    ///
    /// Returns `None` for agents that never call a model.
    pub fn effective_model(&self, kind: AgentKind) -> Option<&str> {
        let model = match kind {
            AgentKind::DataLoader | AgentKind::IndicatorCalculator => return None,
            AgentKind::PatternIdentifier => self.agents.pattern_identifier.llm_model.as_deref(),
            AgentKind::ReportSynthesizer => self.agents.report_synthesizer.llm_model.as_deref(),
        };
        Some(model.unwrap_or(self.llm.local_model.as_str()))
    }
}

/// Where the pipeline reads raw market data and writes intermediate output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DataConfig {
    /// CSV file with the raw OHLCV history.
    pub raw_data_path: String,
    /// Directory for processed frames.
    pub processed_data_path: String,
}

impl DataConfig {
    pub fn raw_data(&self) -> &Path {
        Path::new(&self.raw_data_path)
    }

    /// Path of `name` inside the processed data directory.
    pub fn processed_file(&self, name: &str) -> PathBuf {
        Path::new(&self.processed_data_path).join(name)
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            raw_data_path: "data/raw/nvda_data.csv".to_string(),
            processed_data_path: "data/processed/".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LlmConfig {
    /// Model id served by the local runtime (e.g. an Ollama tag).
    pub local_model: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            local_model: "llama3.1:8b".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SystemConfig {
    pub logging_level: LogLevel,
}
