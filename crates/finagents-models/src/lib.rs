pub mod agents;
pub mod config;
pub mod log_level;

pub use agents::{
    AgentDefaults, AgentKind, AgentSettings, AgentsConfig, DataLoaderConfig,
    IndicatorCalculatorConfig, PatternIdentifierConfig, ReportSynthesizerConfig,
    ResourceOverrides,
};
pub use config::{DataConfig, LlmConfig, PipelineConfig, SystemConfig};
pub use log_level::LogLevel;
