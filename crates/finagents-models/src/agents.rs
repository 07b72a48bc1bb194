use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// The four pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    DataLoader,
    IndicatorCalculator,
    PatternIdentifier,
    ReportSynthesizer,
}

impl AgentKind {
    pub const ALL: [AgentKind; 4] = [
        AgentKind::DataLoader,
        AgentKind::IndicatorCalculator,
        AgentKind::PatternIdentifier,
        AgentKind::ReportSynthesizer,
    ];

    /// Key of this agent's section under `agents`.
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentKind::DataLoader => "data_loader",
            AgentKind::IndicatorCalculator => "indicator_calculator",
            AgentKind::PatternIdentifier => "pattern_identifier",
            AgentKind::ReportSynthesizer => "report_synthesizer",
        }
    }

    /// 1-based position in the pipeline.
    pub fn stage(&self) -> u8 {
        match self {
            AgentKind::DataLoader => 1,
            AgentKind::IndicatorCalculator => 2,
            AgentKind::PatternIdentifier => 3,
            AgentKind::ReportSynthesizer => 4,
        }
    }

    pub fn uses_llm(&self) -> bool {
        matches!(
            self,
            AgentKind::PatternIdentifier | AgentKind::ReportSynthesizer
        )
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AgentKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown agent: {s}"))
    }
}

/// Configuration for all agents: shared defaults plus one section per stage.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AgentsConfig {
    pub defaults: AgentDefaults,
    pub data_loader: DataLoaderConfig,
    pub indicator_calculator: IndicatorCalculatorConfig,
    pub pattern_identifier: PatternIdentifierConfig,
    pub report_synthesizer: ReportSynthesizerConfig,
}

impl AgentsConfig {
    /// Per-agent resource overrides as declared in the agent's own section.
    pub fn overrides(&self, kind: AgentKind) -> ResourceOverrides {
        match kind {
            AgentKind::DataLoader => self.data_loader.resources,
            AgentKind::IndicatorCalculator => self.indicator_calculator.resources,
            AgentKind::PatternIdentifier => self.pattern_identifier.resources,
            AgentKind::ReportSynthesizer => self.report_synthesizer.resources,
        }
    }

    /// Resolve effective settings: the agent's override wins, else `defaults`.
    pub fn settings(&self, kind: AgentKind) -> AgentSettings {
        let overrides = self.overrides(kind);
        AgentSettings {
            timeout: Duration::from_secs(
                overrides
                    .timeout_seconds
                    .unwrap_or(self.defaults.timeout_seconds),
            ),
            memory_limit_mb: overrides
                .memory_limit_mb
                .unwrap_or(self.defaults.memory_limit_mb),
        }
    }
}

/// Limits applied to every agent that does not override them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AgentDefaults {
    pub timeout_seconds: u64,
    pub memory_limit_mb: u64,
}

impl Default for AgentDefaults {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            memory_limit_mb: 512,
        }
    }
}

/// Optional per-agent replacements for [`AgentDefaults`], flattened into
/// each agent's section.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ResourceOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_limit_mb: Option<u64>,
}

/// Resolved limits for a single agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentSettings {
    pub timeout: Duration,
    pub memory_limit_mb: u64,
}

/// Agent 1: reads the raw CSV and normalizes types.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DataLoaderConfig {
    /// Parse the `Date` column and reject rows that fail.
    pub validate_dates: bool,
    #[serde(flatten)]
    pub resources: ResourceOverrides,
}

impl Default for DataLoaderConfig {
    fn default() -> Self {
        Self {
            validate_dates: true,
            resources: ResourceOverrides::default(),
        }
    }
}

/// Agent 2: appends moving averages and RSI to the loaded frame.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct IndicatorCalculatorConfig {
    /// SMA window lengths, in the order their columns are appended.
    pub sma_periods: Vec<u32>,
    pub rsi_period: u32,
    #[serde(flatten)]
    pub resources: ResourceOverrides,
}

impl IndicatorCalculatorConfig {
    /// Column names the calculator appends: `SMA_<n>` per period, then `RSI_<n>`.
    pub fn column_labels(&self) -> Vec<String> {
        self.sma_periods
            .iter()
            .map(|period| format!("SMA_{period}"))
            .chain(std::iter::once(format!("RSI_{}", self.rsi_period)))
            .collect()
    }

    /// Rows of history needed before every configured indicator has a value.
    ///
    /// RSI needs one extra row because it works on price differences.
    pub fn warmup_rows(&self) -> usize {
        let longest_sma = self.sma_periods.iter().copied().max().unwrap_or(0) as usize;
        let rsi = self.rsi_period as usize + 1;
        longest_sma.max(rsi)
    }
}

impl Default for IndicatorCalculatorConfig {
    fn default() -> Self {
        Self {
            sma_periods: vec![5, 20],
            rsi_period: 14,
            resources: ResourceOverrides::default(),
        }
    }
}

/// Agent 3: asks the local LLM to read signals from recent indicator rows.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PatternIdentifierConfig {
    #[serde(alias = "llm_model_id", skip_serializing_if = "Option::is_none")]
    pub llm_model: Option<String>,
    pub llm_max_tokens: u32,
    /// Pause between consecutive model calls.
    pub llm_cooldown_seconds: u64,
    /// How many trailing days of data go into the prompt.
    #[serde(alias = "analysis_period_days")]
    pub lookback_days: u32,
    #[serde(flatten)]
    pub resources: ResourceOverrides,
}

impl PatternIdentifierConfig {
    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.llm_cooldown_seconds)
    }
}

impl Default for PatternIdentifierConfig {
    fn default() -> Self {
        Self {
            llm_model: None,
            llm_max_tokens: 2048,
            llm_cooldown_seconds: 1,
            lookback_days: 30,
            resources: ResourceOverrides::default(),
        }
    }
}

/// Agent 4: turns the identified patterns into the final report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ReportSynthesizerConfig {
    #[serde(alias = "llm_model_id", skip_serializing_if = "Option::is_none")]
    pub llm_model: Option<String>,
    pub llm_max_tokens: u32,
    pub llm_cooldown_seconds: u64,
    #[serde(flatten)]
    pub resources: ResourceOverrides,
}

impl ReportSynthesizerConfig {
    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.llm_cooldown_seconds)
    }
}

impl Default for ReportSynthesizerConfig {
    fn default() -> Self {
        Self {
            llm_model: None,
            llm_max_tokens: 4096,
            llm_cooldown_seconds: 1,
            resources: ResourceOverrides::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agent_kind_names_are_stable() {
        let names: Vec<&str> = AgentKind::ALL.iter().map(AgentKind::as_str).collect();
        assert_eq!(
            names,
            vec![
                "data_loader",
                "indicator_calculator",
                "pattern_identifier",
                "report_synthesizer"
            ]
        );
        assert_eq!(
            "pattern_identifier".parse::<AgentKind>().unwrap(),
            AgentKind::PatternIdentifier
        );
        assert!("risk_manager".parse::<AgentKind>().is_err());
        assert_eq!(
            serde_json::to_string(&AgentKind::ReportSynthesizer).unwrap(),
            "\"report_synthesizer\""
        );
    }

    #[test]
    fn stages_follow_pipeline_order() {
        let stages: Vec<u8> = AgentKind::ALL.iter().map(AgentKind::stage).collect();
        assert_eq!(stages, vec![1, 2, 3, 4]);
        assert!(!AgentKind::DataLoader.uses_llm());
        assert!(AgentKind::ReportSynthesizer.uses_llm());
    }

    #[test]
    fn settings_inherit_defaults() {
        let agents = AgentsConfig::default();
        for kind in AgentKind::ALL {
            let settings = agents.settings(kind);
            assert_eq!(settings.timeout, Duration::from_secs(30));
            assert_eq!(settings.memory_limit_mb, 512);
        }
    }

    #[test]
    fn override_wins_over_defaults() {
        let yaml = r#"
defaults:
  timeout_seconds: 30
  memory_limit_mb: 512
report_synthesizer:
  timeout_seconds: 120
pattern_identifier:
  memory_limit_mb: 2048
"#;
        let agents: AgentsConfig = serde_yaml::from_str(yaml).unwrap();

        let synth = agents.settings(AgentKind::ReportSynthesizer);
        assert_eq!(synth.timeout, Duration::from_secs(120));
        assert_eq!(synth.memory_limit_mb, 512);

        let patterns = agents.settings(AgentKind::PatternIdentifier);
        assert_eq!(patterns.timeout, Duration::from_secs(30));
        assert_eq!(patterns.memory_limit_mb, 2048);
    }

    #[test]
    fn overrides_sit_beside_agent_keys() {
        let yaml = r#"
indicator_calculator:
  sma_periods: [10]
  timeout_seconds: 5
  memory_limit_mb: 64
"#;
        let agents: AgentsConfig = serde_yaml::from_str(yaml).unwrap();
        let calc = &agents.indicator_calculator;
        assert_eq!(calc.sma_periods, vec![10]);
        assert_eq!(
            calc.resources,
            ResourceOverrides {
                timeout_seconds: Some(5),
                memory_limit_mb: Some(64),
            }
        );

        let json = serde_json::to_value(calc).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "sma_periods": [10],
                "rsi_period": 14,
                "timeout_seconds": 5,
                "memory_limit_mb": 64
            })
        );
    }

    #[test]
    fn legacy_pattern_keys_are_accepted() {
        let yaml = r#"
pattern_identifier:
  llm_model_id: "llama3.1:8b-instruct"
  analysis_period_days: 60
"#;
        let agents: AgentsConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(agents.pattern_identifier.lookback_days, 60);
        assert_eq!(
            agents.pattern_identifier.llm_model.as_deref(),
            Some("llama3.1:8b-instruct")
        );
    }

    #[test]
    fn default_column_labels() {
        let calc = IndicatorCalculatorConfig::default();
        assert_eq!(calc.column_labels(), vec!["SMA_5", "SMA_20", "RSI_14"]);
    }

    #[test]
    fn column_labels_keep_declared_order() {
        let calc = IndicatorCalculatorConfig {
            sma_periods: vec![50, 10],
            rsi_period: 7,
            ..Default::default()
        };
        assert_eq!(calc.column_labels(), vec!["SMA_50", "SMA_10", "RSI_7"]);
    }

    #[test]
    fn warmup_covers_longest_indicator() {
        assert_eq!(IndicatorCalculatorConfig::default().warmup_rows(), 20);

        let rsi_heavy = IndicatorCalculatorConfig {
            sma_periods: vec![5],
            rsi_period: 14,
            ..Default::default()
        };
        assert_eq!(rsi_heavy.warmup_rows(), 15);
    }

    #[test]
    fn overrides_are_omitted_when_unset() {
        let json = serde_json::to_value(DataLoaderConfig::default()).unwrap();
        assert_eq!(json, serde_json::json!({ "validate_dates": true }));
    }

    #[test]
    fn cooldowns_convert_to_durations() {
        assert_eq!(
            PatternIdentifierConfig::default().cooldown(),
            Duration::from_secs(1)
        );
        let synth = ReportSynthesizerConfig {
            llm_cooldown_seconds: 0,
            ..Default::default()
        };
        assert_eq!(synth.cooldown(), Duration::ZERO);
    }
}
