use std::collections::HashSet;
use std::fmt;

use finagents_models::{AgentKind, PipelineConfig};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

/// A single problem found in a configuration, keyed by its dotted path.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ValidationIssue {
    pub key: String,
    pub message: String,
    pub severity: Severity,
}

impl ValidationIssue {
    fn error(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            message: message.into(),
            severity: Severity::Error,
        }
    }

    fn warning(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            message: message.into(),
            severity: Severity::Warning,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.message)
    }
}

/// Check every schema-level rule and return all issues found, in key order.
///
/// Type-level rules (integers are non-negative, `logging_level` is a known
/// level) are already enforced during deserialization.
pub fn validate(config: &PipelineConfig) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    require_text(&mut issues, "data.raw_data_path", &config.data.raw_data_path);
    require_text(
        &mut issues,
        "data.processed_data_path",
        &config.data.processed_data_path,
    );
    require_text(&mut issues, "llm.local_model", &config.llm.local_model);

    let agents = &config.agents;
    require_positive(
        &mut issues,
        "agents.defaults.timeout_seconds",
        agents.defaults.timeout_seconds,
    );
    require_positive(
        &mut issues,
        "agents.defaults.memory_limit_mb",
        agents.defaults.memory_limit_mb,
    );
    for kind in AgentKind::ALL {
        let overrides = agents.overrides(kind);
        if let Some(timeout) = overrides.timeout_seconds {
            require_positive(
                &mut issues,
                &format!("agents.{kind}.timeout_seconds"),
                timeout,
            );
        }
        if let Some(memory) = overrides.memory_limit_mb {
            require_positive(
                &mut issues,
                &format!("agents.{kind}.memory_limit_mb"),
                memory,
            );
        }
    }

    let calc = &agents.indicator_calculator;
    if calc.sma_periods.is_empty() {
        issues.push(ValidationIssue::error(
            "agents.indicator_calculator.sma_periods",
            "must list at least one period",
        ));
    }
    let mut seen = HashSet::new();
    for (index, period) in calc.sma_periods.iter().enumerate() {
        let key = format!("agents.indicator_calculator.sma_periods.{index}");
        if *period == 0 {
            issues.push(ValidationIssue::error(key, "must be greater than zero"));
        } else if !seen.insert(*period) {
            issues.push(ValidationIssue::error(
                key,
                format!("duplicate period {period}"),
            ));
        }
    }
    require_positive(
        &mut issues,
        "agents.indicator_calculator.rsi_period",
        calc.rsi_period.into(),
    );

    let patterns = &agents.pattern_identifier;
    require_model(
        &mut issues,
        "agents.pattern_identifier.llm_model",
        patterns.llm_model.as_deref(),
    );
    require_positive(
        &mut issues,
        "agents.pattern_identifier.llm_max_tokens",
        patterns.llm_max_tokens.into(),
    );
    require_positive(
        &mut issues,
        "agents.pattern_identifier.lookback_days",
        patterns.lookback_days.into(),
    );
    let warmup = calc.warmup_rows();
    if patterns.lookback_days > 0 && (patterns.lookback_days as usize) < warmup {
        issues.push(ValidationIssue::warning(
            "agents.pattern_identifier.lookback_days",
            format!(
                "{} days is shorter than the {warmup} rows the indicators need to warm up; \
                 early rows will have no values",
                patterns.lookback_days
            ),
        ));
    }

    let synth = &agents.report_synthesizer;
    require_model(
        &mut issues,
        "agents.report_synthesizer.llm_model",
        synth.llm_model.as_deref(),
    );
    require_positive(
        &mut issues,
        "agents.report_synthesizer.llm_max_tokens",
        synth.llm_max_tokens.into(),
    );

    issues
}

fn require_text(issues: &mut Vec<ValidationIssue>, key: &str, value: &str) {
    if value.trim().is_empty() {
        issues.push(ValidationIssue::error(key, "must not be empty"));
    }
}

fn require_positive(issues: &mut Vec<ValidationIssue>, key: &str, value: u64) {
    if value == 0 {
        issues.push(ValidationIssue::error(key, "must be greater than zero"));
    }
}

fn require_model(issues: &mut Vec<ValidationIssue>, key: &str, model: Option<&str>) {
    if let Some(model) = model {
        require_text(issues, key, model);
    }
}
