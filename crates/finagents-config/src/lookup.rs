use finagents_models::PipelineConfig;
use serde_json::Value;

/// Resolve a dotted key path (`agents.defaults.timeout_seconds`) against the
/// serialized configuration. Numeric segments index into sequences, so
/// `agents.indicator_calculator.sma_periods.0` is the first period.
///
/// An empty path returns the whole document. Unset optional keys resolve to
/// `None`, as do paths that do not exist.
pub fn lookup(config: &PipelineConfig, key: &str) -> Option<Value> {
    let root = serde_json::to_value(config).ok()?;
    let key = key.trim();
    if key.is_empty() {
        return Some(root);
    }
    root.pointer(&to_pointer(key)).cloned()
}

fn to_pointer(key: &str) -> String {
    key.split('.')
        .map(|segment| segment.replace('~', "~0").replace('/', "~1"))
        .fold(String::new(), |mut pointer, segment| {
            pointer.push('/');
            pointer.push_str(&segment);
            pointer
        })
}
