//! Reading and writing record files.
//!
//! YAML is the native format; `.json` files (e.g. saved LLM suggestions) are read as JSON.
//! Whatever is read goes through [`normalize`] before anyone else sees it.

use crate::error::{CoreError, CoreResult};
use crate::normalizer::normalize;
use crate::record::ReportRecord;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Load and normalize a record file.
pub fn load_record(path: &Path) -> CoreResult<ReportRecord> {
    let text = fs::read_to_string(path)?;
    let raw = parse_raw_record(&text, is_json_path(path))?;
    debug!(path = %path.display(), "record loaded");
    Ok(normalize(&raw))
}

/// Parse record text into the raw value the normalizer consumes.
///
/// An empty document is an empty record; a document that is not a mapping is rejected.
pub fn parse_raw_record(text: &str, json: bool) -> CoreResult<Value> {
    let raw: Value = if json {
        serde_json::from_str(text)?
    } else {
        serde_yaml::from_str::<Option<serde_yaml::Value>>(text)?
            .map(yaml_to_json)
            .unwrap_or(Value::Null)
    };
    match raw {
        Value::Null => Ok(Value::Object(Default::default())),
        Value::Object(_) => Ok(raw),
        other => Err(CoreError::UnsupportedInput(format!(
            "expected a mapping at the top level, found {}",
            kind_of(&other)
        ))),
    }
}

/// Write the canonical record as YAML, creating parent directories.
pub fn save_record(path: &Path, record: &ReportRecord) -> CoreResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let yaml = serde_yaml::to_string(record)?;
    fs::write(path, yaml)?;
    Ok(())
}

/// YAML allows non-string keys (`0: {task: ...}`); JSON maps need strings.
fn yaml_to_json(value: serde_yaml::Value) -> Value {
    use serde_yaml::Value as Yaml;
    match value {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(b),
        Yaml::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map(Value::Number)
                    .unwrap_or_else(|| Value::String(n.to_string()))
            }
        }
        Yaml::String(s) => Value::String(s),
        Yaml::Sequence(items) => Value::Array(items.into_iter().map(yaml_to_json).collect()),
        Yaml::Mapping(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (yaml_key(k), yaml_to_json(v)))
                .collect(),
        ),
        Yaml::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}

fn yaml_key(key: serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s,
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Null => String::new(),
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
    }
}

fn is_json_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}
