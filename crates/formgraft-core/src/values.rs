// Collect placeholder values from files and KEY=VALUE flags, and enforce the
// headline budget before anything reaches the merge engine

use crate::config::headline_budget;
use crate::model::MergeConfig;
use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Placeholder key to replacement text.
pub type PlaceholderValues = BTreeMap<String, String>;

/// A headline value that was cut down to the budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Truncation {
    pub key: String,
    pub original_len: usize,
    pub kept: String,
}

/// Load a flat key/value file. Format is picked by extension:
/// `.toml`, `.yaml`/`.yml` or `.json`.
pub fn load_values_file(path: &Path) -> Result<PlaceholderValues> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read values file: {}", path.display()))?;

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let parsed: Value = match ext.as_str() {
        "toml" => toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML values: {}", path.display()))?,
        "yaml" | "yml" => serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse YAML values: {}", path.display()))?,
        "json" => serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON values: {}", path.display()))?,
        _ => anyhow::bail!(
            "Unsupported values file '{}'. Use .toml, .yaml, .yml or .json",
            path.display()
        ),
    };

    values_from_json(&parsed).with_context(|| format!("Invalid values file: {}", path.display()))
}

fn values_from_json(parsed: &Value) -> Result<PlaceholderValues> {
    let Some(obj) = parsed.as_object() else {
        anyhow::bail!("Expected a table of placeholder keys to values");
    };

    let mut values = PlaceholderValues::new();
    for (key, value) in obj {
        let text = match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Null => String::new(),
            _ => {
                anyhow::bail!(
                    "Value for '{}' has unsupported type (expected string, number, or boolean)",
                    key
                );
            }
        };
        values.insert(key.clone(), text);
    }
    Ok(values)
}

/// Parse repeated `KEY=VALUE` arguments. Splits on the first `=`, so values
/// may themselves contain `=`.
pub fn parse_assignments(args: &[String]) -> Result<PlaceholderValues> {
    let mut values = PlaceholderValues::new();
    for arg in args {
        if let Some((key, value)) = arg.split_once('=') {
            values.insert(key.trim().to_string(), value.to_string());
        } else {
            anyhow::bail!("Invalid value format '{}'. Expected KEY=VALUE", arg);
        }
    }
    Ok(values)
}

/// Reject keys the configuration does not know about.
pub fn validate_keys(values: &PlaceholderValues, config: &MergeConfig) -> Result<()> {
    let unknown: Vec<&str> = values
        .keys()
        .map(String::as_str)
        .filter(|k| !config.is_known_key(k))
        .collect();

    if !unknown.is_empty() {
        anyhow::bail!(
            "Unknown placeholder keys: {}. Valid keys: {}",
            unknown.join(", "),
            config.keys().collect::<Vec<_>>().join(", ")
        );
    }
    Ok(())
}

/// Keys the configuration declares that have no value yet.
pub fn missing_keys<'a>(values: &PlaceholderValues, config: &'a MergeConfig) -> Vec<&'a str> {
    config.keys().filter(|k| !values.contains_key(*k)).collect()
}

/// First `limit` codepoints of `s`.
pub fn truncate_chars(s: &str, limit: usize) -> String {
    s.chars().take(limit).collect()
}

/// Cut every headline value longer than the budget down to exactly the
/// budget, returning what was cut.
pub fn enforce_headline_budget(
    values: &mut PlaceholderValues,
    config: &MergeConfig,
) -> Vec<Truncation> {
    let budget = headline_budget();
    let mut truncated = Vec::new();

    for (key, value) in values.iter_mut() {
        if !config.is_headline(key) {
            continue;
        }
        let len = value.chars().count();
        if len > budget {
            *value = truncate_chars(value, budget);
            truncated.push(Truncation {
                key: key.clone(),
                original_len: len,
                kept: value.clone(),
            });
        }
    }

    truncated
}
