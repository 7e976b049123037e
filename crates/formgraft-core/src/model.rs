use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One config file as written on disk. Every section and field is optional so
/// user, project and local files can each override a subset.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PartialProjectConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paths: Option<PartialPaths>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selectors: Option<PartialSelectors>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholders: Option<PartialPlaceholders>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reconcile: Option<PartialReconcile>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PartialPaths {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(rename = "outputDir", skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PartialSelectors {
    #[serde(rename = "formClass", skip_serializing_if = "Option::is_none")]
    pub form_class: Option<String>,
    #[serde(rename = "radioLabelClass", skip_serializing_if = "Option::is_none")]
    pub radio_label_class: Option<String>,
    #[serde(rename = "answerField", skip_serializing_if = "Option::is_none")]
    pub answer_field: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PartialPlaceholders {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keys: Option<Vec<String>>,
    #[serde(rename = "headlineKeys", skip_serializing_if = "Option::is_none")]
    pub headline_keys: Option<Vec<String>>,
    /// Prompt labels keyed by placeholder key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PartialReconcile {
    #[serde(rename = "radioPairing", skip_serializing_if = "Option::is_none")]
    pub radio_pairing: Option<PairingMode>,
}

/// How radio options are paired when the two documents disagree on count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PairingMode {
    /// Pair up to the shortest list, report the mismatch as a warning.
    #[default]
    Lenient,
    /// Refuse to merge when the option counts differ.
    Strict,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderKey {
    pub key: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    pub template: String,
    pub output_dir: String,
}

/// Everything the merge engine needs to know about the shape of the
/// template. Built once, never mutated during a merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeConfig {
    pub placeholder_keys: Vec<PlaceholderKey>,
    pub headline_keys: Vec<String>,
    pub form_class: String,
    pub radio_label_class: String,
    pub answer_field: String,
    pub radio_pairing: PairingMode,
}

/// Fully resolved configuration after precedence merging.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectConfig {
    pub paths: Paths,
    pub merge: MergeConfig,
}
