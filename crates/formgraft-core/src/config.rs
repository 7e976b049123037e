use crate::model::{
    MergeConfig, PairingMode, PartialProjectConfig, Paths, PlaceholderKey, ProjectConfig,
};
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub const PROJECT_CONFIG_FILE: &str = "formgraft.toml";
pub const LOCAL_CONFIG_FILE: &str = "formgraft.local.toml";

/// Headline values may not be longer (in codepoints) than this string.
pub const HEADLINE_REFERENCE: &str = "描き下ろしイラスト使用アクリルスタンドが";

const DEFAULT_TEMPLATE: &str = "template.html";
const DEFAULT_OUTPUT_DIR: &str = ".";
const DEFAULT_FORM_CLASS: &str = "userSurvey__form";
const DEFAULT_RADIO_LABEL_CLASS: &str = "userSurvey__form-list-label01";
const DEFAULT_ANSWER_FIELD: &str = "answers[QUESTION_2_ID]";

const DEFAULT_PLACEHOLDERS: &[(&str, &str)] = &[
    ("Page Title", "ページタイトル"),
    ("Canonical URL", "カノニカルURL"),
    ("Meta Description", "メタディスクリプション"),
    ("OG Description", "OGディスクリプション"),
    ("Head Line1", "ヘッドライン1"),
    ("Head Line2", "ヘッドライン2"),
    ("Head Line3", "ヘッドライン3"),
    ("Deadline year", "締切年"),
    ("Deadline month", "締切月"),
    ("Deadline day", "締切日"),
    ("Deadline weekday", "締切曜日"),
    ("Deliver date", "発送予定日"),
    ("Extract year", "抽出年"),
    ("Extract month", "抽出月"),
    ("Extract day", "抽出日"),
    ("Extract weekday", "抽出曜日"),
];

const DEFAULT_HEADLINE_KEYS: &[&str] = &["Head Line1", "Head Line2", "Head Line3"];

/// Character budget for headline fields, counted in Unicode codepoints.
pub fn headline_budget() -> usize {
    HEADLINE_REFERENCE.chars().count()
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            placeholder_keys: DEFAULT_PLACEHOLDERS
                .iter()
                .map(|(key, label)| PlaceholderKey {
                    key: key.to_string(),
                    label: label.to_string(),
                })
                .collect(),
            headline_keys: DEFAULT_HEADLINE_KEYS.iter().map(|k| k.to_string()).collect(),
            form_class: DEFAULT_FORM_CLASS.to_string(),
            radio_label_class: DEFAULT_RADIO_LABEL_CLASS.to_string(),
            answer_field: DEFAULT_ANSWER_FIELD.to_string(),
            radio_pairing: PairingMode::default(),
        }
    }
}

impl MergeConfig {
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.placeholder_keys.iter().map(|p| p.key.as_str())
    }

    pub fn is_known_key(&self, key: &str) -> bool {
        self.keys().any(|k| k == key)
    }

    pub fn is_headline(&self, key: &str) -> bool {
        self.headline_keys.iter().any(|k| k == key)
    }

    pub fn with_pairing(mut self, mode: PairingMode) -> Self {
        self.radio_pairing = mode;
        self
    }
}

impl Default for Paths {
    fn default() -> Self {
        Self {
            template: DEFAULT_TEMPLATE.to_string(),
            output_dir: DEFAULT_OUTPUT_DIR.to_string(),
        }
    }
}

/// Load config with precedence:
/// 1. User config (~/.formgraft/config.toml) - lowest priority
/// 2. Project config (formgraft.toml in `base_dir`)
/// 3. Local config (formgraft.local.toml in `base_dir`) - highest priority
///
/// All files are optional; missing fields fall back to built-in defaults.
pub fn load_config_with_precedence(base_dir: &Path) -> Result<ProjectConfig> {
    let mut configs = Vec::new();

    // 1. Try user config
    if let Some(home_dir) = dirs::home_dir() {
        let user_config = home_dir.join(".formgraft/config.toml");
        if user_config.exists() {
            match load_single_config(&user_config) {
                Ok(cfg) => configs.push(cfg),
                Err(e) => eprintln!("Warning: Failed to load user config: {:#}", e),
            }
        }
    }

    // 2. Project config; a broken project file is an error, not a warning
    let project_config = base_dir.join(PROJECT_CONFIG_FILE);
    if project_config.exists() {
        configs.push(load_single_config(&project_config)?);
    }

    // 3. Try local config
    let local_config = base_dir.join(LOCAL_CONFIG_FILE);
    if local_config.exists() {
        match load_single_config(&local_config) {
            Ok(cfg) => configs.push(cfg),
            Err(e) => eprintln!("Warning: Failed to load local config: {:#}", e),
        }
    }

    Ok(merge_configs(configs))
}

fn load_single_config(path: &Path) -> Result<PartialProjectConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    let config: PartialProjectConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.display()))?;
    Ok(config)
}

/// Merge partial configs field by field over the defaults.
pub(crate) fn merge_configs(configs: Vec<PartialProjectConfig>) -> ProjectConfig {
    let mut resolved = ProjectConfig::default();
    let mut labels: BTreeMap<String, String> = resolved
        .merge
        .placeholder_keys
        .iter()
        .map(|p| (p.key.clone(), p.label.clone()))
        .collect();
    let mut keys: Vec<String> = resolved.merge.keys().map(str::to_string).collect();

    for cfg in configs {
        if let Some(paths) = cfg.paths {
            if let Some(template) = paths.template {
                resolved.paths.template = template;
            }
            if let Some(output_dir) = paths.output_dir {
                resolved.paths.output_dir = output_dir;
            }
        }

        if let Some(selectors) = cfg.selectors {
            if let Some(form_class) = selectors.form_class {
                resolved.merge.form_class = form_class;
            }
            if let Some(label_class) = selectors.radio_label_class {
                resolved.merge.radio_label_class = label_class;
            }
            if let Some(answer_field) = selectors.answer_field {
                resolved.merge.answer_field = answer_field;
            }
        }

        if let Some(placeholders) = cfg.placeholders {
            if let Some(new_keys) = placeholders.keys {
                keys = new_keys;
            }
            if let Some(headline_keys) = placeholders.headline_keys {
                resolved.merge.headline_keys = headline_keys;
            }
            // Labels merge key by key
            if let Some(new_labels) = placeholders.labels {
                labels.extend(new_labels);
            }
        }

        if let Some(reconcile) = cfg.reconcile {
            if let Some(mode) = reconcile.radio_pairing {
                resolved.merge.radio_pairing = mode;
            }
        }
    }

    resolved.merge.placeholder_keys = keys
        .into_iter()
        .map(|key| {
            let label = labels.get(&key).cloned().unwrap_or_else(|| key.clone());
            PlaceholderKey { key, label }
        })
        .collect();

    resolved
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headline_budget_counts_codepoints() {
        assert_eq!(headline_budget(), 20);
        assert!(HEADLINE_REFERENCE.len() > headline_budget());
    }

    #[test]
    fn test_defaults_have_sixteen_keys() {
        let cfg = MergeConfig::default();
        assert_eq!(cfg.placeholder_keys.len(), 16);
        assert!(cfg.is_known_key("Deadline weekday"));
        assert!(cfg.is_headline("Head Line2"));
        assert!(!cfg.is_headline("Page Title"));
        assert_eq!(cfg.radio_pairing, PairingMode::Lenient);
        assert_eq!(cfg.placeholder_keys[0].label, "ページタイトル");
        assert_eq!(cfg.placeholder_keys[15].label, "抽出曜日");
    }

    #[test]
    fn test_merge_overrides_field_by_field() {
        let base: PartialProjectConfig = toml::from_str(
            r#"
[paths]
template = "base.html"
outputDir = "out"

[selectors]
formClass = "survey"
"#,
        )
        .unwrap();
        let local: PartialProjectConfig = toml::from_str(
            r#"
[paths]
template = "local.html"

[reconcile]
radioPairing = "strict"
"#,
        )
        .unwrap();

        let cfg = merge_configs(vec![base, local]);
        assert_eq!(cfg.paths.template, "local.html");
        assert_eq!(cfg.paths.output_dir, "out");
        assert_eq!(cfg.merge.form_class, "survey");
        assert_eq!(cfg.merge.radio_label_class, DEFAULT_RADIO_LABEL_CLASS);
        assert_eq!(cfg.merge.radio_pairing, PairingMode::Strict);
    }

    #[test]
    fn test_custom_keys_fall_back_to_key_as_label() {
        let partial: PartialProjectConfig = toml::from_str(
            r#"
[placeholders]
keys = ["Page Title", "Campaign"]

[placeholders.labels]
Campaign = "Campaign name"
"#,
        )
        .unwrap();

        let cfg = merge_configs(vec![partial]);
        let keys: Vec<_> = cfg.merge.placeholder_keys.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(keys, vec!["ページタイトル", "Campaign name"]);
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let parsed: Result<PartialProjectConfig, _> =
            toml::from_str("[paths]\ntemplates = \"x\"\n");
        assert!(parsed.is_err());
    }
}
