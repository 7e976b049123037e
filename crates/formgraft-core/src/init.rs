// Scaffold a starter formgraft.toml and values file

use crate::config::PROJECT_CONFIG_FILE;
use crate::model::{
    MergeConfig, PartialPaths, PartialPlaceholders, PartialProjectConfig, PartialReconcile,
    PartialSelectors, Paths,
};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub const VALUES_FILE: &str = "values.toml";

/// Config file content spelling out every default.
pub fn default_config_toml() -> Result<String> {
    let merge = MergeConfig::default();
    let paths = Paths::default();
    let partial = PartialProjectConfig {
        paths: Some(PartialPaths {
            template: Some(paths.template),
            output_dir: Some(paths.output_dir),
        }),
        selectors: Some(PartialSelectors {
            form_class: Some(merge.form_class.clone()),
            radio_label_class: Some(merge.radio_label_class.clone()),
            answer_field: Some(merge.answer_field.clone()),
        }),
        placeholders: Some(PartialPlaceholders {
            keys: Some(merge.keys().map(str::to_string).collect()),
            headline_keys: Some(merge.headline_keys.clone()),
            labels: Some(
                merge
                    .placeholder_keys
                    .iter()
                    .map(|p| (p.key.clone(), p.label.clone()))
                    .collect(),
            ),
        }),
        reconcile: Some(PartialReconcile {
            radio_pairing: Some(merge.radio_pairing),
        }),
    };
    toml::to_string_pretty(&partial).context("Failed to serialize default config")
}

/// Values file with an empty entry for every configured key.
pub fn values_template(config: &MergeConfig) -> String {
    let mut out = String::from("# Placeholder values for `formgraft merge --values values.toml`\n");
    for placeholder in &config.placeholder_keys {
        out.push_str(&format!("\n# {}\n", placeholder.label));
        out.push_str(&format!("{:?} = \"\"\n", placeholder.key));
    }
    out
}

/// Write the starter files into `dir`. Existing files are only replaced with `force`.
pub fn init_project(dir: &Path, force: bool) -> Result<Vec<PathBuf>> {
    let config_path = dir.join(PROJECT_CONFIG_FILE);
    let values_path = dir.join(VALUES_FILE);

    if !force {
        for path in [&config_path, &values_path] {
            if path.exists() {
                anyhow::bail!(
                    "{} already exists.\n\nUse --force to overwrite.",
                    path.display()
                );
            }
        }
    }

    fs::write(&config_path, default_config_toml()?)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    fs::write(&values_path, values_template(&MergeConfig::default()))
        .with_context(|| format!("Failed to write {}", values_path.display()))?;

    Ok(vec![config_path, values_path])
}
