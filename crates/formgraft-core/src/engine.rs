// Form Merge Engine: runs the five stages in fixed order over two documents

use crate::dom::Document;
use crate::error::MergeError;
use crate::model::MergeConfig;
use crate::stages::fields::{rename_answer_field, FieldRename};
use crate::stages::form::{transplant_form_attributes, FormTransplant};
use crate::stages::placeholders::substitute_placeholders;
use crate::stages::radios::{reconcile_radios, RadioOutcome};
use crate::stages::scripts::migrate_scripts;
use crate::values::PlaceholderValues;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// What each stage did during one merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeReport {
    pub scripts_migrated: usize,
    /// Tokens replaced per key, for keys that had a value
    pub replacements: BTreeMap<String, usize>,
    pub form: FormTransplant,
    pub radios: RadioOutcome,
    pub field: FieldRename,
}

impl MergeReport {
    /// Human-readable notes for every step that was skipped or partial.
    pub fn warnings(&self) -> Vec<String> {
        let mut out = Vec::new();

        for (key, count) in &self.replacements {
            if *count == 0 {
                out.push(format!("no 【REPLACE: {}】 token in template; value unused", key));
            }
        }

        match &self.form {
            FormTransplant::MissingTemplateForm => {
                out.push("template has no target form; form attributes not copied".to_string())
            }
            FormTransplant::MissingSourceForm => {
                out.push("second document has no <form>; form attributes not copied".to_string())
            }
            FormTransplant::Applied(_) => {}
        }

        if self.radios.is_mismatched() {
            out.push(format!(
                "radio options differ: second document has {}, template has {}; paired {}",
                self.radios.source_options(),
                self.radios.template_slots(),
                self.radios.paired
            ));
        }

        match &self.field {
            FieldRename::MissingTextarea => {
                out.push("template answer textarea not found; field not renamed".to_string())
            }
            FieldRename::MissingSourceInput => out.push(
                "second document has no named text input; field not renamed".to_string(),
            ),
            FieldRename::Renamed { .. } => {}
        }

        out
    }
}

pub struct MergeOutcome {
    pub document: Document,
    pub report: MergeReport,
}

impl MergeOutcome {
    pub fn to_pretty_html(&self) -> String {
        self.document.to_pretty_html()
    }
}

pub struct FormMergeEngine {
    config: MergeConfig,
}

impl FormMergeEngine {
    pub fn new(config: MergeConfig) -> Self {
        Self { config }
    }

    /// Run every stage over `template`, using `source` as read-only material.
    ///
    /// Structural gaps in either document are recorded in the report and never
    /// fail the merge; only serialization errors and a strict-mode radio
    /// mismatch do.
    pub fn merge(
        &self,
        template: Document,
        source: &Document,
        values: &PlaceholderValues,
    ) -> Result<MergeOutcome, MergeError> {
        let cfg = &self.config;

        let (template, scripts_migrated) = migrate_scripts(template, source);
        debug!(scripts_migrated, "script migration done");

        let (template, replacements) = substitute_placeholders(template, cfg.keys(), values)?;
        debug!(keys = replacements.len(), "placeholder substitution done");

        let (template, form) = transplant_form_attributes(template, source, &cfg.form_class);
        debug!(?form, "form attribute transplant done");

        let (template, radios) = reconcile_radios(
            template,
            source,
            &cfg.form_class,
            &cfg.radio_label_class,
            cfg.radio_pairing,
        )?;
        if radios.is_mismatched() {
            warn!(
                source = radios.source_options(),
                template = radios.template_slots(),
                paired = radios.paired,
                "radio option counts differ"
            );
        }

        let (template, field) =
            rename_answer_field(template, source, &cfg.form_class, &cfg.answer_field);
        debug!(?field, "field renaming done");

        Ok(MergeOutcome {
            document: template,
            report: MergeReport {
                scripts_migrated,
                replacements,
                form,
                radios,
                field,
            },
        })
    }

    /// Parse both sources and merge them.
    pub fn merge_html(
        &self,
        template_html: &str,
        source_html: &str,
        values: &PlaceholderValues,
    ) -> Result<MergeOutcome, MergeError> {
        let source = Document::parse(source_html);
        self.merge(Document::parse(template_html), &source, values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PairingMode;

    const TEMPLATE: &str = r#"<!DOCTYPE html>
<html><head><title>【REPLACE: Page Title】</title></head>
<body>
<form class="userSurvey__form" action="/tpl">
<input type="radio" id="a"><label class="userSurvey__form-list-label01">A</label>
<textarea name="answers[QUESTION_2_ID]"></textarea>
</form>
</body></html>"#;

    #[test]
    fn test_report_collects_every_stage() {
        let engine = FormMergeEngine::new(MergeConfig::default());
        let source = r#"<script>s()</script><form action="/live">
<input type="radio" id="x" name="q" value="1"><label>X</label>
<input type="text" name="answers[Q2]"></form>"#;
        let mut values = PlaceholderValues::new();
        values.insert("Page Title".to_string(), "Title".to_string());
        values.insert("Deadline year".to_string(), "2025".to_string());

        let outcome = engine.merge_html(TEMPLATE, source, &values).unwrap();
        let report = &outcome.report;

        assert_eq!(report.scripts_migrated, 1);
        assert_eq!(report.replacements["Page Title"], 1);
        assert_eq!(report.replacements["Deadline year"], 0);
        assert_eq!(report.form, FormTransplant::Applied(vec!["action".to_string()]));
        assert_eq!(report.radios.paired, 1);
        assert!(matches!(report.field, FieldRename::Renamed { .. }));

        let warnings = report.warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Deadline year"));
    }

    #[test]
    fn test_empty_source_only_warns() {
        let engine = FormMergeEngine::new(MergeConfig::default());
        let outcome = engine
            .merge_html(TEMPLATE, "", &PlaceholderValues::new())
            .unwrap();
        let warnings = outcome.report.warnings();
        assert_eq!(warnings.len(), 3);
        assert!(outcome.to_pretty_html().contains("【REPLACE: Page Title】"));
    }

    #[test]
    fn test_strict_mode_propagates_mismatch() {
        let engine = FormMergeEngine::new(MergeConfig::default().with_pairing(PairingMode::Strict));
        let result = engine.merge_html(TEMPLATE, "<form></form>", &PlaceholderValues::new());
        assert!(matches!(result, Err(MergeError::RadioCountMismatch { .. })));
    }
}
