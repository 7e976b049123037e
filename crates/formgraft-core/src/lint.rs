// Template checks: is the template shaped the way the merge expects?

use crate::dom::{
    attr, find_all_within, find_first_within, has_class, is_element, is_input_of_type, Document,
};
use crate::model::MergeConfig;
use crate::stages::placeholders::placeholder_token;
use anyhow::Result;
use owo_colors::OwoColorize;
use regex::Regex;

#[derive(Debug, Clone)]
pub struct LintIssue {
    pub severity: Severity,
    pub code: String,
    pub message: String,
    pub suggestion: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

#[derive(Debug, Default)]
pub struct LintResult {
    pub issues: Vec<LintIssue>,
}

impl LintResult {
    pub fn new() -> Self {
        Self { issues: Vec::new() }
    }

    fn add(&mut self, severity: Severity, code: &str, message: String, suggestion: Option<String>) {
        self.issues.push(LintIssue {
            severity,
            code: code.to_string(),
            message,
            suggestion,
        });
    }

    pub fn error_count(&self) -> usize {
        self.issues.iter().filter(|i| i.severity == Severity::Error).count()
    }

    pub fn warning_count(&self) -> usize {
        self.issues.iter().filter(|i| i.severity == Severity::Warning).count()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn has_code(&self, code: &str) -> bool {
        self.issues.iter().any(|i| i.code == code)
    }

    pub fn print(&self, file: &str) {
        for issue in self.issues.iter().filter(|i| i.severity == Severity::Info) {
            println!("  {} {}", "•".bright_black(), issue.message.bright_white());
        }
        println!();

        if self.error_count() == 0 && self.warning_count() == 0 {
            println!("{} {}", "✓".bright_green(), "All checks passed!".green().bold());
            return;
        }

        for issue in &self.issues {
            let (bullet, message) = match issue.severity {
                Severity::Error => (
                    "•".bright_red().to_string(),
                    issue.message.red().to_string(),
                ),
                Severity::Warning => (
                    "•".bright_yellow().to_string(),
                    issue.message.yellow().to_string(),
                ),
                Severity::Info => continue,
            };
            println!(
                "  {} {} {}",
                bullet,
                file.bright_white(),
                format!("[{}]", issue.code).bright_black()
            );
            println!("    {}", message);
            if let Some(ref suggestion) = issue.suggestion {
                println!("    {} {}", "→".bright_blue(), suggestion.bright_blue());
            }
            println!();
        }

        println!("{}", "─".repeat(60).bright_black());
        let summary = format!(
            "Found {} errors, {} warnings",
            self.error_count(),
            self.warning_count()
        );
        if self.has_errors() {
            println!("{}", summary.red());
        } else {
            println!("{}", summary.yellow());
        }
    }
}

/// Check template markup against the merge configuration.
pub fn check_template(html: &str, config: &MergeConfig) -> Result<LintResult> {
    let mut result = LintResult::new();
    let doc = Document::parse(html);

    match doc.find_first(|h| is_element(h, "form") && has_class(h, &config.form_class)) {
        Some(form) => {
            let radios = find_all_within(&form, |h| is_input_of_type(h, "radio")).len();
            let labels = find_all_within(&form, |h| {
                is_element(h, "label") && has_class(h, &config.radio_label_class)
            })
            .len();
            result.add(
                Severity::Info,
                "radio-slots",
                format!(
                    "form.{}: {} radio inputs, {} option labels",
                    config.form_class, radios, labels
                ),
                None,
            );
            if radios == 0 {
                result.add(
                    Severity::Warning,
                    "no-radios",
                    "Target form has no radio inputs; radio options will not be transplanted"
                        .to_string(),
                    None,
                );
            } else if radios != labels {
                result.add(
                    Severity::Warning,
                    "radio-label-count",
                    format!(
                        "{} radio inputs but {} labels with class '{}'",
                        radios, labels, config.radio_label_class
                    ),
                    Some("Only the first min(inputs, labels) options can be filled".to_string()),
                );
            }

            let answer = find_first_within(&form, |h| {
                is_element(h, "textarea")
                    && attr(h, "name").as_deref() == Some(config.answer_field.as_str())
            });
            if answer.is_none() {
                result.add(
                    Severity::Warning,
                    "no-answer-field",
                    format!(
                        "No <textarea name=\"{}\"> inside the target form",
                        config.answer_field
                    ),
                    None,
                );
            }
        }
        None => result.add(
            Severity::Error,
            "no-target-form",
            format!("No <form class=\"{}\"> found", config.form_class),
            Some(
                "Set selectors.formClass in formgraft.toml to the template's form class"
                    .to_string(),
            ),
        ),
    }

    let mut present = 0;
    for key in config.keys() {
        let count = html.matches(placeholder_token(key).as_str()).count();
        if count == 0 {
            result.add(
                Severity::Warning,
                "missing-token",
                format!("Token {} does not appear in the template", placeholder_token(key)),
                None,
            );
        } else {
            present += 1;
        }
    }
    result.add(
        Severity::Info,
        "tokens",
        format!("{} of {} placeholder tokens present", present, config.placeholder_keys.len()),
        None,
    );

    let token_pattern = Regex::new(r"【REPLACE:\s*([^】]*)】")?;
    let mut unknown: Vec<String> = token_pattern
        .captures_iter(html)
        .map(|cap| cap[1].to_string())
        .filter(|key| !config.is_known_key(key))
        .collect();
    unknown.sort();
    unknown.dedup();
    for key in unknown {
        result.add(
            Severity::Error,
            "unknown-token",
            format!(
                "Token 【REPLACE: {}】 has no configured key and will remain in the output",
                key
            ),
            Some("Add the key to placeholders.keys or fix its spelling".to_string()),
        );
    }

    Ok(result)
}
