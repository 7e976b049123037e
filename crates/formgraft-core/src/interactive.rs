// Interactive prompts and CLI output

use crate::config::headline_budget;
use crate::model::{MergeConfig, PlaceholderKey};
use crate::values::PlaceholderValues;
use anyhow::Result;
use inquire::validator::Validation;
use inquire::{CustomUserError, Text};
use owo_colors::OwoColorize;
use std::io::IsTerminal;

/// Check if we should use interactive mode
pub fn is_interactive() -> bool {
    // Never be interactive in test environment or CI
    if is_test_env() || is_ci() {
        return false;
    }

    std::io::stdin().is_terminal()
}

fn is_ci() -> bool {
    std::env::var("CI").is_ok()
        || std::env::var("GITHUB_ACTIONS").is_ok()
        || std::env::var("GITLAB_CI").is_ok()
}

fn is_test_env() -> bool {
    if cfg!(test) {
        return true;
    }

    if std::env::var("FORMGRAFT_TEST").is_ok() {
        return true;
    }

    // Test harness threads are named after the test function
    if let Some(name) = std::thread::current().name() {
        if name.contains("test_") {
            return true;
        }
    }

    false
}

/// Prompt for text input
pub fn prompt_text(message: &str, default: Option<&str>) -> Result<String> {
    let mut prompt = Text::new(message);
    if let Some(def) = default {
        prompt = prompt.with_default(def);
    }
    Ok(prompt.prompt()?)
}

/// Prompt for one placeholder value. Headline prompts refuse input past the budget.
pub fn prompt_placeholder(placeholder: &PlaceholderKey, headline: bool) -> Result<String> {
    let budget = headline_budget();
    let message = format!("{} [{}]:", placeholder.label, placeholder.key);
    let help = format!("max {} characters", budget);
    let mut prompt = Text::new(&message);
    if headline {
        prompt = prompt
            .with_help_message(&help)
            .with_validator(move |input: &str| -> Result<Validation, CustomUserError> {
                let len = input.chars().count();
                if len <= budget {
                    Ok(Validation::Valid)
                } else {
                    Ok(Validation::Invalid(
                        format!("{} characters; the limit is {}", len, budget).into(),
                    ))
                }
            });
    }
    Ok(prompt.prompt()?)
}

/// Prompt for every configured key that has no value yet.
pub fn prompt_missing_values(values: &mut PlaceholderValues, config: &MergeConfig) -> Result<()> {
    for placeholder in &config.placeholder_keys {
        if values.contains_key(&placeholder.key) {
            continue;
        }
        let value = prompt_placeholder(placeholder, config.is_headline(&placeholder.key))?;
        values.insert(placeholder.key.clone(), value);
    }
    Ok(())
}

/// Print a header with decoration
pub fn print_header(text: &str) {
    println!();
    println!("{}", "━".repeat(60).bright_black());
    println!("{} {}", "▸".bright_cyan(), text.bright_cyan().bold());
    println!("{}", "━".repeat(60).bright_black());
    println!();
}

/// Print success message
pub fn print_success(text: &str) {
    println!("{} {}", "✓".bright_green(), text.green());
}

/// Print info message
pub fn print_info(text: &str) {
    println!("{} {}", "→".bright_blue(), text.bright_blue());
}

/// Print warning message
pub fn print_warning(text: &str) {
    println!("{} {}", "▸ ".bright_yellow(), text.yellow());
}

/// Print a list item
pub fn print_item(text: &str) {
    println!("   {} {}", "•".bright_black(), text);
}
