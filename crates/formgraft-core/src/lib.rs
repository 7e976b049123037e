pub mod config;
pub mod model;
pub mod dom;
pub mod error;
pub mod stages;
pub mod values;
pub mod encoding;
pub mod engine;
pub mod output;
pub mod init;
pub mod interactive;
pub mod lint;

pub use dom::Document;
pub use engine::{FormMergeEngine, MergeOutcome, MergeReport};
pub use error::MergeError;
pub use model::{MergeConfig, PairingMode, ProjectConfig};
pub use values::PlaceholderValues;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use stages::fields::FieldRename;
use stages::form::FormTransplant;
use std::path::{Path, PathBuf};
use values::Truncation;

/// Options for `formgraft merge`. Paths left as `None` come from config.
#[derive(Debug, Clone, Default)]
pub struct MergeOptions {
    pub template: Option<PathBuf>,
    pub source: Option<PathBuf>,
    pub values_file: Option<PathBuf>,
    /// Raw `KEY=VALUE` arguments, applied after the values file
    pub assignments: Vec<String>,
    pub out_dir: Option<PathBuf>,
    pub strict: bool,
    pub interactive: bool,
    pub dry_run: bool,
}

/// Merge already-decoded HTML and write the result into `out_dir`.
///
/// This is the whole engine contract in one call: parse, run the stages,
/// pretty-print and write `output_<timestamp>.html`. On success the written
/// path and the merge report are returned; on failure nothing is written.
pub fn generate_output(
    engine: &FormMergeEngine,
    template_html: &str,
    source_html: &str,
    values: &PlaceholderValues,
    out_dir: &Path,
    timestamp: NaiveDateTime,
) -> std::result::Result<(PathBuf, MergeReport), MergeError> {
    let outcome = engine.merge_html(template_html, source_html, values)?;
    let html = outcome.to_pretty_html();
    let path = output::write_output(out_dir, &html, timestamp)?;
    Ok((path, outcome.report))
}

/// Gather placeholder values from the values file, `--set` flags and, when
/// asked for, interactive prompts. Headline values over budget are cut.
pub fn collect_values(
    options: &MergeOptions,
    config: &MergeConfig,
) -> Result<(PlaceholderValues, Vec<Truncation>)> {
    let mut values = match &options.values_file {
        Some(path) => values::load_values_file(path)?,
        None => PlaceholderValues::new(),
    };
    values.extend(values::parse_assignments(&options.assignments)?);
    values::validate_keys(&values, config)?;

    if options.interactive {
        if interactive::is_interactive() {
            interactive::prompt_missing_values(&mut values, config)?;
        } else {
            interactive::print_warning("--interactive ignored: stdin is not a terminal");
        }
    }

    let truncated = values::enforce_headline_budget(&mut values, config);
    Ok((values, truncated))
}

fn resolve_source(options: &MergeOptions) -> Result<PathBuf> {
    if let Some(source) = &options.source {
        return Ok(source.clone());
    }
    if options.interactive && interactive::is_interactive() {
        let answer = interactive::prompt_text("Second HTML document:", None)?;
        let answer = answer.trim();
        if !answer.is_empty() {
            return Ok(PathBuf::from(answer));
        }
    }
    Err(MergeError::MissingSource.into())
}

/// Run the full merge pipeline from the command line
pub fn cmd_merge(options: MergeOptions) -> Result<()> {
    use owo_colors::OwoColorize;

    // No source means nothing to do; fail before touching any file
    let source_path = resolve_source(&options)?;

    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let project = config::load_config_with_precedence(&cwd)?;
    let mut merge_config = project.merge;
    if options.strict {
        merge_config = merge_config.with_pairing(PairingMode::Strict);
    }

    let template_path = options
        .template
        .clone()
        .unwrap_or_else(|| PathBuf::from(&project.paths.template));
    let out_dir = options
        .out_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(&project.paths.output_dir));

    let (values, truncated) = collect_values(&options, &merge_config)?;
    for cut in &truncated {
        warn_line(
            options.dry_run,
            &format!(
                "{} truncated from {} to {} characters: {}",
                cut.key,
                cut.original_len,
                config::headline_budget(),
                cut.kept
            ),
        );
    }

    let unset = values::missing_keys(&values, &merge_config);
    if !unset.is_empty() {
        let message = format!(
            "No value for {}; their tokens stay in place",
            unset.join(", ")
        );
        if options.dry_run {
            eprintln!("Note: {}", message);
        } else {
            interactive::print_info(&message);
        }
    }

    let template = encoding::read_template(&template_path)?;
    if template.had_errors {
        warn_line(
            options.dry_run,
            &format!(
                "{} is not valid UTF-8; invalid bytes were replaced",
                template_path.display()
            ),
        );
    }
    let source = encoding::read_source(&source_path)?;
    if source.had_errors {
        warn_line(
            options.dry_run,
            &format!(
                "{} decoded as {} with replacement characters",
                source_path.display(),
                source.encoding
            ),
        );
    }

    let engine = FormMergeEngine::new(merge_config);

    if options.dry_run {
        let outcome = engine.merge_html(&template.text, &source.text, &values)?;
        for warning in outcome.report.warnings() {
            warn_line(true, &warning);
        }
        print!("{}", outcome.to_pretty_html());
        return Ok(());
    }

    interactive::print_header("Merging HTML forms");
    println!(
        "  {} {}",
        "template:".bright_black(),
        template_path.display().to_string().bright_white()
    );
    println!(
        "  {} {} {}",
        "source:  ".bright_black(),
        source_path.display().to_string().bright_white(),
        format!("({})", source.encoding).bright_black()
    );
    println!();

    let (path, report) = generate_output(
        &engine,
        &template.text,
        &source.text,
        &values,
        &out_dir,
        Local::now().naive_local(),
    )
    .with_context(|| format!("Merge of {} failed", source_path.display()))?;

    print_report(&report);
    interactive::print_success(&format!("Wrote {}", path.display()));
    Ok(())
}

// Dry runs keep stdout for the HTML itself
fn warn_line(dry_run: bool, message: &str) {
    if dry_run {
        eprintln!("Warning: {}", message);
    } else {
        interactive::print_warning(message);
    }
}

/// Print a stage-by-stage table of what the merge did, then its warnings
pub fn print_report(report: &MergeReport) {
    use comfy_table::presets::UTF8_FULL;
    use comfy_table::{Cell, Color, Row, Table};

    let replaced: usize = report.replacements.values().sum();
    let form = match &report.form {
        FormTransplant::Applied(attrs) if attrs.is_empty() => {
            "no attributes on source form".to_string()
        }
        FormTransplant::Applied(attrs) => format!("copied {}", attrs.join(", ")),
        FormTransplant::MissingTemplateForm => "skipped (no target form)".to_string(),
        FormTransplant::MissingSourceForm => "skipped (no source form)".to_string(),
    };
    let field = match &report.field {
        FieldRename::Renamed { from, to } => format!("{} → {}", from, to),
        FieldRename::MissingTextarea => "skipped (no answer textarea)".to_string(),
        FieldRename::MissingSourceInput => "skipped (no named text input)".to_string(),
    };

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![
        Cell::new("Stage").fg(Color::Cyan),
        Cell::new("Result").fg(Color::Cyan),
    ]);
    let rows = [
        ("Scripts", format!("{} migrated", report.scripts_migrated)),
        (
            "Placeholders",
            format!("{} tokens for {} keys", replaced, report.replacements.len()),
        ),
        ("Form attributes", form),
        (
            "Radio options",
            format!(
                "{} paired ({} source, {} template)",
                report.radios.paired,
                report.radios.source_options(),
                report.radios.template_slots()
            ),
        ),
        ("Answer field", field),
    ];
    for (stage, result) in rows {
        table.add_row(Row::from(vec![
            Cell::new(stage).fg(Color::Cyan),
            Cell::new(result).fg(Color::White),
        ]));
    }

    println!("{}", table);
    println!();
    for warning in report.warnings() {
        interactive::print_warning(&warning);
    }
}

/// Check the template against the configuration
pub fn cmd_check(template: Option<PathBuf>) -> Result<()> {
    use owo_colors::OwoColorize;

    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let project = config::load_config_with_precedence(&cwd)?;
    let path = template.unwrap_or_else(|| PathBuf::from(&project.paths.template));

    println!(
        "{} {}",
        "▸".bright_cyan(),
        format!("Checking {}...", path.display()).bright_cyan().bold()
    );
    println!();

    let decoded = encoding::read_template(&path)?;
    let result = lint::check_template(&decoded.text, &project.merge)?;
    result.print(&path.display().to_string());

    if result.has_errors() {
        anyhow::bail!("Check failed with {} errors", result.error_count());
    }
    Ok(())
}

/// List the configured placeholder keys
pub fn cmd_keys() -> Result<()> {
    use comfy_table::presets::UTF8_FULL;
    use comfy_table::{Cell, Color, Row, Table};

    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let project = config::load_config_with_precedence(&cwd)?;
    let merge = &project.merge;
    let budget = config::headline_budget();

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![
        Cell::new("Key").fg(Color::Cyan),
        Cell::new("Prompt").fg(Color::Cyan),
        Cell::new("Limit").fg(Color::Cyan),
    ]);
    for placeholder in &merge.placeholder_keys {
        let limit = if merge.is_headline(&placeholder.key) {
            Cell::new(format!("{} chars", budget)).fg(Color::Yellow)
        } else {
            Cell::new("-").fg(Color::DarkGrey)
        };
        table.add_row(Row::from(vec![
            Cell::new(&placeholder.key).fg(Color::White),
            Cell::new(&placeholder.label),
            limit,
        ]));
    }

    println!("{}", table);
    Ok(())
}

/// Write starter config and values files into the current directory
pub fn cmd_init(force: bool) -> Result<()> {
    use owo_colors::OwoColorize;

    interactive::print_header("Initializing formgraft");
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let written = init::init_project(&cwd, force)?;
    for path in &written {
        interactive::print_success(&format!("Created {}", path.display()));
    }
    println!();
    println!("{}", "Next steps:".bright_white().bold());
    interactive::print_item("Fill in values.toml");
    interactive::print_item(&format!(
        "Run {}",
        "formgraft merge --source form.html --values values.toml".bright_white()
    ));
    Ok(())
}
