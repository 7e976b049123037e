use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "formgraft", version, about = "Graft a live HTML form onto a static template")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Merge the second document into the template and write output_<timestamp>.html
    Merge {
        /// Template HTML (defaults to paths.template from formgraft.toml)
        #[arg(long)]
        template: Option<PathBuf>,
        /// Second HTML document providing form wiring
        #[arg(long)]
        source: Option<PathBuf>,
        /// Placeholder values file (.toml, .yaml or .json)
        #[arg(long)]
        values: Option<PathBuf>,
        /// Placeholder value in KEY=VALUE format (can be specified multiple times)
        #[arg(long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,
        /// Directory for the output file
        #[arg(long)]
        out_dir: Option<PathBuf>,
        /// Fail when radio option counts differ instead of truncating
        #[arg(long)]
        strict: bool,
        /// Prompt for the source path and any missing values
        #[arg(long, short)]
        interactive: bool,
        /// Print the merged HTML instead of writing a file
        #[arg(long)]
        dry_run: bool,
    },
    /// Check that the template has the form, radios and tokens the merge expects
    Check {
        #[arg(long)]
        template: Option<PathBuf>,
    },
    /// List placeholder keys and their limits
    Keys,
    /// Write a starter formgraft.toml and values.toml
    Init {
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Merge {
            template,
            source,
            values,
            set,
            out_dir,
            strict,
            interactive,
            dry_run,
        } => formgraft_core::cmd_merge(formgraft_core::MergeOptions {
            template,
            source,
            values_file: values,
            assignments: set,
            out_dir,
            strict,
            interactive,
            dry_run,
        })?,
        Command::Check { template } => formgraft_core::cmd_check(template)?,
        Command::Keys => formgraft_core::cmd_keys()?,
        Command::Init { force } => formgraft_core::cmd_init(force)?,
    }
    Ok(())
}
