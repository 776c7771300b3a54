//! CLI argument parsing via `clap`.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "tagdoc",
    version,
    about = "Collect and document PhoneLab tags",
    long_about = "tagdoc scans the projects of a repo checkout for PhoneLab tag documents \
                  (JSON objects inside /* */ comments) and renders them as HTML or RST.\n\n\
                  Configuration precedence: CLI > tagdoc.toml > defaults.",
    after_help = "Examples:\n  tagdoc generate --root ~/cm-13.0 --format html --out tags.html\n  tagdoc scan --output json --all",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[arg(long, global = true, action = clap::ArgAction::SetTrue, help = "Debug logging (RUST_LOG overrides)")]
    pub verbose: bool,
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
/// Supported subcommands.
pub enum Commands {
    /// Show version
    #[command(about = "Show version", long_about = "Print the current tagdoc version.")]
    Version,
    /// Write the tag report
    #[command(
        about = "Generate the tag report",
        long_about = "Scan all changed projects and write the report file. Malformed tags are logged and skipped.",
        after_help = "Examples:\n  tagdoc generate\n  tagdoc generate --format html --out docs/tags.html --aosp cm-13.0"
    )]
    Generate {
        #[arg(long, help = "Repo root directory (default: current dir)")]
        root: Option<String>,
        #[arg(long, help = "Output file path (default: <root>/tagdoc.<format>)")]
        out: Option<String>,
        #[arg(long, help = "AOSP base tag used in branch names (default: cm-13.0)")]
        aosp: Option<String>,
        #[arg(long, help = "Report format: html|rst (default: rst)")]
        format: Option<String>,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Scan every project, even without changes against develop")]
        all: bool,
    },
    /// List tags without writing a report
    #[command(
        about = "List tags and diagnostics",
        long_about = "Scan like `generate`, but print records, diagnostics and the summary to stdout.",
        after_help = "Examples:\n  tagdoc scan\n  tagdoc scan --output json"
    )]
    Scan {
        #[arg(long, help = "Repo root directory (default: current dir)")]
        root: Option<String>,
        #[arg(long, help = "AOSP base tag used in branch names (default: cm-13.0)")]
        aosp: Option<String>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Scan every project, even without changes against develop")]
        all: bool,
    },
}
