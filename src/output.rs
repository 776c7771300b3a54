//! Output rendering for the `scan` command.
//!
//! Supports `human` (default) and `json` outputs. The JSON form includes
//! per-record fields, diagnostics and a top-level summary.

use crate::error::ConfigError;
use crate::models::{Diagnostic, DiagnosticKind, ScanResult, Summary, TagRecord};
use crate::utils::use_colors;
use owo_colors::OwoColorize;
use serde_json::json;
use serde_json::Value as JsonVal;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputMode {
    #[default]
    Human,
    Json,
}

impl FromStr for OutputMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "human" => Ok(OutputMode::Human),
            "json" => Ok(OutputMode::Json),
            _ => Err(ConfigError::UnknownOutput(s.to_string())),
        }
    }
}

/// Print scan results in the requested mode.
pub fn print_scan(res: &ScanResult, summary: &Summary, output: OutputMode) {
    match output {
        OutputMode::Json => {
            let out = compose_scan_json(res, summary);
            match serde_json::to_string_pretty(&out) {
                Ok(s) => println!("{}", s),
                Err(e) => eprintln!("{} {}", crate::utils::error_prefix(), e),
            }
        }
        OutputMode::Human => {
            let color = use_colors();
            for r in &res.records {
                let tag = if color {
                    r.tag.clone().bold().to_string()
                } else {
                    r.tag.clone()
                };
                let location = format!(
                    "{}/{}:{}",
                    r.project.relative_path,
                    r.relative_file(),
                    r.line_number
                );
                if color {
                    println!(
                        "{} {} ❲{}❳ {} — {}",
                        "◆".blue(),
                        tag,
                        r.action,
                        location.bright_black(),
                        r.category
                    );
                } else {
                    println!("◆ {} ❲{}❳ {} — {}", tag, r.action, location, r.category);
                }
            }
            for d in &res.diagnostics {
                let label = match d.kind {
                    DiagnosticKind::MalformedPayload => "⟦invalid⟧",
                    DiagnosticKind::UnreadableFile => "⟦unreadable⟧",
                    DiagnosticKind::ProjectSkipped => "⟦skipped⟧",
                };
                let label = if color {
                    label.yellow().bold().to_string()
                } else {
                    label.to_string()
                };
                println!("▲ {} {} — {}", label, diagnostic_location(d), d.message);
            }
            let line = format!(
                "— Summary — tags={} actions={} categories={} institutions={} records={} projects={} diagnostics={}",
                summary.tags,
                summary.actions,
                summary.categories,
                summary.institutions,
                res.records.len(),
                res.projects_scanned,
                res.diagnostics.len()
            );
            if color {
                println!("{}", line.bold());
            } else {
                println!("{}", line);
            }
        }
    }
}

fn diagnostic_location(d: &Diagnostic) -> String {
    match (&d.file, d.line) {
        (Some(f), Some(l)) => format!("{}:{}", f, l),
        (Some(f), None) => f.clone(),
        _ => d.project.clone(),
    }
}

fn record_json(r: &TagRecord) -> JsonVal {
    json!({
        "category": r.category,
        "subCategory": r.sub_category,
        "tag": r.tag,
        "action": r.action,
        "description": r.description,
        "institution": r.institution,
        "project": r.project.relative_path,
        "file": r.relative_file(),
        "line": r.line_number,
        "url": r.file_url(),
    })
}

/// Compose scan JSON object (pure) for testing/snapshot purposes.
pub fn compose_scan_json(res: &ScanResult, summary: &Summary) -> JsonVal {
    let records: Vec<_> = res.records.iter().map(record_json).collect();
    json!({
        "records": records,
        "diagnostics": res.diagnostics,
        "summary": {
            "tags": summary.tags,
            "actions": summary.actions,
            "categories": summary.categories,
            "institutions": summary.institutions,
            "records": res.records.len(),
            "projectsScanned": res.projects_scanned,
            "projectsUnchanged": res.projects_unchanged,
        },
    })
}
