//! Report aggregation and rendering.
//!
//! Records are grouped by category, then by tag, both in lexicographic order.
//! Occurrences inside a tag are sorted by action; ties keep discovery order.
//! Summary counts are distinct values over the whole collection, not per group.
//!
//! Renderers differ only in markup. They all emit a summary, one section per
//! category with one subsection per tag, and a dated footer.

mod html;
mod rst;

pub use html::HtmlRenderer;
pub use rst::RstRenderer;

use crate::error::{ConfigError, TagdocError};
use crate::models::{Summary, TagRecord};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    Html,
    #[default]
    Rst,
}

impl ReportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ReportFormat::Html => "html",
            ReportFormat::Rst => "rst",
        }
    }

    pub fn renderer(self) -> Box<dyn Renderer> {
        match self {
            ReportFormat::Html => Box::new(HtmlRenderer),
            ReportFormat::Rst => Box::new(RstRenderer),
        }
    }
}

impl FromStr for ReportFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "html" => Ok(ReportFormat::Html),
            "rst" => Ok(ReportFormat::Rst),
            _ => Err(ConfigError::UnknownFormat(s.to_string())),
        }
    }
}

/// Turns a grouped report into a document.
pub trait Renderer {
    fn render(&self, report: &Report<'_>, generated: NaiveDate) -> String;
}

#[derive(Debug)]
pub struct TagGroup<'a> {
    pub tag: &'a str,
    pub occurrences: Vec<&'a TagRecord>,
}

#[derive(Debug)]
pub struct CategoryGroup<'a> {
    pub category: &'a str,
    pub tags: Vec<TagGroup<'a>>,
}

#[derive(Debug)]
/// Grouped and sorted view over a record collection.
pub struct Report<'a> {
    pub categories: Vec<CategoryGroup<'a>>,
    pub summary: Summary,
}

impl<'a> Report<'a> {
    pub fn build(records: &'a [TagRecord]) -> Self {
        let mut grouped: BTreeMap<&str, BTreeMap<&str, Vec<&TagRecord>>> = BTreeMap::new();
        for r in records {
            grouped
                .entry(r.category.as_str())
                .or_default()
                .entry(r.tag.as_str())
                .or_default()
                .push(r);
        }
        let categories = grouped
            .into_iter()
            .map(|(category, tags)| CategoryGroup {
                category,
                tags: tags
                    .into_iter()
                    .map(|(tag, mut occurrences)| {
                        occurrences.sort_by(|a, b| a.action.cmp(&b.action));
                        TagGroup { tag, occurrences }
                    })
                    .collect(),
            })
            .collect();
        Report {
            categories,
            summary: summarize(records),
        }
    }

    pub fn render(&self, format: ReportFormat, generated: NaiveDate) -> String {
        format.renderer().render(self, generated)
    }
}

/// Distinct tags, actions, categories and institutions.
pub fn summarize(records: &[TagRecord]) -> Summary {
    fn distinct<'a>(records: &'a [TagRecord], f: impl Fn(&'a TagRecord) -> &'a str) -> usize {
        records.iter().map(f).collect::<HashSet<_>>().len()
    }
    Summary {
        tags: distinct(records, |r| r.tag.as_str()),
        actions: distinct(records, |r| r.action.as_str()),
        categories: distinct(records, |r| r.category.as_str()),
        institutions: distinct(records, |r| r.institution.as_str()),
    }
}

/// Write a rendered report in one go, creating parent directories.
pub fn write_report(path: &Path, doc: &str) -> Result<(), TagdocError> {
    let write = || -> std::io::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, doc)
    };
    write().map_err(|source| TagdocError::WriteReport {
        path: path.to_path_buf(),
        source,
    })
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}
