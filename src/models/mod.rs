//! Shared data models for scan results, diagnostics and report summaries.

pub mod project;

pub use project::{GitwebBase, ProjectRef};

use crate::parse::TagPayload;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone)]
/// One documented instrumentation point found in the sources.
///
/// Built once per parsed comment and never mutated afterwards. The project is
/// shared between all records of the same walk.
pub struct TagRecord {
    pub category: String,
    pub sub_category: String,
    pub tag: String,
    pub action: String,
    pub description: String,
    /// Suffix of `tag` after its last `-`.
    pub institution: String,
    pub project: Arc<ProjectRef>,
    pub file_path: PathBuf,
    /// 1-based line of the enclosing comment's opening `/*`.
    pub line_number: usize,
}

impl TagRecord {
    pub fn new(
        payload: TagPayload,
        project: Arc<ProjectRef>,
        file_path: PathBuf,
        line_number: usize,
    ) -> Self {
        let institution = institution_of(&payload.tag).to_string();
        TagRecord {
            category: payload.category,
            sub_category: payload.sub_category,
            tag: payload.tag,
            action: payload.action,
            description: payload.description,
            institution,
            project,
            file_path,
            line_number,
        }
    }

    /// Path of the source file relative to its project root.
    pub fn relative_file(&self) -> String {
        self.project.relative_file_path(&self.file_path)
    }

    /// Deep link to the exact line in the project's web viewer.
    pub fn file_url(&self) -> String {
        self.project.file_url(&self.file_path, Some(self.line_number))
    }
}

/// Institution code encoded as the last `-` separated segment of a tag.
///
/// A tag without any `-` is its own institution.
pub fn institution_of(tag: &str) -> &str {
    match tag.rsplit_once('-') {
        Some((_, inst)) => inst,
        None => tag,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    MalformedPayload,
    UnreadableFile,
    ProjectSkipped,
}

#[derive(Debug, Clone, Serialize)]
/// A recovered problem met during a scan. Never aborts the scan.
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub project: String,
    pub file: Option<String>,
    pub line: Option<usize>,
    pub message: String,
    /// Raw payload text for malformed tags, so the comment can be fixed.
    pub payload: Option<String>,
}

#[derive(Debug, Default)]
/// Everything collected by one scan of the workspace.
pub struct ScanResult {
    pub records: Vec<TagRecord>,
    pub diagnostics: Vec<Diagnostic>,
    pub projects_scanned: usize,
    pub projects_unchanged: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
/// Distinct-value counts over a whole record collection.
pub struct Summary {
    pub tags: usize,
    pub actions: usize,
    pub categories: usize,
    pub institutions: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_institution_is_last_dash_segment() {
        assert_eq!(institution_of("ui-event-UB"), "UB");
        assert_eq!(institution_of("latency-UB"), "UB");
        assert_eq!(institution_of("noinstitution"), "noinstitution");
        assert_eq!(institution_of("trailing-"), "");
    }
}
