//! Project walker: finds source files and turns their tag comments into
//! records with provenance.
//!
//! Line numbers point at the line holding the comment's opening `/*`, not the
//! line of the `PhoneLab` marker inside it. Large comments therefore report a
//! line above the actual tag content.

use crate::extract::comments;
use crate::models::{Diagnostic, DiagnosticKind, ProjectRef, TagRecord};
use crate::parse::parse_comment;
use glob::Pattern;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, warn};
use walkdir::WalkDir;

pub const DEFAULT_EXTENSIONS: &[&str] = &["c", "cpp", "java"];

#[derive(Debug, Clone)]
/// File selection for a walk.
pub struct ScanOptions {
    /// Allowed file extensions, without the dot. Case-sensitive.
    pub extensions: Vec<String>,
    /// Globs matched against paths relative to the project root.
    pub exclude: Vec<Pattern>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        ScanOptions {
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            exclude: Vec::new(),
        }
    }
}

impl ScanOptions {
    fn is_source(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map_or(false, |ext| self.extensions.iter().any(|a| a == ext))
    }

    fn is_excluded(&self, rel: &Path) -> bool {
        self.exclude.iter().any(|p| p.matches_path(rel))
    }
}

#[derive(Debug, Default)]
/// Records and recovered problems of one project.
pub struct ProjectScan {
    pub records: Vec<TagRecord>,
    pub diagnostics: Vec<Diagnostic>,
    pub files: usize,
}

/// Walk every regular source file under the project root.
///
/// Unreadable files and malformed tags are logged, recorded as diagnostics and
/// skipped. Files are visited in file-name order.
pub fn walk_project(project: &Arc<ProjectRef>, opts: &ScanOptions) -> ProjectScan {
    let root = project.abs_path();
    let mut scan = ProjectScan::default();
    for entry in WalkDir::new(&root).sort_by_file_name() {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                let file = err.path().map(|p| p.to_string_lossy().to_string());
                warn!("skipping unreadable entry in {}: {}", project.relative_path, err);
                scan.diagnostics.push(Diagnostic {
                    kind: DiagnosticKind::UnreadableFile,
                    project: project.relative_path.clone(),
                    file,
                    line: None,
                    message: err.to_string(),
                    payload: None,
                });
                continue;
            }
        };
        if !entry.file_type().is_file() || !opts.is_source(entry.path()) {
            continue;
        }
        let rel = entry.path().strip_prefix(&root).unwrap_or(entry.path());
        if opts.is_excluded(rel) {
            debug!("excluded {}", entry.path().display());
            continue;
        }
        let text = match fs::read_to_string(entry.path()) {
            Ok(s) => s,
            Err(err) => {
                warn!("skipping unreadable file {}: {}", entry.path().display(), err);
                scan.diagnostics.push(Diagnostic {
                    kind: DiagnosticKind::UnreadableFile,
                    project: project.relative_path.clone(),
                    file: Some(entry.path().to_string_lossy().to_string()),
                    line: None,
                    message: err.to_string(),
                    payload: None,
                });
                continue;
            }
        };
        scan.files += 1;
        let (mut records, mut diagnostics) = scan_text(project, entry.path(), &text);
        scan.records.append(&mut records);
        scan.diagnostics.append(&mut diagnostics);
    }
    scan
}

/// Extract all tag records from the text of one file.
pub fn scan_text(
    project: &Arc<ProjectRef>,
    path: &Path,
    text: &str,
) -> (Vec<TagRecord>, Vec<Diagnostic>) {
    let mut records = Vec::new();
    let mut diagnostics = Vec::new();
    for comment in comments(text) {
        let line = comment.line;
        match parse_comment(comment.body) {
            Ok(Some(payload)) => records.push(TagRecord::new(
                payload,
                Arc::clone(project),
                path.to_path_buf(),
                line,
            )),
            Ok(None) => {}
            Err(err) => {
                error!(
                    "invalid tag document in {}:{}: {}: {}",
                    path.display(),
                    line,
                    err,
                    err.raw()
                );
                diagnostics.push(Diagnostic {
                    kind: DiagnosticKind::MalformedPayload,
                    project: project.relative_path.clone(),
                    file: Some(path.to_string_lossy().to_string()),
                    line: Some(line),
                    message: err.to_string(),
                    payload: Some(err.raw().to_string()),
                });
            }
        }
    }
    (records, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GitwebBase;
    use std::path::PathBuf;

    fn tag(action: &str) -> String {
        format!(
            r#"/*
 * PhoneLab
 * {{
 *   "Category": "Network",
 *   "SubCategory": "Socket",
 *   "Tag": "latency-UB",
 *   "Action": "{}",
 *   "Description": "d"
 * }}
 */"#,
            action
        )
    }

    fn project(root: &Path) -> Arc<ProjectRef> {
        Arc::new(ProjectRef::new(
            root,
            "frameworks/base",
            "platform_frameworks_base",
            "develop",
            GitwebBase::default(),
        ))
    }

    #[test]
    fn test_scan_text_line_numbers_and_recovery() {
        let text = format!(
            "// header\n{}\nint x;\n/* PhoneLab {{\"Category\": \"A\"}} */\n{}\n",
            tag("Log"),
            tag("Drop")
        );
        let proj = project(Path::new("/aosp"));
        let path = PathBuf::from("/aosp/frameworks/base/net.c");
        let (records, diags) = scan_text(&proj, &path, &text);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].action, "Log");
        assert_eq!(records[0].line_number, 2);
        assert_eq!(records[1].action, "Drop");
        assert_eq!(records[1].line_number, 14);
        assert_eq!(records[0].institution, "UB");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, DiagnosticKind::MalformedPayload);
        assert_eq!(diags[0].line, Some(13));
        assert_eq!(diags[0].payload.as_deref(), Some(r#"{"Category": "A"}"#));
    }

    #[test]
    fn test_walk_filters_extensions_and_excludes() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("frameworks/base");
        fs::create_dir_all(base.join("core/jni")).unwrap();
        fs::create_dir_all(base.join("tests")).unwrap();
        fs::write(base.join("core/A.java"), tag("Log")).unwrap();
        fs::write(base.join("core/jni/b.cpp"), tag("Drop")).unwrap();
        fs::write(base.join("core/notes.txt"), tag("Ignored")).unwrap();
        fs::write(base.join("core/header.h"), tag("Ignored")).unwrap();
        fs::write(base.join("tests/T.java"), tag("Excluded")).unwrap();

        let opts = ScanOptions {
            exclude: vec![Pattern::new("tests/**").unwrap()],
            ..ScanOptions::default()
        };
        let scan = walk_project(&project(dir.path()), &opts);
        let actions: Vec<_> = scan.records.iter().map(|r| r.action.as_str()).collect();
        assert_eq!(actions, vec!["Log", "Drop"]);
        assert_eq!(scan.files, 2);
        assert!(scan.diagnostics.is_empty());
        assert_eq!(scan.records[1].relative_file(), "core/jni/b.cpp");
    }

    #[test]
    fn test_walk_skips_unreadable_file() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("frameworks/base");
        fs::create_dir_all(&base).unwrap();
        fs::write(base.join("ok.c"), tag("Log")).unwrap();
        // Invalid UTF-8 cannot be read as text.
        fs::write(base.join("bad.c"), [0xffu8, 0xfe, 0x00]).unwrap();
        let scan = walk_project(&project(dir.path()), &ScanOptions::default());
        assert_eq!(scan.records.len(), 1);
        assert_eq!(scan.diagnostics.len(), 1);
        assert_eq!(scan.diagnostics[0].kind, DiagnosticKind::UnreadableFile);
    }

    #[test]
    fn test_scan_text_many_plain_comments() {
        let mut text = "/** javadoc */\n".repeat(40_000);
        text.push_str(&tag("Log"));
        let proj = project(Path::new("/aosp"));
        let path = PathBuf::from("/aosp/frameworks/base/Big.java");
        let (records, diags) = scan_text(&proj, &path, &text);
        assert!(diags.is_empty());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].line_number, 40_001);
    }
}
