//! Scan runner across all projects of a workspace.
//!
//! Projects are filtered by the change detector, then walked in parallel.
//! Results keep the input project order.

use crate::config::Effective;
use crate::error::TagdocError;
use crate::models::{Diagnostic, DiagnosticKind, ProjectRef, ScanResult};
use crate::vcs::{AlwaysChanged, BranchResolver, ChangeDetector};
use crate::walk::{walk_project, ProjectScan, ScanOptions};
use crate::workspace;
use rayon::prelude::*;
use std::sync::Arc;
use tracing::{debug, info, warn};

enum Outcome {
    Unchanged,
    Skipped(Diagnostic),
    Scanned(ProjectScan),
}

/// Discover the workspace of `eff`, check its branches and scan it.
///
/// With `all_projects` set every project is walked, otherwise `vcs` decides
/// which projects changed against the develop branch.
pub fn scan_workspace<V>(eff: &Effective, vcs: &V) -> Result<ScanResult, TagdocError>
where
    V: BranchResolver + ChangeDetector,
{
    let ws = workspace::discover(eff, vcs)?;
    info!("{} projects in {}", ws.projects.len(), eff.root.display());
    workspace::check_branches(&ws.projects, &eff.release_prefix());
    let detector: &dyn ChangeDetector = if eff.all_projects { &AlwaysChanged } else { vcs };
    let mut result = run_scan(&ws.projects, &eff.scan, detector, &eff.develop);
    let mut diagnostics = ws.diagnostics;
    diagnostics.append(&mut result.diagnostics);
    result.diagnostics = diagnostics;
    Ok(result)
}

/// Collect tag records from every project that differs from `baseline`.
///
/// A detector failure skips that project only; it is logged and kept as a
/// diagnostic so an incomplete report is never silent.
pub fn run_scan(
    projects: &[ProjectRef],
    opts: &ScanOptions,
    detector: &dyn ChangeDetector,
    baseline: &str,
) -> ScanResult {
    let outcomes: Vec<Outcome> = projects
        .par_iter()
        .map(|p| match detector.has_changes(p, baseline) {
            Ok(false) => {
                debug!("Ignoring project {}: no changes against {}", p.relative_path, baseline);
                Outcome::Unchanged
            }
            Ok(true) => {
                info!("Parsing project {}", p.relative_path);
                let scan = walk_project(&Arc::new(p.clone()), opts);
                info!(
                    "{} tags found in {} ({} files).",
                    scan.records.len(),
                    p.relative_path,
                    scan.files
                );
                Outcome::Scanned(scan)
            }
            Err(err) => {
                warn!("skipping project {}: {}", p.relative_path, err);
                Outcome::Skipped(Diagnostic {
                    kind: DiagnosticKind::ProjectSkipped,
                    project: p.relative_path.clone(),
                    file: None,
                    line: None,
                    message: err.to_string(),
                    payload: None,
                })
            }
        })
        .collect();

    let mut result = ScanResult::default();
    for outcome in outcomes {
        match outcome {
            Outcome::Unchanged => result.projects_unchanged += 1,
            Outcome::Skipped(d) => result.diagnostics.push(d),
            Outcome::Scanned(mut scan) => {
                result.projects_scanned += 1;
                result.records.append(&mut scan.records);
                result.diagnostics.append(&mut scan.diagnostics);
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VcsError;
    use crate::models::GitwebBase;
    use std::fs;
    use std::path::Path;

    struct ByName;

    impl ChangeDetector for ByName {
        fn has_changes(&self, project: &ProjectRef, _baseline: &str) -> Result<bool, VcsError> {
            match project.name.as_str() {
                "same" => Ok(false),
                "broken" => Err(VcsError::BadOutput {
                    command: "git diff".into(),
                    line: "fatal: bad revision".into(),
                }),
                _ => Ok(true),
            }
        }
    }

    fn write_tag(dir: &Path, file: &str, tag: &str) {
        fs::create_dir_all(dir).unwrap();
        let body = format!(
            "/* PhoneLab {{\"Category\": \"C\", \"SubCategory\": \"S\", \"Tag\": \"{}\", \"Action\": \"A\", \"Description\": \"D\"}} */\n",
            tag
        );
        fs::write(dir.join(file), body).unwrap();
    }

    fn project(root: &Path, path: &str, name: &str) -> ProjectRef {
        ProjectRef::new(root, path, name, "develop", GitwebBase::default())
    }

    #[test]
    fn test_run_scan_filters_and_keeps_order() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write_tag(&root.join("p1"), "a.c", "one-UB");
        write_tag(&root.join("p2"), "b.c", "two-UB");
        write_tag(&root.join("p3"), "c.c", "three-UB");
        write_tag(&root.join("p4"), "d.c", "four-UB");
        let projects = vec![
            project(root, "p1", "p1"),
            project(root, "p2", "same"),
            project(root, "p3", "broken"),
            project(root, "p4", "p4"),
        ];
        let res = run_scan(&projects, &ScanOptions::default(), &ByName, "develop");
        let tags: Vec<_> = res.records.iter().map(|r| r.tag.as_str()).collect();
        assert_eq!(tags, vec!["one-UB", "four-UB"]);
        assert_eq!(res.projects_scanned, 2);
        assert_eq!(res.projects_unchanged, 1);
        assert_eq!(res.diagnostics.len(), 1);
        assert_eq!(res.diagnostics[0].kind, DiagnosticKind::ProjectSkipped);
        assert_eq!(res.diagnostics[0].project, "p3");
    }

    #[test]
    fn test_run_scan_without_projects() {
        let res = run_scan(&[], &ScanOptions::default(), &AlwaysChanged, "develop");
        assert!(res.records.is_empty());
        assert!(res.diagnostics.is_empty());
        assert_eq!(res.projects_scanned, 0);
    }
}
