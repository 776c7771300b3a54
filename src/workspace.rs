//! Workspace discovery: which projects to scan and which branch each one is on.
//!
//! Projects come from `[[projects]]` in the config file when present, else from
//! `repo list` in a `.repo` checkout. Branches are resolved once here.

use crate::config::{Effective, ProjectCfg};
use crate::error::TagdocError;
use crate::models::{Diagnostic, DiagnosticKind, GitwebBase, ProjectRef};
use crate::vcs::{self, BranchResolver};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{error, warn};

#[derive(Debug, Default)]
pub struct Workspace {
    pub projects: Vec<ProjectRef>,
    /// Projects dropped during discovery.
    pub diagnostics: Vec<Diagnostic>,
}

/// Discover the projects of the configured workspace.
///
/// Fails only when there is nothing to discover from, or `repo list` fails.
pub fn discover(eff: &Effective, branches: &dyn BranchResolver) -> Result<Workspace, TagdocError> {
    let entries: Vec<ProjectCfg> = if !eff.projects.is_empty() {
        eff.projects.clone()
    } else if eff.root.join(".repo").is_dir() {
        vcs::repo_list(&eff.root)?
            .into_iter()
            .map(|e| ProjectCfg {
                path: e.path,
                name: Some(e.name),
                branch: None,
            })
            .collect()
    } else {
        return Err(TagdocError::NoWorkspace(eff.root.clone()));
    };
    Ok(resolve_projects(&eff.root, &entries, &eff.gitweb, branches))
}

/// Turn project entries into `ProjectRef`s, resolving missing branches.
///
/// Entries that are not checked out or whose branch cannot be resolved are
/// skipped with a warning and a diagnostic.
pub fn resolve_projects(
    root: &Path,
    entries: &[ProjectCfg],
    gitweb: &GitwebBase,
    branches: &dyn BranchResolver,
) -> Workspace {
    let mut ws = Workspace::default();
    for entry in entries {
        let dir = root.join(&entry.path);
        if !dir.is_dir() {
            warn!("skipping project {}: not checked out", entry.path);
            ws.diagnostics.push(skipped(&entry.path, "not checked out".into()));
            continue;
        }
        let branch = match entry.branch.clone() {
            Some(b) => b,
            None => match branches.current_branch(&dir) {
                Ok(b) => b,
                Err(err) => {
                    warn!("skipping project {}: {}", entry.path, err);
                    ws.diagnostics.push(skipped(&entry.path, err.to_string()));
                    continue;
                }
            },
        };
        let name = entry.name.clone().unwrap_or_else(|| entry.path.clone());
        ws.projects.push(ProjectRef::new(
            root,
            entry.path.as_str(),
            name,
            branch,
            gitweb.clone(),
        ));
    }
    ws
}

/// Report projects off the release branch, and mixed branches.
///
/// Problems are logged and returned; they never stop generation.
pub fn check_branches(projects: &[ProjectRef], release_prefix: &str) -> Vec<String> {
    let mut problems = Vec::new();
    for p in projects {
        if !p.current_branch.starts_with(release_prefix) {
            let msg = format!(
                "Project {} not in release branch, current branch is {}.",
                p.relative_path, p.current_branch
            );
            error!("{}", msg);
            problems.push(msg);
        }
    }
    let all: BTreeSet<&str> = projects.iter().map(|p| p.current_branch.as_str()).collect();
    if all.len() > 1 {
        let msg = "Not all projects in same branch, do a `repo status` and check.".to_string();
        error!("{}", msg);
        problems.push(msg);
    }
    problems
}

fn skipped(project: &str, message: String) -> Diagnostic {
    Diagnostic {
        kind: DiagnosticKind::ProjectSkipped,
        project: project.to_string(),
        file: None,
        line: None,
        message,
        payload: None,
    }
}
