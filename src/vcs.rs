//! External version-control commands.
//!
//! `git` and `repo` are run as opaque subprocesses. Each call blocks until the
//! tool exits and has no timeout.

use crate::error::VcsError;
use crate::models::ProjectRef;
use std::path::Path;
use std::process::{Command, Output};
use tracing::debug;

/// Decides whether a project differs from a baseline branch.
///
/// Used to skip projects without changes before walking them.
pub trait ChangeDetector: Sync {
    fn has_changes(&self, project: &ProjectRef, baseline: &str) -> Result<bool, VcsError>;
}

/// Resolves the branch checked out in a directory.
pub trait BranchResolver {
    fn current_branch(&self, dir: &Path) -> Result<String, VcsError>;
}

/// Treats every project as changed.
pub struct AlwaysChanged;

impl ChangeDetector for AlwaysChanged {
    fn has_changes(&self, _project: &ProjectRef, _baseline: &str) -> Result<bool, VcsError> {
        Ok(true)
    }
}

/// The `git` command line.
pub struct Git;

impl BranchResolver for Git {
    fn current_branch(&self, dir: &Path) -> Result<String, VcsError> {
        let out = run("git", &["rev-parse", "--abbrev-ref", "HEAD"], dir)?;
        check_success("git rev-parse --abbrev-ref HEAD", dir, &out)?;
        Ok(String::from_utf8_lossy(&out.stdout).trim().to_string())
    }
}

impl ChangeDetector for Git {
    fn has_changes(&self, project: &ProjectRef, baseline: &str) -> Result<bool, VcsError> {
        let dir = project.abs_path();
        let out = run("git", &["diff", "--quiet", baseline, "--"], &dir)?;
        match out.status.code() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(failure(&format!("git diff --quiet {}", baseline), &dir, &out)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One project as listed by the workspace manifest.
pub struct ManifestEntry {
    pub path: String,
    pub name: String,
}

/// Projects of the workspace's default manifest groups, via `repo list`.
pub fn repo_list(root: &Path) -> Result<Vec<ManifestEntry>, VcsError> {
    let out = run("repo", &["list"], root)?;
    check_success("repo list", root, &out)?;
    parse_repo_list(&String::from_utf8_lossy(&out.stdout))
}

/// Parse `repo list` output: one `path : name` pair per line.
pub fn parse_repo_list(stdout: &str) -> Result<Vec<ManifestEntry>, VcsError> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(|line| match line.split_once(" : ") {
            Some((path, name)) if !path.trim().is_empty() && !name.trim().is_empty() => {
                Ok(ManifestEntry {
                    path: path.trim().to_string(),
                    name: name.trim().to_string(),
                })
            }
            _ => Err(VcsError::BadOutput {
                command: "repo list".into(),
                line: line.to_string(),
            }),
        })
        .collect()
}

fn run(program: &str, args: &[&str], dir: &Path) -> Result<Output, VcsError> {
    debug!("{} {} (in {})", program, args.join(" "), dir.display());
    Command::new(program)
        .args(args)
        .current_dir(dir)
        .env("GIT_PAGER", "")
        .output()
        .map_err(|source| VcsError::Spawn {
            command: format!("{} {}", program, args.join(" ")),
            dir: dir.to_path_buf(),
            source,
        })
}

fn check_success(command: &str, dir: &Path, out: &Output) -> Result<(), VcsError> {
    if out.status.success() {
        Ok(())
    } else {
        Err(failure(command, dir, out))
    }
}

fn failure(command: &str, dir: &Path, out: &Output) -> VcsError {
    VcsError::Failed {
        command: command.to_string(),
        dir: dir.to_path_buf(),
        status: out.status.to_string(),
        stderr: String::from_utf8_lossy(&out.stderr).trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_repo_list() {
        let out = "frameworks/base : platform/frameworks/base\n\
                   external/sqlite : platform/external/sqlite\n\n";
        let entries = parse_repo_list(out).unwrap();
        assert_eq!(
            entries,
            vec![
                ManifestEntry {
                    path: "frameworks/base".into(),
                    name: "platform/frameworks/base".into()
                },
                ManifestEntry {
                    path: "external/sqlite".into(),
                    name: "platform/external/sqlite".into()
                },
            ]
        );
    }

    #[test]
    fn test_parse_repo_list_rejects_garbage() {
        let err = parse_repo_list("fatal: not a repo client").unwrap_err();
        assert!(matches!(err, VcsError::BadOutput { .. }));
    }

    #[test]
    fn test_spawn_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = run("tagdoc-no-such-tool", &[], dir.path()).unwrap_err();
        assert!(matches!(err, VcsError::Spawn { .. }));
    }
}
