//! Checked-out projects of a multi-repository workspace and their web links.

use serde::Serialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_SERVER: &str = "http://platform.phone-lab.org:8080";
pub const DEFAULT_GITWEB_PREFIX: &str = "cm-shamu";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Where project repositories can be browsed: `{server}/gitweb?p={prefix}/{name}.git`.
pub struct GitwebBase {
    pub server: String,
    pub prefix: String,
}

impl Default for GitwebBase {
    fn default() -> Self {
        GitwebBase {
            server: DEFAULT_SERVER.to_string(),
            prefix: DEFAULT_GITWEB_PREFIX.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// One repository inside the workspace.
///
/// `current_branch` is resolved once at discovery. Checking out another branch
/// afterwards leaves this value stale.
pub struct ProjectRef {
    pub root: PathBuf,
    pub relative_path: String,
    pub name: String,
    pub current_branch: String,
    #[serde(skip)]
    pub gitweb: GitwebBase,
}

impl ProjectRef {
    pub fn new(
        root: impl Into<PathBuf>,
        relative_path: impl Into<String>,
        name: impl Into<String>,
        current_branch: impl Into<String>,
        gitweb: GitwebBase,
    ) -> Self {
        ProjectRef {
            root: root.into(),
            relative_path: relative_path.into(),
            name: name.into(),
            current_branch: current_branch.into(),
            gitweb,
        }
    }

    pub fn abs_path(&self) -> PathBuf {
        self.root.join(&self.relative_path)
    }

    /// Browse URL of the project repository.
    pub fn url(&self) -> String {
        format!(
            "{}/gitweb?p={}/{}.git",
            self.gitweb.server.trim_end_matches('/'),
            self.gitweb.prefix,
            self.name
        )
    }

    /// Path of `file` relative to the project root, `/` separated.
    ///
    /// Files outside the project are returned as given.
    pub fn relative_file_path(&self, file: &Path) -> String {
        let rel = if file.is_absolute() {
            pathdiff::diff_paths(file, self.abs_path())
                .filter(|p| !p.starts_with(".."))
                .unwrap_or_else(|| file.to_path_buf())
        } else {
            file.strip_prefix(&self.relative_path)
                .map(Path::to_path_buf)
                .unwrap_or_else(|_| file.to_path_buf())
        };
        if rel.is_absolute() {
            return rel.to_string_lossy().into_owned();
        }
        rel.components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Blob link for `file` on the project's current branch, optionally
    /// anchored at `line`.
    pub fn file_url(&self, file: &Path, line: Option<usize>) -> String {
        let mut url = format!(
            "{};a=blob;f={};hb=refs/heads/{}",
            self.url(),
            self.relative_file_path(file),
            self.current_branch
        );
        if let Some(l) = line {
            url.push_str(&format!("#l{}", l));
        }
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project() -> ProjectRef {
        ProjectRef::new(
            "/aosp",
            "frameworks/base",
            "platform_frameworks_base",
            "phonelab/cm-13.0/release-1",
            GitwebBase::default(),
        )
    }

    #[test]
    fn test_project_url() {
        assert_eq!(
            project().url(),
            "http://platform.phone-lab.org:8080/gitweb?p=cm-shamu/platform_frameworks_base.git"
        );
    }

    #[test]
    fn test_file_url_with_line() {
        let p = project();
        let file = Path::new("/aosp/frameworks/base/core/java/Foo.java");
        assert_eq!(p.relative_file_path(file), "core/java/Foo.java");
        assert_eq!(
            p.file_url(file, Some(42)),
            "http://platform.phone-lab.org:8080/gitweb?p=cm-shamu/platform_frameworks_base.git\
             ;a=blob;f=core/java/Foo.java;hb=refs/heads/phonelab/cm-13.0/release-1#l42"
        );
        assert!(!p.file_url(file, None).contains("#l"));
    }

    #[test]
    fn test_relative_path_outside_project_is_kept() {
        let p = project();
        let file = Path::new("/elsewhere/Bar.java");
        assert_eq!(p.relative_file_path(file), "/elsewhere/Bar.java");
    }
}
