//! Error types shared by the library.
//!
//! Only configuration and workspace discovery failures are fatal. Payload and
//! I/O problems found while scanning are recovered and surface as
//! [`crate::models::Diagnostic`]s instead.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown report format '{0}' (expected html or rst)")]
    UnknownFormat(String),

    #[error("unknown output mode '{0}' (expected human or json)")]
    UnknownOutput(String),

    #[error("invalid exclude pattern '{pattern}': {source}")]
    BadExclude {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum VcsError {
    #[error("failed to run `{command}` in {dir}: {source}")]
    Spawn {
        command: String,
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` failed in {dir} (status {status}): {stderr}")]
    Failed {
        command: String,
        dir: PathBuf,
        status: String,
        stderr: String,
    },

    #[error("unexpected output from `{command}`: {line}")]
    BadOutput { command: String, line: String },
}

#[derive(Debug, Error)]
pub enum TagdocError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Vcs(#[from] VcsError),

    #[error("no .repo directory and no [[projects]] configured under {0}")]
    NoWorkspace(PathBuf),

    #[error("failed to write report to {path}: {source}")]
    WriteReport {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("unbalanced braces in tag payload")]
    Unbalanced { raw: String },

    #[error("invalid tag payload: {source}")]
    Decode {
        raw: String,
        normalized: String,
        #[source]
        source: serde_json::Error,
    },
}

impl PayloadError {
    /// Payload text as written in the comment, running to the end of the
    /// comment when no closing brace was found.
    pub fn raw(&self) -> &str {
        match self {
            PayloadError::Unbalanced { raw }
            | PayloadError::Decode { raw, .. } => raw,
        }
    }
}
