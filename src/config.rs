//! Configuration discovery and effective settings resolution.
//!
//! tagdoc reads `tagdoc.toml|yaml|yml` from the workspace root (or closest
//! ancestor holding a config file or a `.repo` directory) and merges it with
//! CLI flags to produce an `Effective` config.
//! Defaults:
//! - `aosp`: `cm-13.0`
//! - `format`: `rst`
//! - `out`: `<root>/tagdoc.<format>`
//! - `output`: `human`
//! - `develop`: `phonelab/<aosp>/develop`
//! - `server` / `gitweb_prefix`: the PhoneLab gitweb instance
//! - `extensions`: `c`, `cpp`, `java`
//!
//! Overrides precedence: CLI > config file > defaults. Bad values are rejected
//! here, before any scanning starts.

use crate::error::ConfigError;
use crate::models::GitwebBase;
use crate::output::OutputMode;
use crate::report::ReportFormat;
use crate::walk::ScanOptions;
use glob::Pattern;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_AOSP_BASE: &str = "cm-13.0";
const CONFIG_FILES: [&str; 3] = ["tagdoc.toml", "tagdoc.yaml", "tagdoc.yml"];

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `tagdoc.toml|yaml`.
pub struct TagdocConfig {
    pub out: Option<String>,
    pub aosp: Option<String>,
    pub format: Option<String>,
    pub output: Option<String>,
    pub develop: Option<String>,
    pub server: Option<String>,
    pub gitweb_prefix: Option<String>,
    pub extensions: Option<Vec<String>>,
    #[serde(default)]
    pub exclude: Vec<String>,
    pub all_projects: Option<bool>,
    #[serde(default)]
    pub projects: Vec<ProjectCfg>,
}

#[derive(Debug, Default, Deserialize, Clone, PartialEq, Eq)]
/// Explicit project entry; replaces manifest discovery when present.
pub struct ProjectCfg {
    pub path: String,
    /// Repository name on the server (default: `path`).
    pub name: Option<String>,
    /// Branch to link to (default: resolved from the checkout).
    pub branch: Option<String>,
}

#[derive(Debug, Default, Clone)]
/// Values given on the command line. `None` defers to the config file.
pub struct Overrides {
    pub root: Option<String>,
    pub out: Option<String>,
    pub aosp: Option<String>,
    pub format: Option<String>,
    pub output: Option<String>,
    pub all_projects: Option<bool>,
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by commands after applying precedence.
pub struct Effective {
    pub root: PathBuf,
    pub config_found: bool,
    pub out: PathBuf,
    pub aosp: String,
    pub format: ReportFormat,
    pub output: OutputMode,
    pub develop: String,
    pub gitweb: GitwebBase,
    pub scan: ScanOptions,
    pub all_projects: bool,
    pub projects: Vec<ProjectCfg>,
}

impl Effective {
    /// Prefix every release branch of the configured base must start with.
    pub fn release_prefix(&self) -> String {
        format!("phonelab/{}/release-", self.aosp)
    }
}

/// Walk upward from `start` to detect the workspace root.
///
/// Stops when a `tagdoc.toml|yaml|yml` or a `.repo` directory is found.
pub fn detect_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if CONFIG_FILES.iter().any(|f| cur.join(f).exists()) {
            return cur.to_path_buf();
        }
        if cur.join(".repo").is_dir() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

/// Load `TagdocConfig` from `tagdoc.toml` or `tagdoc.yaml|yml` if present.
pub fn load_config(root: &Path) -> Result<Option<TagdocConfig>, ConfigError> {
    for name in CONFIG_FILES {
        let path = root.join(name);
        if !path.exists() {
            continue;
        }
        let s = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let cfg = if name.ends_with(".toml") {
            toml::from_str(&s).map_err(|e| ConfigError::Parse {
                path: path.clone(),
                message: e.to_string(),
            })?
        } else {
            serde_yaml::from_str(&s).map_err(|e| ConfigError::Parse {
                path: path.clone(),
                message: e.to_string(),
            })?
        };
        return Ok(Some(cfg));
    }
    Ok(None)
}

/// Resolve `Effective` by merging CLI flags, discovered config, and defaults.
pub fn resolve_effective(cli: &Overrides) -> Result<Effective, ConfigError> {
    let start = PathBuf::from(cli.root.as_deref().unwrap_or("."));
    let start = start.canonicalize().unwrap_or(start);
    let root = detect_root(&start);
    let loaded = load_config(&root)?;
    let config_found = loaded.is_some();
    let cfg = loaded.unwrap_or_default();

    let format: ReportFormat = cli
        .format
        .as_deref()
        .or(cfg.format.as_deref())
        .map(str::parse::<ReportFormat>)
        .transpose()?
        .unwrap_or_default();

    let output: OutputMode = cli
        .output
        .as_deref()
        .or(cfg.output.as_deref())
        .map(str::parse::<OutputMode>)
        .transpose()?
        .unwrap_or_default();

    let aosp = cli
        .aosp
        .clone()
        .or(cfg.aosp)
        .unwrap_or_else(|| DEFAULT_AOSP_BASE.to_string());

    // CLI paths are taken as given; config paths are relative to the root
    let out = match (cli.out.as_ref(), cfg.out.as_ref()) {
        (Some(p), _) => PathBuf::from(p),
        (None, Some(p)) => root.join(p),
        (None, None) => root.join(format!("tagdoc.{}", format.extension())),
    };

    let develop = cfg
        .develop
        .unwrap_or_else(|| format!("phonelab/{}/develop", aosp));

    let defaults = GitwebBase::default();
    let gitweb = GitwebBase {
        server: cfg.server.unwrap_or(defaults.server),
        prefix: cfg.gitweb_prefix.unwrap_or(defaults.prefix),
    };

    let mut scan = ScanOptions::default();
    if let Some(exts) = cfg.extensions {
        scan.extensions = exts
            .into_iter()
            .map(|e| e.trim_start_matches('.').to_string())
            .collect();
    }
    scan.exclude = cfg
        .exclude
        .iter()
        .map(|p| {
            Pattern::new(p).map_err(|source| ConfigError::BadExclude {
                pattern: p.clone(),
                source,
            })
        })
        .collect::<Result<_, _>>()?;

    let all_projects = cli.all_projects.or(cfg.all_projects).unwrap_or(false);

    Ok(Effective {
        root,
        config_found,
        out,
        aosp,
        format,
        output,
        develop,
        gitweb,
        scan,
        all_projects,
        projects: cfg.projects,
    })
}
