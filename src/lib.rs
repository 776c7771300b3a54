//! Tagdoc core library.
//!
//! This crate collects PhoneLab tag documents embedded in source comments of a
//! repo checkout and renders them as an HTML or RST report.
//!
//! High-level modules:
//! - `cli`: CLI argument parsing (binary uses this).
//! - `config`: Discovery and effective configuration resolution.
//! - `extract`: Block comment scanning and line numbers.
//! - `parse`: Tag payload detection and decoding.
//! - `walk`: Per-project source walk producing records and diagnostics.
//! - `workspace`: Project discovery and branch checks.
//! - `scan`: Change filtering and the parallel scan over all projects.
//! - `vcs`: Git and `repo` command plumbing behind small traits.
//! - `report`: Grouping, summary and the HTML/RST renderers.
//! - `models`: Tag records, projects and diagnostics.
//! - `output`: Human/JSON printers for `scan`.
//! - `error`: Error types.
//! - `utils`: Terminal helpers.
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod models;
pub mod output;
pub mod parse;
pub mod report;
pub mod scan;
pub mod utils;
pub mod vcs;
pub mod walk;
pub mod workspace;
