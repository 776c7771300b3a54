//! Terminal helpers shared by the binary and printers.

use owo_colors::OwoColorize;

/// Colors are used unless `NO_COLOR` is set.
pub fn use_colors() -> bool {
    std::env::var_os("NO_COLOR").is_none()
}

pub fn error_prefix() -> String {
    if use_colors() {
        "✖ error:".red().bold().to_string()
    } else {
        "✖ error:".to_string()
    }
}

pub fn note_prefix() -> String {
    if use_colors() {
        "◆ note:".blue().bold().to_string()
    } else {
        "◆ note:".to_string()
    }
}

pub fn ok_prefix() -> String {
    if use_colors() {
        "✔".green().bold().to_string()
    } else {
        "✔".to_string()
    }
}
