//! Tag payload parser.
//!
//! A tag document is a block comment containing the `PhoneLab` marker followed
//! by a JSON object:
//!
//! ```text
//! /*
//!  * PhoneLab
//!  *
//!  * {
//!  *   "Category": "Network",
//!  *   "SubCategory": "Socket",
//!  *   "Tag": "latency-UB",
//!  *   "Action": "Log",
//!  *   "Description": "Logs socket round trips."
//!  * }
//!  */
//! ```
//!
//! The object is delimited by brace matching, stripped of `*` continuation
//! markers, joined into one line and decoded strictly with `serde_json`.

use crate::error::PayloadError;
use serde::Deserialize;

pub const MARKER: &str = "PhoneLab";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
/// The five required fields of a tag document. Unknown keys are ignored.
pub struct TagPayload {
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "SubCategory")]
    pub sub_category: String,
    #[serde(rename = "Tag")]
    pub tag: String,
    #[serde(rename = "Action")]
    pub action: String,
    #[serde(rename = "Description")]
    pub description: String,
}

/// Parse one comment body.
///
/// Returns `Ok(None)` for ordinary comments: no marker, or a marker that is
/// not followed by any `{`.
pub fn parse_comment(body: &str) -> Result<Option<TagPayload>, PayloadError> {
    let after_marker = match body.find(MARKER) {
        Some(i) => &body[i + MARKER.len()..],
        None => return Ok(None),
    };
    let open = match after_marker.find('{') {
        Some(i) => i,
        None => return Ok(None),
    };
    let candidate = &after_marker[open..];
    let raw = match object_end(candidate) {
        Some(end) => &candidate[..=end],
        None => {
            return Err(PayloadError::Unbalanced {
                raw: candidate.trim_end().to_string(),
            })
        }
    };
    let normalized = normalize(raw);
    serde_json::from_str::<TagPayload>(&normalized)
        .map(Some)
        .map_err(|source| PayloadError::Decode {
            raw: raw.to_string(),
            normalized,
            source,
        })
}

/// Byte index of the `}` closing the object that opens at index 0.
///
/// Braces inside JSON string literals are not counted.
fn object_end(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (i, ch) in s.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Drop comment continuation markers and join the payload into one line.
fn normalize(raw: &str) -> String {
    raw.lines()
        .map(|l| l.trim().trim_start_matches('*').trim())
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
