//! Unified diff → per-file segments.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Per-file diff header. Captures the pre-image (`a/`) path, which git
/// leaves unquoted when it only contains spaces.
static FILE_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^diff --git a/(.+?) b/.*$").expect("FILE_HEADER_RE regex should compile")
});

/// The diff text belonging to exactly one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDiffSegment {
    /// Pre-image path from the `diff --git a/<path> b/<path>` header.
    pub filename: String,
    /// Header line through the end of the file's hunks, trimmed at both ends.
    pub diff_content: String,
}

/// Split a raw unified diff into ordered per-file segments.
///
/// Each segment runs from its header line up to the next header (or end of
/// input). Input with no headers yields an empty vector.
pub fn split_diff(raw: &str) -> Vec<FileDiffSegment> {
    let headers: Vec<(usize, String)> = FILE_HEADER_RE
        .captures_iter(raw)
        .filter_map(|caps| {
            let start = caps.get(0)?.start();
            let path = caps.get(1)?.as_str().to_string();
            Some((start, path))
        })
        .collect();

    headers
        .iter()
        .enumerate()
        .map(|(i, (start, filename))| {
            let end = headers
                .get(i + 1)
                .map(|(next, _)| *next)
                .unwrap_or(raw.len());
            FileDiffSegment {
                filename: filename.clone(),
                diff_content: raw[*start..end].trim().to_string(),
            }
        })
        .collect()
}
