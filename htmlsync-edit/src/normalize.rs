//! Whitespace- and comment-insensitive canonical form used before comparison.

use htmlsync_types::convention::SYNC_MARKER_TAG;
use regex::{Captures, Regex};
use std::sync::LazyLock;

static COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("comment pattern compiles"));
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern compiles"));
static INTER_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r">\s+<").expect("inter-tag pattern compiles"));

/// Canonicalize markup for comparison.
///
/// Drops non-sentinel comments, collapses whitespace runs to one space, removes whitespace
/// between a closing `>` and the next `<`, then trims. Idempotent.
pub fn normalize(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let stripped = strip_comments(text);
    let collapsed = WHITESPACE.replace_all(&stripped, " ");
    let tight = INTER_TAG.replace_all(&collapsed, "><");
    tight.trim().to_string()
}

/// Remove every `<!-- ... -->` span that does not mention the sync marker.
///
/// Runs to a fixed point: removing `<!-- a -->` from `<!-<!-- a -->- b -->` exposes a new comment.
pub fn strip_comments(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let next = COMMENT.replace_all(&current, keep_sync_markers).into_owned();
        if next == current {
            return current;
        }
        current = next;
    }
}

fn keep_sync_markers(caps: &Captures<'_>) -> String {
    let comment = &caps[0];
    if comment.contains(SYNC_MARKER_TAG) {
        comment.to_string()
    } else {
        String::new()
    }
}
