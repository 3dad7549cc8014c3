//! Forcing the per-file version marker to the template's value.
//!
//! Each managed file carries an integer `<stem>_version` key. Migration
//! always leaves it equal to the bundled template's value, whatever the user
//! file said before and wherever it said it.

use std::path::Path;

use crate::line::ConfigLine;

/// Comment placed above a synthesized version line when the template has none.
pub const FALLBACK_COMMENT: &str = "# Config version - do not modify";

/// Version key for a managed file: `messages.yml` → `messages_version`.
pub fn version_key_for(file_name: &str) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name);
    format!("{stem}_version")
}

fn is_version_line(trimmed: &str, key: &str) -> bool {
    trimmed
        .strip_prefix(key)
        .is_some_and(|rest| rest.starts_with(':') || rest.starts_with(' '))
}

/// Set the `key` line in `lines` to `target`, or insert one if it is missing.
///
/// An existing line keeps its indentation and any inline comment. A missing
/// line is inserted before the first real entry, preceded by the comment that
/// sits above the key in the template (or [`FALLBACK_COMMENT`]) and followed
/// by a blank separator.
pub fn update_version(
    mut lines: Vec<String>,
    target: i64,
    template_lines: &[&str],
    key: &str,
) -> Vec<String> {
    if let Some(i) = lines.iter().position(|l| is_version_line(l.trim(), key)) {
        let rewritten = {
            let line = ConfigLine::new(&lines[i]);
            let suffix = line
                .entry()
                .and_then(|entry| entry.comment)
                .map(|comment| comment.suffix())
                .unwrap_or_default();
            format!("{}{key}: {target}{suffix}", " ".repeat(line.indent()))
        };
        lines[i] = rewritten;
        return lines;
    }

    let comment = template_lines
        .iter()
        .position(|l| is_version_line(l.trim(), key))
        .and_then(|i| i.checked_sub(1))
        .map(|i| template_lines[i])
        .filter(|l| l.trim().starts_with('#'))
        .unwrap_or(FALLBACK_COMMENT)
        .to_string();

    let at = lines
        .iter()
        .position(|l| {
            let line = ConfigLine::new(l);
            !line.is_trivia() && !is_version_line(line.trimmed(), key)
        })
        .unwrap_or(lines.len());

    lines.insert(at, comment);
    lines.insert(at + 1, format!("{key}: {target}"));
    if lines.get(at + 2).is_some_and(|next| !next.trim().is_empty()) {
        lines.insert(at + 2, String::new());
    }
    lines
}
