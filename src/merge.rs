//! Line-by-line merge of a template file with a user's values.
//!
//! The template's raw text drives the output: every line is either copied
//! verbatim or, when the user set a value at that line's dotted path,
//! rebuilt around the user's value. Keys the template does not mention never
//! reach the output, which is how obsolete settings are dropped.
//!
//! Both trees are only consulted as oracles. Neither is ever serialized.

use serde_yaml::Value;
use tracing::debug;

use crate::format::{format_value, list_item_text};
use crate::line::{ConfigLine, Entry, LineKind};
use crate::path::PathStack;
use crate::tree::{ConfigTree, NodeKind};

/// What a `key:` line introduces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Scalar,
    Section,
    List,
}

/// Merge `user` values into the template text.
///
/// `reserved` names version keys: their template lines are always copied so
/// the version updater can set them afterwards.
pub fn merge(
    template_lines: &[&str],
    user: &ConfigTree,
    template: &ConfigTree,
    reserved: &[String],
) -> Vec<String> {
    let lines: Vec<ConfigLine<'_>> = template_lines.iter().map(|l| ConfigLine::new(l)).collect();
    let mut merged = Vec::with_capacity(lines.len());
    let mut stack = PathStack::new();

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];
        if line.is_trivia() {
            merged.push(line.raw().to_string());
            i += 1;
            continue;
        }

        stack.enter(line.indent());

        // List items outside a takeover, and anything without a colon.
        let Some(entry) = line.entry() else {
            merged.push(line.raw().to_string());
            i += 1;
            continue;
        };

        let path = stack.path_for(entry.key);
        let shape = if entry.value.is_empty() {
            shape_of(&lines, i)
        } else {
            Shape::Scalar
        };

        match shape {
            Shape::List => {
                match user.get(&path).and_then(|node| node.as_list()) {
                    Some(items) => {
                        emit_list(&mut merged, &line, &entry, items);
                        i = list_block_end(&lines, i);
                    }
                    None => {
                        if user.contains(&path) {
                            debug!(path = %path, "user value is not a list; keeping template default");
                        }
                        merged.push(line.raw().to_string());
                    }
                }
                stack.push(entry.key, line.indent());
            }
            Shape::Section => {
                merged.push(line.raw().to_string());
                stack.push(entry.key, line.indent());
            }
            Shape::Scalar => {
                merged.push(scalar_line(&line, &entry, &path, user, template, reserved));
            }
        }
        i += 1;
    }

    merged
}

/// Decide whether the empty-valued key at `lines[i]` opens a map or a list.
///
/// Skips any run of comments and blank lines, however long, and looks at the
/// first real line after the key.
fn shape_of(lines: &[ConfigLine<'_>], i: usize) -> Shape {
    let indent = lines[i].indent();
    match lines[i + 1..].iter().find(|l| !l.is_trivia()) {
        Some(next) if next.kind() == LineKind::ListItem && next.indent() >= indent => Shape::List,
        Some(next) if next.indent() > indent => Shape::Section,
        _ => Shape::Scalar,
    }
}

/// Index of the last template line belonging to the list opened at `lines[i]`.
///
/// The block is every following line indented deeper than the key, plus `-`
/// items written at the key's own indentation. Blank lines and comments
/// belong to the block only when a block line follows them.
fn list_block_end(lines: &[ConfigLine<'_>], i: usize) -> usize {
    let indent = lines[i].indent();
    let inside = |line: &ConfigLine<'_>| match line.kind() {
        LineKind::ListItem => line.indent() >= indent,
        _ => line.indent() > indent,
    };
    let mut end = i;
    for (j, line) in lines.iter().enumerate().skip(i + 1) {
        if line.is_trivia() {
            continue;
        }
        if !inside(line) {
            break;
        }
        end = j;
    }
    end
}

fn emit_list(merged: &mut Vec<String>, line: &ConfigLine<'_>, entry: &Entry<'_>, items: &[Value]) {
    let pad = " ".repeat(line.indent());
    if items.is_empty() {
        // A bare `key:` would read back as null, not as an empty list.
        let suffix = entry.comment.map(|c| c.suffix()).unwrap_or_default();
        merged.push(format!("{pad}{}: []{suffix}", entry.key));
        return;
    }
    merged.push(line.raw().to_string());
    for item in items {
        merged.push(format!("{pad}  - {}", list_item_text(item)));
    }
}

fn scalar_line(
    line: &ConfigLine<'_>,
    entry: &Entry<'_>,
    path: &str,
    user: &ConfigTree,
    template: &ConfigTree,
    reserved: &[String],
) -> String {
    if reserved.iter().any(|key| key == entry.key) {
        return line.raw().to_string();
    }
    let Some(value) = user.value(path) else {
        return line.raw().to_string();
    };

    let user_kind = user.get(path).map(|node| node.kind());
    let template_kind = template.get(path).map(|node| node.kind());
    let compatible = match (user_kind, template_kind) {
        (Some(u), Some(t)) => u == t,
        (Some(u), None) => u != NodeKind::Section,
        (None, _) => false,
    };
    if !compatible {
        debug!(path = %path, "user value has a different shape; keeping template default");
        return line.raw().to_string();
    }

    let suffix = entry.comment.map(|c| c.suffix()).unwrap_or_default();
    format!(
        "{}{}: {}{suffix}",
        " ".repeat(line.indent()),
        entry.key,
        format_value(value)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::{CONFIG_TEMPLATE, CONFIG_USER_V3, lines, reserved, tree};

    fn run(template: &str, user: &str) -> Vec<String> {
        merge(&lines(template), &tree(user), &tree(template), &reserved())
    }

    fn has(merged: &[String], line: &str) -> bool {
        merged.iter().any(|l| l == line)
    }

    #[test]
    fn user_value_keeps_inline_comment() {
        let template = "settings:\n  debug: false  # enables verbose logs\n";
        let merged = run(template, "settings:\n  debug: true\n");
        assert_eq!(merged[1], "  debug: true  # enables verbose logs");
    }

    #[test]
    fn missing_key_keeps_template_text_and_comment() {
        let template = "enchantments:\n  # allow unbreaking\n  UNBREAKING: true\n  MENDING: true\n";
        let merged = run(template, "enchantments:\n  MENDING: false\n");
        assert_eq!(
            merged,
            vec![
                "enchantments:",
                "  # allow unbreaking",
                "  UNBREAKING: true",
                "  MENDING: false",
            ]
        );
    }

    #[test]
    fn unknown_user_keys_are_dropped() {
        let merged = run("debug: false\n", "debug: true\nlegacy_option: 5\n");
        assert_eq!(merged, vec!["debug: true"]);
    }

    #[test]
    fn reserved_keys_copy_template_line() {
        let merged = run("config_version: 5\ndebug: false\n", "config_version: 3\n");
        assert_eq!(merged[0], "config_version: 5");
    }

    #[test]
    fn user_list_replaces_template_items() {
        let template = "worlds:\n  # defaults\n  - world\n  - world_nether\nnext: 1\n";
        let merged = run(template, "worlds:\n  - minecraft:overworld\n  - creative\n");
        assert_eq!(
            merged,
            vec!["worlds:", "  - minecraft:overworld", "  - creative", "next: 1"]
        );
    }

    #[test]
    fn nested_list_is_indented_under_key() {
        let template = "rules:\n  worlds:\n    - world\n  strict: true\n";
        let merged = run(template, "rules:\n  worlds:\n    - a\n    - b\n  strict: false\n");
        assert_eq!(
            merged,
            vec!["rules:", "  worlds:", "    - a", "    - b", "  strict: false"]
        );
    }

    #[test]
    fn compact_list_at_key_indent_is_replaced() {
        let template = "worlds:\n- world\n- world_nether\ndebug: false\n";
        let merged = run(template, "worlds:\n- lobby\n");
        assert_eq!(merged, vec!["worlds:", "  - lobby", "debug: false"]);
    }

    #[test]
    fn blank_line_between_items_is_skipped() {
        let template = "worlds:\n  - world\n\n  - world_nether\nnext: 1\n";
        let merged = run(template, "worlds: [lobby]\n");
        assert_eq!(merged, vec!["worlds:", "  - lobby", "next: 1"]);
        assert_eq!(tree(&merged.join("\n")).get("worlds").unwrap().as_list().unwrap().len(), 1);
    }

    #[test]
    fn comment_inside_compact_list_is_skipped() {
        let template = "worlds:\n- world\n# the nether\n- world_nether\nnext: 1\n";
        let merged = run(template, "worlds: [lobby]\n");
        assert_eq!(merged, vec!["worlds:", "  - lobby", "next: 1"]);
        let out = tree(&merged.join("\n"));
        assert_eq!(out.get_int("next"), Some(1));
    }

    #[test]
    fn trivia_after_list_is_kept() {
        let template = "worlds:\n  - world\n\n# Next section\nnext: 1\n";
        let merged = run(template, "worlds: [lobby]\n");
        assert_eq!(
            merged,
            vec!["worlds:", "  - lobby", "", "# Next section", "next: 1"]
        );
    }

    #[test]
    fn empty_user_list_stays_a_list() {
        let template = "worlds:  # where rules apply\n  - world\n";
        let merged = run(template, "worlds: []\n");
        assert_eq!(merged, vec!["worlds: []  # where rules apply"]);
        assert!(tree(&merged.join("\n")).get("worlds").unwrap().as_list().unwrap().is_empty());
    }

    #[test]
    fn absent_user_list_keeps_defaults() {
        let template = "worlds:\n  - world\n  - world_nether\n";
        let merged = run(template, "other: 1\n");
        assert_eq!(merged, vec!["worlds:", "  - world", "  - world_nether"]);
    }

    #[test]
    fn scalar_where_list_expected_keeps_defaults() {
        let template = "worlds:\n  - world\n";
        let merged = run(template, "worlds: everywhere\n");
        assert_eq!(merged, vec!["worlds:", "  - world"]);
    }

    #[test]
    fn list_where_scalar_expected_keeps_default() {
        let merged = run("mode: fast\n", "mode:\n  - a\n");
        assert_eq!(merged, vec!["mode: fast"]);
    }

    #[test]
    fn section_where_scalar_expected_keeps_default() {
        let merged = run("mode: fast\n", "mode:\n  inner: 1\n");
        assert_eq!(merged, vec!["mode: fast"]);
    }

    #[test]
    fn inline_list_takes_user_list() {
        let merged = run("tags: []\n", "tags:\n  - a\n  - b\n");
        assert_eq!(merged, vec!["tags: [a, b]"]);
    }

    #[test]
    fn null_default_accepts_user_scalar() {
        let merged = run("motd:\nnext: 1\n", "motd: hello\n");
        assert_eq!(merged, vec!["motd: hello", "next: 1"]);
    }

    #[test]
    fn section_header_path_excludes_itself() {
        let template = "a:\n  b:\n    c: 1\n  d: 2\ne: 3\n";
        let merged = run(template, "a:\n  b:\n    c: 10\n  d: 20\ne: 30\n");
        assert_eq!(merged, vec!["a:", "  b:", "    c: 10", "  d: 20", "e: 30"]);
    }

    #[test]
    fn sections_pass_through_when_user_lacks_them() {
        let template = "protection:\n  per_level: 0.04\n";
        let merged = run(template, "debug: true\n");
        assert_eq!(merged, vec!["protection:", "  per_level: 0.04"]);
    }

    #[test]
    fn long_comment_gap_still_detects_section() {
        let mut template = String::from("section:\n");
        for n in 0..15 {
            template.push_str(&format!("  # note {n}\n"));
        }
        template.push_str("  value: 1\n");
        let merged = run(&template, "section:\n  value: 2\n");
        assert_eq!(merged.last().unwrap(), "  value: 2");
    }

    #[test]
    fn header_with_inline_comment_is_a_section() {
        let template = "limits:  # per player\n  max: 3\n";
        let merged = run(template, "limits:\n  max: 9\n");
        assert_eq!(merged, vec!["limits:  # per player", "  max: 9"]);
    }

    #[test]
    fn strings_are_requoted_when_needed() {
        let merged = run("prefix: \"[Elytra] \"\n", "prefix: \"&7Guard: \"\n");
        assert_eq!(merged, vec!["prefix: \"&7Guard: \""]);
    }

    #[test]
    fn document_marker_is_copied() {
        let merged = run("---\nkey: 1\n", "key: 2\n");
        assert_eq!(merged, vec!["---", "key: 2"]);
    }

    #[test]
    fn full_fixture_merge() {
        let merged = run(CONFIG_TEMPLATE, CONFIG_USER_V3);
        assert!(has(&merged, "debug: true  # enables verbose logs"));
        assert!(has(&merged, "  # allow unbreaking"));
        assert!(has(&merged, "  UNBREAKING: true"));
        assert!(has(&merged, "  MENDING: false"));
        assert!(has(&merged, "  THORNS: true"));
        assert!(has(&merged, "  per_level: 0.04"));
        assert!(has(&merged, "  - minecraft:overworld"));
        assert!(!has(&merged, "  - world_nether"));
        assert!(has(&merged, "  enabled: false"));
        assert!(has(&merged, "config_version: 5"));
        assert!(!merged.iter().any(|l| l.contains("legacy_option")));
        assert!(!merged.iter().any(|l| l.contains("interval")));
    }

    #[test]
    fn merged_output_reads_back_with_user_values() {
        let merged = run(CONFIG_TEMPLATE, CONFIG_USER_V3);
        let out = tree(&merged.join("\n"));
        let user = tree(CONFIG_USER_V3);
        let paths = [
            "debug",
            "enchantments.MENDING",
            "enchantments.THORNS",
            "worlds",
            "update-checker.enabled",
        ];
        for path in paths {
            assert_eq!(out.value(path), user.value(path), "value at {path}");
        }
    }
}
