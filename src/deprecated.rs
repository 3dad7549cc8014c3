//! Detection of user keys the current template no longer recognizes.
//!
//! Reporting only: the merge engine drops these paths on its own, since it
//! emits nothing the template does not contain.

use std::collections::BTreeSet;

use crate::tree::ConfigTree;

/// Dotted paths present in `user` but absent from `template`.
///
/// A deprecated section is reported once; its children are implied. Paths
/// that exist in both trees with a different shape are not reported. Keys in
/// `reserved` are skipped at every level.
pub fn find_deprecated(
    user: &ConfigTree,
    template: &ConfigTree,
    reserved: &[String],
) -> BTreeSet<String> {
    let mut found = BTreeSet::new();
    collect(user, template, "", reserved, &mut found);
    found
}

fn collect(
    user: &ConfigTree,
    template: &ConfigTree,
    base: &str,
    reserved: &[String],
    found: &mut BTreeSet<String>,
) {
    for key in user.keys_of(base) {
        if reserved.contains(&key) {
            continue;
        }
        let path = if base.is_empty() {
            key
        } else {
            format!("{base}.{key}")
        };

        if !template.declares(&path) {
            found.insert(path);
        } else if user.is_section(&path) && template.is_section(&path) {
            collect(user, template, &path, reserved, found);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::{CONFIG_TEMPLATE, CONFIG_USER_V3, reserved, tree};

    fn detect(user: &str, template: &str) -> Vec<String> {
        find_deprecated(&tree(user), &tree(template), &reserved())
            .into_iter()
            .collect()
    }

    #[test]
    fn top_level_obsolete_key() {
        assert_eq!(
            detect("legacy_option: 5\ndebug: true\n", "debug: false\n"),
            vec!["legacy_option"]
        );
    }

    #[test]
    fn nested_obsolete_key() {
        let found = detect(
            "update-checker:\n  enabled: false\n  interval: 60\n",
            "update-checker:\n  enabled: true\n",
        );
        assert_eq!(found, vec!["update-checker.interval"]);
    }

    #[test]
    fn obsolete_section_reported_once() {
        let found = detect("old:\n  a: 1\n  b:\n    c: 2\n", "new: 1\n");
        assert_eq!(found, vec!["old"]);
    }

    #[test]
    fn shape_mismatch_is_not_deprecation() {
        let found = detect("mode:\n  fast: true\n", "mode: fast\n");
        assert!(found.is_empty());
    }

    #[test]
    fn reserved_keys_are_skipped() {
        let found = detect("config_version: 1\nmessages_version: 1\n", "debug: false\n");
        assert!(found.is_empty());
    }

    #[test]
    fn null_template_key_still_counts() {
        let found = detect("motd: hello\n", "motd:\n");
        assert!(found.is_empty());
    }

    #[test]
    fn fixture_deprecations() {
        assert_eq!(
            detect(CONFIG_USER_V3, CONFIG_TEMPLATE),
            vec!["legacy_option", "update-checker.interval"]
        );
    }
}
