//! Nesting context while walking template lines top to bottom.

/// Stack of `(key, indent)` pairs for the sections enclosing the current line.
#[derive(Debug, Default, Clone)]
pub struct PathStack {
    entries: Vec<(String, usize)>,
}

impl PathStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Leave every section declared at `indent` or deeper.
    ///
    /// Must run before a line's path is computed, so a section header's own
    /// path never includes itself or a sibling.
    pub fn enter(&mut self, indent: usize) {
        while self
            .entries
            .last()
            .is_some_and(|(_, depth)| *depth >= indent)
        {
            self.entries.pop();
        }
    }

    pub fn push(&mut self, key: &str, indent: usize) {
        self.entries.push((key.to_string(), indent));
    }

    /// Dotted path of `key` within the current context.
    pub fn path_for(&self, key: &str) -> String {
        let mut path = String::new();
        for (name, _) in &self.entries {
            path.push_str(name);
            path.push('.');
        }
        path.push_str(key);
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_level_key_has_bare_path() {
        let stack = PathStack::new();
        assert_eq!(stack.path_for("debug"), "debug");
    }

    #[test]
    fn nested_keys_join_with_dots() {
        let mut stack = PathStack::new();
        stack.push("a", 0);
        stack.push("b", 2);
        stack.enter(4);
        assert_eq!(stack.path_for("c"), "a.b.c");
    }

    #[test]
    fn sibling_pops_previous_section() {
        let mut stack = PathStack::new();
        stack.push("first", 0);
        stack.enter(0);
        assert_eq!(stack.path_for("second"), "second");
    }

    #[test]
    fn dedent_pops_several_levels() {
        let mut stack = PathStack::new();
        stack.push("a", 0);
        stack.push("b", 2);
        stack.push("c", 4);
        stack.enter(2);
        assert_eq!(stack.path_for("d"), "a.d");
    }
}
