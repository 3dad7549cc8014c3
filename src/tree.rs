//! Structured reader: a dotted-path view over a parsed YAML document.
//!
//! The merge engine never writes through this tree. It only asks questions
//! of it: does the user have a value at `a.b.c`, is that value a list, which
//! children does a section declare. Formatting is handled line by line
//! elsewhere, so the tree is free to forget comments and layout.
//!
//! Keys whose value is an explicit `null` (or left empty) are treated as
//! absent by [`ConfigTree::contains`] and [`ConfigTree::get`]; use
//! [`ConfigTree::declares`] to ask whether the key is spelled out at all.

use std::path::Path;

use serde_yaml::{Mapping, Value};

use crate::error::MigrateError;
use crate::line::{ConfigLine, LineKind};

/// A borrowed view of the value stored at a dotted path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Node<'a> {
    Scalar(&'a Value),
    List(&'a [Value]),
    Section(&'a Mapping),
}

/// Shape of a [`Node`], used to decide whether a user value may replace a default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Scalar,
    List,
    Section,
}

impl<'a> Node<'a> {
    fn of(value: &'a Value) -> Self {
        match value {
            Value::Sequence(seq) => Node::List(seq.as_slice()),
            Value::Mapping(map) => Node::Section(map),
            Value::Tagged(tagged) => Node::of(&tagged.value),
            other => Node::Scalar(other),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Scalar(_) => NodeKind::Scalar,
            Node::List(_) => NodeKind::List,
            Node::Section(_) => NodeKind::Section,
        }
    }

    /// The underlying list items, if this node is a list.
    pub fn as_list(&self) -> Option<&'a [Value]> {
        match self {
            Node::List(items) => Some(items),
            _ => None,
        }
    }
}

/// A parsed config file addressable by dotted path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigTree {
    root: Mapping,
}

impl ConfigTree {
    /// Parse whole-file text. `path` is only used for error messages.
    ///
    /// An empty or comment-only document yields an empty tree. A document whose
    /// top level is not a mapping is rejected.
    pub fn parse(text: &str, path: &Path) -> Result<Self, MigrateError> {
        let has_content = text
            .lines()
            .map(ConfigLine::new)
            .any(|line| !matches!(line.kind(), LineKind::Blank | LineKind::Comment));
        if !has_content {
            return Ok(Self::default());
        }

        let value: Value = serde_yaml::from_str(text).map_err(|source| MigrateError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;

        match value {
            Value::Null => Ok(Self::default()),
            Value::Mapping(root) => Ok(Self { root }),
            _ => Err(MigrateError::NotAMapping {
                path: path.to_path_buf(),
            }),
        }
    }

    /// Whether `path` holds a non-null value.
    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Whether `path` is spelled out in the document, even with a null value.
    pub fn declares(&self, path: &str) -> bool {
        self.lookup(path).is_some()
    }

    /// The non-null value at `path`.
    pub fn get(&self, path: &str) -> Option<Node<'_>> {
        self.value(path).map(Node::of)
    }

    /// The raw non-null value at `path`.
    pub fn value(&self, path: &str) -> Option<&Value> {
        match self.lookup(path)? {
            Value::Null => None,
            value => Some(value),
        }
    }

    pub fn is_section(&self, path: &str) -> bool {
        matches!(self.get(path), Some(Node::Section(_)))
    }

    /// Immediate child key names of the section at `path`, in document order.
    /// The empty path names the document root.
    pub fn keys_of(&self, path: &str) -> Vec<String> {
        let section = if path.is_empty() {
            Some(&self.root)
        } else {
            match self.get(path) {
                Some(Node::Section(map)) => Some(map),
                _ => None,
            }
        };
        section
            .map(|map| map.keys().filter_map(key_name).collect())
            .unwrap_or_default()
    }

    /// Integer value at `path`, if it holds one.
    pub fn get_int(&self, path: &str) -> Option<i64> {
        match self.get(path)? {
            Node::Scalar(value) => value.as_i64(),
            _ => None,
        }
    }

    fn lookup(&self, path: &str) -> Option<&Value> {
        let mut current = &self.root;
        let mut segments = path.split('.').peekable();
        while let Some(segment) = segments.next() {
            let value = entry(current, segment)?;
            if segments.peek().is_none() {
                return Some(value);
            }
            current = match value {
                Value::Mapping(map) => map,
                Value::Tagged(tagged) => tagged.value.as_mapping()?,
                _ => return None,
            };
        }
        None
    }
}

/// Find the value stored under `name` in `map`, comparing keys by their text.
fn entry<'a>(map: &'a Mapping, name: &str) -> Option<&'a Value> {
    map.iter()
        .find(|(key, _)| key_name(key).as_deref() == Some(name))
        .map(|(_, value)| value)
}

/// Render a mapping key the way it appears in a dotted path.
fn key_name(key: &Value) -> Option<String> {
    match key {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
