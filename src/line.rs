//! Line classification for the template dialect.
//!
//! Every template line is one of: blank, full-line `#` comment, list item
//! (`- value`), key entry (`key: value`, `key:`), or something else that is
//! copied through untouched. Indentation is the count of leading spaces.

/// Role of a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    Comment,
    ListItem,
    Entry,
    Other,
}

/// One raw line with its derived indentation and kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigLine<'a> {
    raw: &'a str,
    indent: usize,
    kind: LineKind,
}

/// A `key: value  # comment` line split into its parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry<'a> {
    pub key: &'a str,
    /// Value text with surrounding whitespace and any inline comment removed.
    pub value: &'a str,
    pub comment: Option<InlineComment<'a>>,
}

/// A trailing `# ...` comment and the whitespace that separated it from the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InlineComment<'a> {
    pub gap: &'a str,
    pub text: &'a str,
}

impl InlineComment<'_> {
    /// Render as a suffix to append after a value.
    pub fn suffix(&self) -> String {
        let gap = if self.gap.is_empty() { " " } else { self.gap };
        format!("{gap}{}", self.text)
    }
}

impl<'a> ConfigLine<'a> {
    pub fn new(raw: &'a str) -> Self {
        let trimmed = raw.trim();
        let indent = raw.len() - raw.trim_start_matches(' ').len();
        let kind = if trimmed.is_empty() {
            LineKind::Blank
        } else if trimmed.starts_with('#') {
            LineKind::Comment
        } else if trimmed.starts_with('-') {
            LineKind::ListItem
        } else if trimmed.contains(':') {
            LineKind::Entry
        } else {
            LineKind::Other
        };
        Self { raw, indent, kind }
    }

    pub fn raw(&self) -> &'a str {
        self.raw
    }

    pub fn trimmed(&self) -> &'a str {
        self.raw.trim()
    }

    pub fn indent(&self) -> usize {
        self.indent
    }

    pub fn kind(&self) -> LineKind {
        self.kind
    }

    /// Blank lines and full-line comments.
    pub fn is_trivia(&self) -> bool {
        matches!(self.kind, LineKind::Blank | LineKind::Comment)
    }

    /// Split an entry line at its first colon. `None` for any other kind.
    pub fn entry(&self) -> Option<Entry<'a>> {
        if self.kind != LineKind::Entry {
            return None;
        }
        let trimmed = self.trimmed();
        let (key, rest) = trimmed.split_once(':')?;
        let (value, comment) = split_comment(rest);
        Some(Entry {
            key: key.trim(),
            value,
            comment,
        })
    }
}

/// Separate a value from a trailing inline comment.
///
/// A `#` starts a comment only when it is preceded by whitespace and sits
/// outside a leading quoted scalar.
pub fn split_comment(rest: &str) -> (&str, Option<InlineComment<'_>>) {
    let start = rest.len() - rest.trim_start().len();
    let body = &rest[start..];
    let scan_from = match body.chars().next() {
        Some(quote @ ('"' | '\'')) => match closing_quote(body, quote) {
            Some(end) => start + end + 1,
            None => rest.len(),
        },
        _ => start,
    };

    let hash = rest[scan_from..].char_indices().find_map(|(offset, c)| {
        let at = scan_from + offset;
        let after_space = at == 0 || rest[..at].ends_with(char::is_whitespace);
        (c == '#' && after_space).then_some(at)
    });

    match hash {
        Some(at) => {
            let before = &rest[..at];
            let value = before.trim();
            let gap = &before[before.trim_end().len()..];
            let gap = if value.is_empty() { " " } else { gap };
            (
                value,
                Some(InlineComment {
                    gap,
                    text: rest[at..].trim_end(),
                }),
            )
        }
        None => (rest.trim(), None),
    }
}

/// Byte offset of the quote that closes the scalar opened at `body[0]`.
fn closing_quote(body: &str, quote: char) -> Option<usize> {
    let mut chars = body.char_indices().skip(1).peekable();
    while let Some((i, c)) = chars.next() {
        match (quote, c) {
            ('"', '\\') => {
                chars.next();
            }
            ('\'', '\'') if matches!(chars.peek(), Some((_, '\''))) => {
                chars.next();
            }
            (q, c) if q == c => return Some(i),
            _ => {}
        }
    }
    None
}
