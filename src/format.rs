//! Render structured values back into the template dialect.
//!
//! The output must read back as the same value: a string that looks like a
//! boolean, a number, a comment or a mapping key is double-quoted.

use serde_yaml::Value;

/// Format a value for use after `key: `.
pub fn format_value(value: &Value) -> String {
    format_in(value, false)
}

/// Format one item of a block list (the text after `- `).
///
/// Strings the formatter quoted for inline safety are emitted bare when the
/// bare form still reads back as the same list item, e.g. `minecraft:stone`.
pub fn list_item_text(item: &Value) -> String {
    let text = format_value(item);
    if let Value::String(s) = item
        && text.starts_with('"')
        && reads_back_as_item(s)
    {
        return s.clone();
    }
    text
}

fn format_in(value: &Value, flow: bool) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => {
            if needs_quotes(s, flow) {
                quote(s)
            } else {
                s.clone()
            }
        }
        Value::Sequence(items) => {
            let parts: Vec<String> = items.iter().map(|v| format_in(v, true)).collect();
            format!("[{}]", parts.join(", "))
        }
        Value::Mapping(map) => {
            let parts: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}: {}", format_in(k, true), format_in(v, true)))
                .collect();
            format!("{{{}}}", parts.join(", "))
        }
        Value::Tagged(tagged) => format!("{} {}", tagged.tag, format_in(&tagged.value, flow)),
    }
}

/// Whether a string must be double-quoted to survive a re-read.
pub fn needs_quotes(s: &str, flow: bool) -> bool {
    if s.contains(':') || s.contains('#') || s.trim().is_empty() {
        return true;
    }
    if ["true", "false", "null"]
        .iter()
        .any(|word| s.eq_ignore_ascii_case(word))
    {
        return true;
    }
    if is_integer_text(s) {
        return true;
    }
    if flow && s.contains([',', '[', ']', '{', '}']) {
        return true;
    }
    !reads_back_as(s)
}

fn is_integer_text(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn reads_back_as(s: &str) -> bool {
    matches!(serde_yaml::from_str::<Value>(s), Ok(Value::String(ref parsed)) if parsed == s)
}

fn reads_back_as_item(s: &str) -> bool {
    match serde_yaml::from_str::<Value>(&format!("- {s}")) {
        Ok(Value::Sequence(items)) => {
            matches!(items.as_slice(), [Value::String(parsed)] if parsed == s)
        }
        _ => false,
    }
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
