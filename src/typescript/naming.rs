//! Identifier and key helpers shared by the emitter and the aggregate synthesizer.

use std::collections::HashSet;
use std::sync::LazyLock;

/// TypeScript reserved words that cannot be used as type names.
static TS_RESERVED_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete",
        "do", "else", "enum", "export", "extends", "false", "finally", "for", "function", "if",
        "import", "in", "instanceof", "new", "null", "return", "super", "switch", "this",
        "throw", "true", "try", "typeof", "var", "void", "while", "with", "yield", "let",
        "static", "implements", "interface", "package", "private", "protected", "public",
        "await", "any", "boolean", "never", "number", "object", "string", "symbol", "unknown",
    ]
    .into_iter()
    .collect()
});

/// Whether `name` must be quoted when used as a property key.
pub fn needs_quotes(name: &str) -> bool {
    if is_numeric_key(name) {
        return false;
    }
    name.is_empty()
        || !name
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        || !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

// Canonical numeric literals such as HTTP status codes are valid keys.
fn is_numeric_key(name: &str) -> bool {
    !name.is_empty()
        && name.chars().all(|c| c.is_ascii_digit())
        && (name.len() == 1 || !name.starts_with('0'))
}

/// Escape a string for a double-quoted TypeScript literal.
pub fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}

/// Double-quote `s` as a TypeScript string literal.
pub fn quoted(s: &str) -> String {
    format!("\"{}\"", escape_string(s))
}

/// Property key as written in the output: bare when possible, quoted otherwise.
pub fn property_key(name: &str) -> String {
    if needs_quotes(name) {
        quoted(name)
    } else {
        name.to_string()
    }
}

/// Whether `name` can be used as an exported type name.
pub fn is_valid_identifier(name: &str) -> bool {
    !is_numeric_key(name) && !needs_quotes(name) && !TS_RESERVED_WORDS.contains(name)
}

/// Convert an identifier to snake_case.
///
/// Words break between a lowercase letter or digit and an uppercase letter,
/// and before the last capital of an acronym (`HTMLParser` → `html_parser`).
/// Any run of non-alphanumeric characters is a separator. Letters outside
/// ASCII count as word characters (`Café` → `café`).
pub fn snake_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_numeric() || (prev.is_uppercase() && next_is_lower) {
                words.push(std::mem::take(&mut current));
            }
        }
        current.extend(c.to_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }

    words.join("_")
}
