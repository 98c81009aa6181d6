//! Go literal helpers.

/// Quote a value as an interpreted Go string literal, escaping every value.
pub fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for ch in value.chars() {
        match ch {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            _ => quoted.push(ch),
        }
    }
    quoted.push('"');
    quoted
}

/// Wrap a struct tag in a raw string literal. A tag that is already a raw
/// literal is kept; one containing a backtick falls back to `quote`.
pub fn raw(value: &str) -> String {
    if is_raw_literal(value) {
        value.to_string()
    } else if value.contains('`') {
        quote(value)
    } else {
        format!("`{value}`")
    }
}

fn is_raw_literal(value: &str) -> bool {
    value.len() >= 2
        && value.starts_with('`')
        && value.ends_with('`')
        && !value[1..value.len() - 1].contains('`')
}

pub fn quote_all(values: &[String]) -> String {
    values
        .iter()
        .map(|value| quote(value))
        .collect::<Vec<_>>()
        .join(", ")
}
