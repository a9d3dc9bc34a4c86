//! Formatting utilities: elapsed time and structured value inspection.

use std::time::Duration;

use serde_json::Value;

/// Nesting depth shown by [`inspect`] before collapsing to `[Object]`/`[Array]`.
pub const INSPECT_DEPTH: usize = 3;

/// Rendered values longer than this are broken over several lines.
const INSPECT_LINE_WIDTH: usize = 72;

/// Format a duration for display (e.g., "12ms", "2.8s").
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use softspoken_core::format::format_elapsed;
///
/// assert_eq!(format_elapsed(Duration::from_millis(12)), "12ms");
/// assert_eq!(format_elapsed(Duration::from_millis(2800)), "2.8s");
/// ```
pub fn format_elapsed(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 0.1 {
        format!("{:.0}ms", secs * 1000.0)
    } else {
        format!("{:.1}s", secs)
    }
}

/// Render a JSON value the way a developer console would, down to `depth`
/// levels of nesting.
///
/// Top-level strings are returned verbatim; nested strings are quoted.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use softspoken_core::format::inspect;
///
/// assert_eq!(inspect(&json!({"a": 1, "b": [true, null]}), 3), "{ a: 1, b: [ true, null ] }");
/// assert_eq!(inspect(&json!({"a": {"b": {}}}), 0), "{ a: [Object] }");
/// assert_eq!(inspect(&json!("plain"), 3), "plain");
/// ```
pub fn inspect(value: &Value, depth: usize) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => render(other, 0, depth),
    }
}

fn render(value: &Value, level: usize, depth: usize) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => quote(s),
        Value::Array(items) if items.is_empty() => "[]".to_string(),
        Value::Object(map) if map.is_empty() => "{}".to_string(),
        Value::Array(_) if level > depth => "[Array]".to_string(),
        Value::Object(_) if level > depth => "[Object]".to_string(),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().map(|v| render(v, level + 1, depth)).collect();
            group('[', ']', &parts, level)
        }
        Value::Object(map) => {
            let parts: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}: {}", key(k), render(v, level + 1, depth)))
                .collect();
            group('{', '}', &parts, level)
        }
    }
}

fn group(open: char, close: char, parts: &[String], level: usize) -> String {
    let single = format!("{open} {} {close}", parts.join(", "));
    if single.len() <= INSPECT_LINE_WIDTH && !single.contains('\n') {
        return single;
    }

    let inner = "  ".repeat(level + 1);
    let outer = "  ".repeat(level);
    let body = parts
        .iter()
        .map(|p| format!("{inner}{p}"))
        .collect::<Vec<_>>()
        .join(",\n");
    format!("{open}\n{body}\n{outer}{close}")
}

fn key(k: &str) -> String {
    let mut chars = k.chars();
    let is_ident = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    if is_ident {
        k.to_string()
    } else {
        quote(k)
    }
}

fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
}
