//! Argument accessors shared by the handlers.
//!
//! Models do not always respect the declared `string` types, so numbers and
//! booleans are accepted wherever text is expected.

use openui_core::Arguments;

/// The argument as text. Strings are returned as-is, other scalars by their
/// JSON form; `null` and missing keys are `None`.
pub(crate) fn text(args: &Arguments, key: &str) -> Option<String> {
    match args.get(key)? {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Splits a comma-separated list, trimming each entry.
pub(crate) fn comma_list(raw: &str) -> Vec<String> {
    raw.split(',').map(|s| s.trim().to_string()).collect()
}

/// Leading integer of `raw` the way `parseInt` reads it: optional sign,
/// then digits, anything after is ignored.
pub(crate) fn leading_int(raw: &str) -> Option<i64> {
    let t = raw.trim_start();
    let (negative, digits) = match t.as_bytes().first() {
        Some(b'-') => (true, &t[1..]),
        Some(b'+') => (false, &t[1..]),
        _ => (false, t),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let n: i64 = digits[..end].parse().ok()?;
    Some(if negative { -n } else { n })
}
