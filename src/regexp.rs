//! Regex coercion for string-encoded patterns.
//!
//! Where-clause regex constraints arrive either as a bare pattern
//! (`"^a"`) or in delimited form with trailing flags (`"/^a/i"`). Both
//! coerce to a compiled [`Regex`]; malformed input is reported as an
//! error value, never a panic.

use regex_lite::{Regex, RegexBuilder};
use serde_json::Value;

use crate::error::{QueryError, QueryResult};

/// Whether a pattern is in delimited form with trailing flags
/// (`/pattern/flags`).
pub fn has_regex_flags(pattern: &str) -> bool {
    split_delimited(pattern).is_some()
}

/// Coerce a constraint value to a compiled regex.
///
/// A bare string compiles with no flags; a delimited string applies its
/// trailing flags. Only `i` (case-insensitive), `m` (multi-line), and
/// `g` (accepted for compatibility; match iteration already visits every
/// occurrence) are valid — anything else is an invalid-flags error.
/// Non-string values are invalid arguments.
///
/// ```rust
/// use quarry_query::to_regex;
/// use serde_json::json;
///
/// let re = to_regex(&json!("/abc/i")).unwrap();
/// assert!(re.is_match("xABCy"));
///
/// assert!(to_regex(&json!("/abc/z")).is_err());
/// assert!(to_regex(&json!(42)).is_err());
/// ```
pub fn to_regex(value: &Value) -> QueryResult<Regex> {
    let Some(pattern) = value.as_str() else {
        return Err(QueryError::invalid_parameter(
            "regular expression must be a string pattern or /pattern/flags literal",
        ));
    };

    let Some((expression, flags)) = split_delimited(pattern) else {
        return compile(RegexBuilder::new(pattern));
    };

    let mut builder = RegexBuilder::new(expression);
    let mut invalid_flags = Vec::new();
    for flag in flags.chars() {
        match flag {
            'i' => {
                builder.case_insensitive(true);
            }
            'm' => {
                builder.multi_line(true);
            }
            'g' => {}
            other => invalid_flags.push(other),
        }
    }
    if !invalid_flags.is_empty() {
        return Err(QueryError::invalid_parameter(format!(
            "invalid regular expression flags: {}",
            invalid_flags.iter().collect::<String>()
        )));
    }
    compile(builder)
}

fn compile(mut builder: RegexBuilder) -> QueryResult<Regex> {
    builder
        .build()
        .map_err(|err| QueryError::invalid_parameter(format!("invalid regular expression: {err}")))
}

/// Split a delimited pattern into `(expression, flags)`. Requires a
/// leading `/` and a non-empty trailing segment after the last `/`.
fn split_delimited(pattern: &str) -> Option<(&str, &str)> {
    if !pattern.starts_with('/') {
        return None;
    }
    let end = pattern.rfind('/')?;
    if end == 0 || end + 1 == pattern.len() {
        return None;
    }
    Some((&pattern[1..end], &pattern[end + 1..]))
}
