//! Path-based value extraction from JSON documents
//!
//! Implements the small de-facto JSON-Path dialect the viewer configuration
//! uses: a `$` root followed by property access and numeric array indexing
//! in dot or bracket notation. Queries are parsed into a typed step sequence
//! by a recursive-descent scanner and evaluated by plain traversal. A query
//! that cannot be resolved against the document degrades to `null` instead
//! of raising; only a syntactically broken path is an error.

use serde_json::Value;
use thiserror::Error;

/// One step of a parsed path query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathStep {
    /// Property access by name
    Property(String),
    /// Array access by zero-based index
    Index(usize),
}

/// Errors raised while parsing a path query
#[derive(Debug, Error)]
pub enum PathError {
    /// The query does not start with the `$` root marker
    #[error("JSON path must start with '$': '{0}'")]
    MissingRoot(String),

    /// A bracket segment is malformed (unterminated or not an index/quoted name)
    #[error("Invalid bracket segment in path '{0}' at byte {1}")]
    InvalidBracket(String, usize),

    /// A numeric index does not fit in usize
    #[error("Array index out of representable range in path '{0}'")]
    IndexOverflow(String),
}

/// Parses a single path query into its step sequence
///
/// Accepted forms: `$`, `$.a.b`, `$.items[0].name`, `$['a']["b"]`,
/// `$.list.0` (a bare all-digit dot segment is an index). Empty dot
/// segments are skipped.
pub fn parse_path(path: &str) -> Result<Vec<PathStep>, PathError> {
    let rest = path
        .strip_prefix('$')
        .ok_or_else(|| PathError::MissingRoot(path.to_string()))?;

    let bytes = rest.as_bytes();
    let mut steps = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        match bytes[pos] {
            b'.' => {
                pos += 1;
            }
            b'[' => {
                let (step, next) = parse_bracket(path, rest, pos)?;
                steps.push(step);
                pos = next;
            }
            _ => {
                let start = pos;
                while pos < bytes.len() && bytes[pos] != b'.' && bytes[pos] != b'[' {
                    pos += 1;
                }
                let segment = &rest[start..pos];
                steps.push(segment_step(path, segment)?);
            }
        }
    }

    Ok(steps)
}

/// Parses one `[...]` group starting at `open`; returns the step and the
/// position just past the closing bracket
fn parse_bracket(path: &str, rest: &str, open: usize) -> Result<(PathStep, usize), PathError> {
    let inner_start = open + 1;
    let close = rest[inner_start..]
        .find(']')
        .map(|i| inner_start + i)
        .ok_or_else(|| PathError::InvalidBracket(path.to_string(), open))?;
    let inner = &rest[inner_start..close];

    let step = if let Some(quoted) = strip_quotes(inner) {
        PathStep::Property(quoted.to_string())
    } else if !inner.is_empty() && inner.bytes().all(|b| b.is_ascii_digit()) {
        let index = inner
            .parse::<usize>()
            .map_err(|_| PathError::IndexOverflow(path.to_string()))?;
        PathStep::Index(index)
    } else {
        return Err(PathError::InvalidBracket(path.to_string(), open));
    };

    Ok((step, close + 1))
}

/// Strips matching single or double quotes, if present
fn strip_quotes(s: &str) -> Option<&str> {
    for quote in ['\'', '"'] {
        if s.len() >= 2 && s.starts_with(quote) && s.ends_with(quote) {
            return Some(&s[1..s.len() - 1]);
        }
    }
    None
}

/// Turns a bare dot segment into a step; all-digit segments are indexes
fn segment_step(path: &str, segment: &str) -> Result<PathStep, PathError> {
    if !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()) {
        let index = segment
            .parse::<usize>()
            .map_err(|_| PathError::IndexOverflow(path.to_string()))?;
        Ok(PathStep::Index(index))
    } else {
        Ok(PathStep::Property(segment.to_string()))
    }
}

/// Walks the document along the parsed steps
///
/// Returns `None` for a missing property, an out-of-range index, or a step
/// applied to a value of the wrong shape.
pub fn evaluate<'a>(document: &'a Value, steps: &[PathStep]) -> Option<&'a Value> {
    let mut current = document;
    for step in steps {
        current = match step {
            PathStep::Property(name) => current.as_object()?.get(name)?,
            PathStep::Index(i) => current.as_array()?.get(*i)?,
        };
    }
    Some(current)
}

/// Evaluates a comma-separated list of path queries against a document
///
/// Each comma-separated segment is trimmed and evaluated independently;
/// the result preserves the segment order and evaluates duplicates each
/// time. Unresolvable queries contribute `null`.
pub fn extract_all(document: &Value, paths: &str) -> Result<Vec<Value>, PathError> {
    let mut values = Vec::new();
    for raw in paths.split(',') {
        let steps = parse_path(raw.trim())?;
        let value = evaluate(document, &steps)
            .cloned()
            .unwrap_or(Value::Null);
        values.push(value);
    }
    Ok(values)
}

/// Renders one extracted value for display
///
/// Strings render without quotes; other primitives use their JSON text;
/// objects and arrays are serialized to compact canonical JSON.
pub fn value_to_display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Object(_) | Value::Array(_) => value.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc() -> Value {
        json!({
            "a": 1,
            "b": 2,
            "name": "oneview",
            "nested": {"list": [{"id": "x"}, {"id": "y"}]},
            "flags": [true, false]
        })
    }

    #[test]
    fn test_root_only_returns_whole_document() {
        let d = doc();
        let steps = parse_path("$").expect("Failed to parse root path");
        assert!(steps.is_empty());
        assert_eq!(evaluate(&d, &steps), Some(&d));
    }

    #[test]
    fn test_dot_property_access() {
        let d = doc();
        let steps = parse_path("$.a").unwrap();
        assert_eq!(steps, vec![PathStep::Property("a".to_string())]);
        assert_eq!(evaluate(&d, &steps), Some(&json!(1)));
    }

    #[test]
    fn test_mixed_dot_and_bracket_notation() {
        let d = doc();
        let steps = parse_path("$.nested.list[1].id").unwrap();
        assert_eq!(
            steps,
            vec![
                PathStep::Property("nested".to_string()),
                PathStep::Property("list".to_string()),
                PathStep::Index(1),
                PathStep::Property("id".to_string()),
            ]
        );
        assert_eq!(evaluate(&d, &steps), Some(&json!("y")));
    }

    #[test]
    fn test_quoted_bracket_properties() {
        let d = doc();
        for path in ["$['nested']['list'][0]['id']", "$[\"nested\"][\"list\"][0][\"id\"]"] {
            let steps = parse_path(path).unwrap();
            assert_eq!(evaluate(&d, &steps), Some(&json!("x")), "path: {}", path);
        }
    }

    #[test]
    fn test_bare_numeric_dot_segment_is_an_index() {
        let d = doc();
        let steps = parse_path("$.flags.0").unwrap();
        assert_eq!(
            steps,
            vec![PathStep::Property("flags".to_string()), PathStep::Index(0)]
        );
        assert_eq!(evaluate(&d, &steps), Some(&json!(true)));
    }

    #[test]
    fn test_property_directly_after_root_without_dot() {
        let d = doc();
        let steps = parse_path("$a").unwrap();
        assert_eq!(evaluate(&d, &steps), Some(&json!(1)));
    }

    #[test]
    fn test_missing_property_evaluates_to_none() {
        let d = doc();
        let steps = parse_path("$.does.not.exist").unwrap();
        assert_eq!(evaluate(&d, &steps), None);
    }

    #[test]
    fn test_out_of_range_index_evaluates_to_none() {
        let d = doc();
        let steps = parse_path("$.flags[5]").unwrap();
        assert_eq!(evaluate(&d, &steps), None);
    }

    #[test]
    fn test_traversal_through_scalar_evaluates_to_none() {
        let d = doc();
        assert_eq!(evaluate(&d, &parse_path("$.a.b").unwrap()), None);
        assert_eq!(evaluate(&d, &parse_path("$.a[0]").unwrap()), None);
    }

    #[test]
    fn test_path_without_root_is_an_error() {
        assert!(matches!(
            parse_path("a.b"),
            Err(PathError::MissingRoot(_))
        ));
    }

    #[test]
    fn test_unterminated_bracket_is_an_error() {
        assert!(matches!(
            parse_path("$.list[0"),
            Err(PathError::InvalidBracket(_, _))
        ));
    }

    #[test]
    fn test_non_numeric_unquoted_bracket_is_an_error() {
        assert!(matches!(
            parse_path("$.list[abc]"),
            Err(PathError::InvalidBracket(_, _))
        ));
    }

    #[test]
    fn test_extract_all_single_resolvable_path() {
        let values = extract_all(&doc(), "$.a").unwrap();
        assert_eq!(values, vec![json!(1)]);
    }

    #[test]
    fn test_extract_all_unresolvable_path_yields_null() {
        let values = extract_all(&doc(), "$.missing").unwrap();
        assert_eq!(values, vec![Value::Null]);
    }

    #[test]
    fn test_extract_all_is_concatenation_in_order() {
        let d = doc();
        let combined = extract_all(&d, "$.a, $.b").unwrap();
        let mut separate = extract_all(&d, "$.a").unwrap();
        separate.extend(extract_all(&d, "$.b").unwrap());
        assert_eq!(combined, separate);
        assert_eq!(combined, vec![json!(1), json!(2)]);
    }

    #[test]
    fn test_extract_all_evaluates_duplicates_independently() {
        let values = extract_all(&doc(), "$.a,$.a").unwrap();
        assert_eq!(values, vec![json!(1), json!(1)]);
    }

    #[test]
    fn test_extract_all_trims_segments() {
        let values = extract_all(&doc(), "  $.a ,   $.name ").unwrap();
        assert_eq!(values, vec![json!(1), json!("oneview")]);
    }

    #[test]
    fn test_value_to_display_string_is_unquoted() {
        assert_eq!(value_to_display(&json!("hello")), "hello");
    }

    #[test]
    fn test_value_to_display_primitives() {
        assert_eq!(value_to_display(&json!(42)), "42");
        assert_eq!(value_to_display(&json!(1.5)), "1.5");
        assert_eq!(value_to_display(&json!(true)), "true");
        assert_eq!(value_to_display(&Value::Null), "null");
    }

    #[test]
    fn test_value_to_display_serializes_containers() {
        assert_eq!(value_to_display(&json!({"a": 1})), "{\"a\":1}");
        assert_eq!(value_to_display(&json!([1, 2])), "[1,2]");
    }
}
