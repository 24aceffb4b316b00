//! Display formatting for extracted values
//!
//! Turns the ordered value list of a card into its final display string
//! using the card's format template. The template is scanned once into
//! literal and placeholder segments, then rendered in a single
//! reconstruction pass, so the result does not depend on the order the
//! placeholders appear in.

/// Sentinel shown when a card has no value to display
pub const NO_DATA: &str = "no data";

/// One scanned segment of a format template
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// Literal text copied through unchanged
    Literal(String),
    /// The whole-set `{value}` placeholder
    Whole,
    /// A 1-indexed `{valueN}` placeholder
    Positional(usize),
}

/// Scans a template into literal and placeholder segments
fn scan(template: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        let (before, from_brace) = rest.split_at(open);
        literal.push_str(before);

        match placeholder_at(from_brace) {
            Some((segment, consumed)) => {
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(segment);
                rest = &from_brace[consumed..];
            }
            None => {
                // not a placeholder, keep the brace as literal text
                literal.push('{');
                rest = &from_brace[1..];
            }
        }
    }

    literal.push_str(rest);
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    segments
}

/// Recognizes `{value}` or `{valueN}` at the start of `s`
///
/// Returns the segment and the number of bytes consumed, or `None` when the
/// text at the brace is not a placeholder.
fn placeholder_at(s: &str) -> Option<(Segment, usize)> {
    let body = s.strip_prefix("{value")?;
    let close = body.find('}')?;
    let digits = &body[..close];
    let consumed = "{value".len() + close + 1;

    if digits.is_empty() {
        return Some((Segment::Whole, consumed));
    }
    if digits.bytes().all(|b| b.is_ascii_digit()) {
        let n = digits.parse::<usize>().ok()?;
        if n >= 1 {
            return Some((Segment::Positional(n), consumed));
        }
    }
    None
}

/// Formats a value list with a display template
///
/// Rules:
/// - a `None` or empty value set renders the [`NO_DATA`] sentinel;
/// - a template without placeholders is ignored and all values are joined
///   by `", "`;
/// - `{valueN}` is replaced by the N-th value (1-indexed), or the empty
///   string when N is out of range;
/// - `{value}` is replaced by the sole value when there is exactly one,
///   otherwise by all values joined by `", "`.
pub fn format_display(values: Option<&[String]>, template: &str) -> String {
    let values = match values {
        Some(v) if !v.is_empty() => v,
        _ => return NO_DATA.to_string(),
    };

    let segments = scan(template);
    let has_placeholder = segments
        .iter()
        .any(|s| !matches!(s, Segment::Literal(_)));
    if !has_placeholder {
        return values.join(", ");
    }

    let mut out = String::new();
    for segment in &segments {
        match segment {
            Segment::Literal(text) => out.push_str(text),
            Segment::Whole => {
                if values.len() == 1 {
                    out.push_str(&values[0]);
                } else {
                    out.push_str(&values.join(", "));
                }
            }
            Segment::Positional(n) => {
                if let Some(v) = values.get(n - 1) {
                    out.push_str(v);
                }
            }
        }
    }
    out
}
