//! Stateless line scanning over a YAML-subset text buffer.
//!
//! Every function takes the whole buffer plus a byte offset and looks only at
//! the line that starts there. Lines end at `\n`; a trailing `\r` is treated
//! as whitespace. A line is a *key line* when it contains a `:`.
//!
//! Values are coerced by [`parse_scalar`] in a fixed order: integer, then
//! float, then string. Only a parse of the whole trimmed text counts, so
//! `115200abc` stays a string.
//!
//! # Example
//!
//! ```
//! use devtree::document::scanner;
//! use devtree::document::node::ScalarRef;
//!
//! let text = "Uart:\n    Baud: 115200\n";
//! let second = scanner::advance_line(text, 0);
//! assert_eq!(scanner::count_indent(text, second), Some(4));
//! assert_eq!(scanner::extract_key(text, second).unwrap(), "Baud");
//! assert_eq!(scanner::extract_value(text, second), Some("115200"));
//! assert_eq!(scanner::parse_scalar("115200"), ScalarRef::Int(115200));
//! ```

use super::error::{NodeError, NodeResult};
use super::node::ScalarRef;

fn is_blank(c: char) -> bool {
    c == ' ' || c == '\t' || c == '\r'
}

/// Returns the offset just past the next `\n`, or the buffer length.
pub fn advance_line(text: &str, offset: usize) -> usize {
    match text.get(offset..).and_then(|rest| rest.find('\n')) {
        Some(pos) => offset + pos + 1,
        None => text.len(),
    }
}

/// Returns the line starting at `offset` without its terminator.
///
/// Returns `None` for an empty line or an offset at or past the end.
pub fn get_line(text: &str, offset: usize) -> Option<&str> {
    let rest = text.get(offset..)?;
    let end = rest.find('\n').unwrap_or(rest.len());
    let line = &rest[..end];
    if line.is_empty() {
        None
    } else {
        Some(line)
    }
}

/// True if the line at `offset` contains a `:` separator.
pub fn is_key_line(text: &str, offset: usize) -> bool {
    get_line(text, offset).is_some_and(|line| line.contains(':'))
}

/// Width of the leading whitespace, or `None` if the line is blank.
///
/// Spaces and tabs each count as one column.
pub fn count_indent(text: &str, offset: usize) -> Option<usize> {
    get_line(text, offset)?.find(|c: char| !is_blank(c))
}

/// The trimmed text before the first `:`.
pub fn extract_key(text: &str, offset: usize) -> NodeResult<&str> {
    let malformed = || NodeError::MalformedLine { offset };
    let line = get_line(text, offset).ok_or_else(malformed)?;
    let (key, _) = line.split_once(':').ok_or_else(malformed)?;
    let key = key.trim();
    if key.is_empty() {
        return Err(malformed());
    }
    Ok(key)
}

/// The trimmed text after the first `:`, or `None` when nothing follows it.
///
/// A key without a value introduces a subtree or stands alone as a flag.
pub fn extract_value(text: &str, offset: usize) -> Option<&str> {
    let (_, value) = get_line(text, offset)?.split_once(':')?;
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Moves forward line by line until a key line is found.
///
/// Returns `None` once the buffer is exhausted.
pub fn skip_to_valid_line(text: &str, mut offset: usize) -> Option<usize> {
    while offset < text.len() {
        if is_key_line(text, offset) {
            return Some(offset);
        }
        if count_indent(text, offset).is_some() {
            tracing::trace!(line = line_number(text, offset), "skipping line without key");
        }
        offset = advance_line(text, offset);
    }
    None
}

/// 1-based line number of `offset`, for diagnostics.
pub fn line_number(text: &str, offset: usize) -> usize {
    let end = offset.min(text.len());
    text.as_bytes()[..end].iter().filter(|&&b| b == b'\n').count() + 1
}

/// Coerces value text to the first scalar type that consumes all of it.
pub fn parse_scalar(value: &str) -> ScalarRef<'_> {
    let value = value.trim();
    if let Ok(int) = value.parse::<i32>() {
        return ScalarRef::Int(int);
    }
    if let Ok(float) = value.parse::<f32>() {
        return ScalarRef::Float(float);
    }
    ScalarRef::Str(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "DeviceTree:\n\n  # not a key\n  Uart: MAXUART\n";

    #[test]
    fn test_advance_line() {
        assert_eq!(advance_line(DOC, 0), 12);
        assert_eq!(advance_line(DOC, 12), 13);
        assert_eq!(advance_line("no newline", 0), 10);
        assert_eq!(advance_line("abc", 10), 3);
    }

    #[test]
    fn test_get_line() {
        assert_eq!(get_line(DOC, 0), Some("DeviceTree:"));
        assert_eq!(get_line(DOC, 12), None);
        assert_eq!(get_line(DOC, DOC.len()), None);
        assert_eq!(get_line("tail", 0), Some("tail"));
    }

    #[test]
    fn test_count_indent() {
        assert_eq!(count_indent(DOC, 0), Some(0));
        assert_eq!(count_indent(DOC, 13), Some(2));
        assert_eq!(count_indent("   \n", 0), None);
        assert_eq!(count_indent("\t\tx: 1", 0), Some(2));
    }

    #[test]
    fn test_extract_key_and_value() {
        assert_eq!(extract_key("  Baud : 115200 \r\n", 0).unwrap(), "Baud");
        assert_eq!(extract_value("  Baud : 115200 \r\n", 0), Some("115200"));
        assert_eq!(extract_value("Flag:\n", 0), None);
        assert_eq!(extract_value("Flag:   \n", 0), None);
        assert_eq!(extract_value("Url: http://x\n", 0), Some("http://x"));
    }

    #[test]
    fn test_extract_key_rejects_missing_key() {
        assert_eq!(
            extract_key("   : value\n", 0),
            Err(NodeError::MalformedLine { offset: 0 })
        );
        assert_eq!(
            extract_key("no separator", 0),
            Err(NodeError::MalformedLine { offset: 0 })
        );
    }

    #[test]
    fn test_skip_to_valid_line() {
        assert_eq!(skip_to_valid_line(DOC, 0), Some(0));
        let after_root = advance_line(DOC, 0);
        let uart = skip_to_valid_line(DOC, after_root).unwrap();
        assert_eq!(get_line(DOC, uart), Some("  Uart: MAXUART"));
        assert_eq!(skip_to_valid_line("just prose\n\n", 0), None);
    }

    #[test]
    fn test_line_number() {
        assert_eq!(line_number(DOC, 0), 1);
        assert_eq!(line_number(DOC, 13), 3);
    }

    #[test]
    fn test_parse_scalar_order() {
        assert_eq!(parse_scalar("115200"), ScalarRef::Int(115200));
        assert_eq!(parse_scalar("-3"), ScalarRef::Int(-3));
        assert_eq!(parse_scalar("5.7"), ScalarRef::Float(5.7));
        assert_eq!(parse_scalar("1e3"), ScalarRef::Float(1000.0));
        assert_eq!(parse_scalar("MAXUART"), ScalarRef::Str("MAXUART"));
        assert_eq!(parse_scalar("115200abc"), ScalarRef::Str("115200abc"));
        assert_eq!(parse_scalar("inf"), ScalarRef::Float(f32::INFINITY));
        assert_eq!(parse_scalar("-infinity"), ScalarRef::Float(f32::NEG_INFINITY));
        assert!(matches!(parse_scalar("NaN"), ScalarRef::Float(f) if f.is_nan()));
    }

    #[test]
    fn test_parse_scalar_float_out_of_range() {
        assert_eq!(parse_scalar("1e50"), ScalarRef::Float(f32::INFINITY));
        assert_eq!(parse_scalar("1e-50"), ScalarRef::Float(0.0));
    }

    #[test]
    fn test_parse_scalar_int_overflow_falls_back_to_float() {
        assert_eq!(parse_scalar("4294967296"), ScalarRef::Float(4294967296.0));
    }
}
