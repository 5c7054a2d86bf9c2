//! Inline tokenizers shared by the item and attribute rules
//!
//! These match within a single already-isolated line of text, so unlike the
//! top-level rules they report consumed length rather than whole tokens.
//! A `None` from either of them is fatal for the caller: the surrounding
//! rule has already committed to the line's shape.

use once_cell::sync::Lazy;
use regex::Regex;

/// Label text up to an optional `|` separator.
static TITLE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\A[^|\r\n]*\s*\|?").unwrap());

/// One `key=value` pair: optional leading comma, bare word key, then a
/// double-quoted value or a bare value running to the next separator.
static ATTRIBUTE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\A\s*,?\s*[A-Za-z0-9_]*\s*=\s*("[^"\r\n]*"|[^|\r\n\s]*)\s*"#).unwrap()
});

/// A successful inline match: bytes consumed plus the decoded value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineMatch<T> {
    pub len: usize,
    pub value: T,
}

/// One decoded `key=value` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub key: String,
    pub value: String,
}

/// Consume the item label: everything up to the first `|`, or the whole
/// text when there is none. The trailing `|` (when present) and surrounding
/// whitespace are stripped from the decoded label.
pub fn item_title(src: &str) -> Option<InlineMatch<String>> {
    let raw = TITLE_RE.find(src)?.as_str();
    let label = raw.strip_suffix('|').unwrap_or(raw).trim();
    Some(InlineMatch {
        len: raw.len(),
        value: label.to_string(),
    })
}

/// Consume one `key=value` pair, tolerating a leading comma and whitespace.
///
/// Quotes are stripped from a quoted value; a bare value sheds one trailing
/// comma (an unquoted value always ends at a comma, so the comma a writer
/// puts between attributes travels with the value and is dropped here).
/// Returns `None` when the text does not have `key=value` shape at all.
pub fn item_attribute(src: &str) -> Option<InlineMatch<Attribute>> {
    let raw = ATTRIBUTE_RE.find(src)?.as_str();
    let (key_part, value_part) = raw.split_once('=')?;

    let key = key_part.trim().trim_start_matches(',').trim_start();
    let mut value = value_part.trim();
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        value = &value[1..value.len() - 1];
    } else if let Some(stripped) = value.strip_suffix(',') {
        value = stripped;
    }

    Some(InlineMatch {
        len: raw.len(),
        value: Attribute {
            key: key.to_string(),
            value: value.to_string(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_title_without_separator() {
        let m = item_title("Buy milk").unwrap();
        assert_eq!(m.len, "Buy milk".len());
        assert_eq!(m.value, "Buy milk");
    }

    #[test]
    fn test_title_stops_at_separator() {
        let m = item_title("Buy milk | done=false").unwrap();
        assert_eq!(&"Buy milk | done=false"[..m.len], "Buy milk |");
        assert_eq!(m.value, "Buy milk");
    }

    #[test]
    fn test_title_empty_label() {
        let m = item_title("| k=v").unwrap();
        assert_eq!(m.value, "");
    }

    #[rstest]
    #[case("done=false", "done", "false")]
    #[case("done = false", "done", "false")]
    #[case("k1=v1, k2=v2", "k1", "v1")]
    #[case(", k2=v2", "k2", "v2")]
    #[case(r#"note="v 2""#, "note", "v 2")]
    #[case(r#"note="a, b | c""#, "note", "a, b | c")]
    #[case("empty=", "empty", "")]
    #[case("k=a=b", "k", "a=b")]
    fn test_attribute_decode(#[case] src: &str, #[case] key: &str, #[case] value: &str) {
        let m = item_attribute(src).unwrap();
        assert_eq!(m.value.key, key);
        assert_eq!(m.value.value, value);
    }

    #[test]
    fn test_attribute_consumes_through_trailing_comma() {
        let src = "k1=v1, k2=v2";
        let m = item_attribute(src).unwrap();
        // The bare value swallows its comma, so the next pair starts clean.
        assert_eq!(&src[m.len..], "k2=v2");
        assert_eq!(m.value.value, "v1");
    }

    #[test]
    fn test_attribute_rejects_shapeless_text() {
        assert_eq!(item_attribute("no equals here |"), None);
        assert_eq!(item_attribute("| trailing"), None);
    }

    #[test]
    fn test_quoted_value_keeps_separators() {
        let m = item_attribute(r#"q="a=b, c""#).unwrap();
        assert_eq!(m.value.value, "a=b, c");
    }
}
