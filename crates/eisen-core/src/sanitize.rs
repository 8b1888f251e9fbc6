//! Free-Text Sanitizer
//!
//! Regex-level tag stripping and entity decoding for task text. This is
//! deliberately not a full HTML parser; it removes `<...>` runs and decodes
//! a small set of character references, which is enough for a single-tenant
//! app whose frontend escapes output anyway.

use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum task text length, counted in characters after sanitization.
pub const MAX_TEXT_LENGTH: usize = 500;

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("tag regex"));
static DEC_REF: Lazy<Regex> = Lazy::new(|| Regex::new(r"&#([0-9]+);").expect("dec ref regex"));
static HEX_REF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&#[xX]([0-9a-fA-F]+);").expect("hex ref regex"));
static WS_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("ws regex"));

/// Named references decoded after tag stripping. Decoding after stripping
/// means an entity-encoded `&lt;b&gt;` becomes literal text, never a tag.
const NAMED_REFS: [(&str, &str); 6] = [
    ("&amp;", "&"),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#x27;", "'"),
    ("&#x2F;", "/"),
];

/// Sanitize free-text input: strip tags, decode entities, collapse
/// whitespace, truncate to [`MAX_TEXT_LENGTH`] characters (silently).
pub fn sanitize_text(input: &str) -> String {
    let mut text = TAG.replace_all(input, "").into_owned();

    for (entity, replacement) in NAMED_REFS {
        if text.contains(entity) {
            text = text.replace(entity, replacement);
        }
    }

    // Numeric references, decimal then hex. Unmappable code points are left
    // as-is.
    text = DEC_REF
        .replace_all(&text, |caps: &regex::Captures<'_>| {
            decode_code_point(&caps[1], 10).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned();
    text = HEX_REF
        .replace_all(&text, |caps: &regex::Captures<'_>| {
            decode_code_point(&caps[1], 16).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned();

    let text = WS_RUN.replace_all(text.trim(), " ").into_owned();

    if text.chars().count() > MAX_TEXT_LENGTH {
        text.chars().take(MAX_TEXT_LENGTH).collect()
    } else {
        text
    }
}

fn decode_code_point(digits: &str, radix: u32) -> Option<String> {
    u32::from_str_radix(digits, radix)
        .ok()
        .and_then(char::from_u32)
        .map(String::from)
}

/// True iff `text` has a valid task length. Expects already-sanitized input;
/// calling this on raw text is a caller error.
pub fn is_valid_task_text(text: &str) -> bool {
    let len = text.chars().count();
    len > 0 && len <= MAX_TEXT_LENGTH
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_tags() {
        assert_eq!(sanitize_text("<b>Buy milk</b>"), "Buy milk");
        assert_eq!(sanitize_text("a <span class=\"x\">b</span> c"), "a b c");
    }

    #[test]
    fn strips_tags_then_decodes_entities() {
        // Decoded angle brackets are literal text, not a second-pass tag.
        assert_eq!(sanitize_text("&lt;script&gt;"), "<script>");
        assert_eq!(sanitize_text("a &amp; b"), "a & b");
        assert_eq!(sanitize_text("&quot;hi&quot; &#x27;there&#x2F;"), "\"hi\" 'there/");
    }

    #[test]
    fn decodes_numeric_references() {
        assert_eq!(sanitize_text("&#65;&#66;"), "AB");
        assert_eq!(sanitize_text("&#x41;&#X42;"), "AB");
        // Invalid code point stays untouched.
        assert_eq!(sanitize_text("&#1114112;"), "&#1114112;");
    }

    #[test]
    fn collapses_and_trims_whitespace() {
        assert_eq!(sanitize_text("  Buy   milk \t now  "), "Buy milk now");
        assert_eq!(sanitize_text("   "), "");
    }

    #[test]
    fn truncates_to_max_length() {
        let long = "x".repeat(MAX_TEXT_LENGTH + 37);
        assert_eq!(sanitize_text(&long).chars().count(), MAX_TEXT_LENGTH);
    }

    #[test]
    fn idempotent_on_plain_text() {
        for input in ["Buy milk", "  spaced   out  ", &"y".repeat(600)] {
            let once = sanitize_text(input);
            assert_eq!(sanitize_text(&once), once);
        }
    }

    #[test]
    fn valid_text_after_sanitizing_reasonable_input() {
        for input in ["Buy milk", "<b>x</b>", "  a  "] {
            assert!(is_valid_task_text(&sanitize_text(input)));
        }
        assert!(!is_valid_task_text(&sanitize_text("<b></b>")));
        assert!(!is_valid_task_text(&sanitize_text("   ")));
    }

    #[test]
    fn length_bounds() {
        assert!(!is_valid_task_text(""));
        assert!(is_valid_task_text("a"));
        assert!(is_valid_task_text(&"a".repeat(MAX_TEXT_LENGTH)));
        assert!(!is_valid_task_text(&"a".repeat(MAX_TEXT_LENGTH + 1)));
    }
}
