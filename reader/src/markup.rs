//! Inline markup decoding for translation and commentary text
//!
//! Commentary columns carry a tiny HTML-like vocabulary: `<i>`, `<b>` and `<sup>`
//! (footnote markers), never nested. Anything else is passed through literally:
//! unterminated or stray tags, unknown tags and tags nested inside a recognized
//! pair all stay in the text of the fragment that contains them.

use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpanStyle {
    Plain,
    Italic,
    Bold,
    Superscript,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyledSpan {
    pub style: SpanStyle,
    pub text: String,
}

impl StyledSpan {
    fn new(style: SpanStyle, text: &str) -> Self {
        Self { style, text: text.to_string() }
    }
}

fn push_span(spans: &mut Vec<StyledSpan>, style: SpanStyle, text: &str) {
    if style == SpanStyle::Plain {
        if let Some(last) = spans.last_mut().filter(|s| s.style == SpanStyle::Plain) {
            last.text.push_str(text);
            return;
        }
    }
    spans.push(StyledSpan::new(style, text));
}

fn tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?s)<i>(.*?)</i>|<b>(.*?)</b>|<sup>(.*?)</sup>")
            .expect("markup pattern is valid")
    })
}

/// Split `input` into styled spans.
///
/// Plain text is never split across two adjacent spans. A recognized pair with
/// empty content emits nothing. An input without any recognized pair yields a
/// single plain span equal to the input, even when the input is empty.
pub fn decode(input: &str) -> Vec<StyledSpan> {
    let mut spans = Vec::new();
    let mut cursor = 0;

    for caps in tag_pattern().captures_iter(input) {
        let Some(whole) = caps.get(0) else { continue };

        if whole.start() > cursor {
            push_span(&mut spans, SpanStyle::Plain, &input[cursor..whole.start()]);
        }

        let (style, inner) = if let Some(m) = caps.get(1) {
            (SpanStyle::Italic, m.as_str())
        } else if let Some(m) = caps.get(2) {
            (SpanStyle::Bold, m.as_str())
        } else if let Some(m) = caps.get(3) {
            (SpanStyle::Superscript, m.as_str())
        } else {
            (SpanStyle::Plain, whole.as_str())
        };

        if !inner.is_empty() {
            push_span(&mut spans, style, inner);
        }
        cursor = whole.end();
    }

    if cursor < input.len() || (spans.is_empty() && cursor == 0) {
        push_span(&mut spans, SpanStyle::Plain, &input[cursor..]);
    }

    spans
}

/// Text with recognized tag pairs removed; equals the concatenation of `decode`.
pub fn strip_tags(input: &str) -> String {
    decode(input).into_iter().map(|s| s.text).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(spans: &[StyledSpan]) -> Vec<(SpanStyle, &str)> {
        spans.iter().map(|s| (s.style, s.text.as_str())).collect()
    }

    #[test]
    fn test_bold_plain_italic() {
        let spans = decode("<b>Allah</b> is <i>Merciful</i>");
        assert_eq!(
            pairs(&spans),
            vec![
                (SpanStyle::Bold, "Allah"),
                (SpanStyle::Plain, " is "),
                (SpanStyle::Italic, "Merciful"),
            ]
        );
        assert_eq!(strip_tags("<b>Allah</b> is <i>Merciful</i>"), "Allah is Merciful");
    }

    #[test]
    fn test_untagged_input_is_single_plain_span() {
        let text = "Dengan nama Allah Yang Maha Pengasih";
        assert_eq!(decode(text), vec![StyledSpan::new(SpanStyle::Plain, text)]);
        assert_eq!(decode(""), vec![StyledSpan::new(SpanStyle::Plain, "")]);
    }

    #[test]
    fn test_superscript_footnote_marker() {
        let spans = decode("Tuhan seluruh alam,<sup>1</sup> Yang Maha Pengasih");
        assert_eq!(
            pairs(&spans),
            vec![
                (SpanStyle::Plain, "Tuhan seluruh alam,"),
                (SpanStyle::Superscript, "1"),
                (SpanStyle::Plain, " Yang Maha Pengasih"),
            ]
        );
    }

    #[test]
    fn test_unterminated_tag_passes_through() {
        let spans = decode("before <i>never closed");
        assert_eq!(pairs(&spans), vec![(SpanStyle::Plain, "before <i>never closed")]);
    }

    #[test]
    fn test_unknown_and_stray_tags_pass_through() {
        let spans = decode("a <u>b</u> c</b> <b>d</b>");
        assert_eq!(
            pairs(&spans),
            vec![(SpanStyle::Plain, "a <u>b</u> c</b> "), (SpanStyle::Bold, "d")]
        );
    }

    #[test]
    fn test_nested_tag_kept_inside_outer_fragment() {
        let spans = decode("<b>x <i>y</i></b>!");
        assert_eq!(
            pairs(&spans),
            vec![(SpanStyle::Bold, "x <i>y</i>"), (SpanStyle::Plain, "!")]
        );
    }

    #[test]
    fn test_empty_pair_emits_nothing() {
        let spans = decode("a<b></b>b");
        assert_eq!(pairs(&spans), vec![(SpanStyle::Plain, "ab")]);
        assert!(decode("<i></i>").is_empty());
    }

    #[test]
    fn test_tags_are_case_sensitive_and_span_lines() {
        assert_eq!(pairs(&decode("<I>x</I>")), vec![(SpanStyle::Plain, "<I>x</I>")]);
        assert_eq!(pairs(&decode("<i>one\ntwo</i>")), vec![(SpanStyle::Italic, "one\ntwo")]);
    }
}
