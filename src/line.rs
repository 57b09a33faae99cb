//! Line reconstruction from positioned tokens.
//!
//! Tokens are grouped into printed lines by quantising their top edge into
//! buckets of `tolerance` points:
//!
//! ```text
//! top:   101.2  101.9  102.4  114.0  114.6
//! key:     51     51     51     57     57     (tolerance = 2.0)
//!        └──── line 1 ─────┘  └── line 2 ──┘
//! ```
//!
//! Within a bucket tokens are sorted left-to-right and joined with a single
//! space. Ligature-heavy fonts often lose inter-word spacing in the
//! character stream, so the space is inserted explicitly rather than trusted
//! to the extractor.
//!
//! Two kinds of noise are removed here:
//!
//! - `(cid:N)` glyph codes from broken character maps become `[?]`
//! - standalone integers set at header size (decorative chapter numerals in
//!   the margin) are dropped before joining

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::Token;

static CID_ARTIFACT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(cid:\d+\)").expect("valid cid regex"));

/// Replacement for unmappable glyph codes.
pub const ARTIFACT_PLACEHOLDER: &str = "[?]";

const CODE_FONT_MARKERS: [&str; 3] = ["Courier", "Mono", "Code"];

/// A reconstructed line of text.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    /// Joined token text, artifacts replaced.
    pub text: String,
    /// Largest font size among the line's tokens.
    pub max_size: f32,
    /// Whether any token is set in a fixed-width face.
    pub is_code: bool,
    /// Quantised vertical position, used to interleave tables.
    pub y: f32,
}

impl Line {
    /// Create a line at `y = 0`.
    #[must_use]
    pub fn new(text: impl Into<String>, max_size: f32, is_code: bool) -> Self {
        Self {
            text: text.into(),
            max_size,
            is_code,
            y: 0.0,
        }
    }

    /// Whether the trimmed text is a bare page number.
    #[must_use]
    pub fn is_page_number(&self) -> bool {
        is_bare_integer(self.text.trim())
    }
}

/// Group tokens into lines in top-to-bottom, left-to-right order.
///
/// `header_threshold` is the font size at which standalone integers are
/// treated as layout decoration and removed.
#[must_use]
pub fn words_to_lines(tokens: &[Token], header_threshold: f32, tolerance: f32) -> Vec<Line> {
    let mut buckets: BTreeMap<i64, Vec<&Token>> = BTreeMap::new();
    for token in tokens {
        buckets.entry(bucket_key(token.top, tolerance)).or_default().push(token);
    }

    buckets
        .into_iter()
        .filter_map(|(key, mut members)| {
            members.sort_by(|a, b| a.x0.total_cmp(&b.x0));
            members.retain(|t| !(is_bare_integer(&t.text) && t.size >= header_threshold));
            assemble_line(&members, key as f32 * tolerance)
        })
        .collect()
}

/// Quantised baseline key for a vertical position.
#[must_use]
pub fn bucket_key(top: f32, tolerance: f32) -> i64 {
    (top / tolerance).round() as i64
}

/// Replace glyph-code artifacts with [`ARTIFACT_PLACEHOLDER`].
#[must_use]
pub fn replace_artifacts(text: &str) -> String {
    CID_ARTIFACT.replace_all(text, ARTIFACT_PLACEHOLDER).into_owned()
}

/// Whether a font family name denotes a fixed-width face.
#[must_use]
pub fn is_code_font(font: &str) -> bool {
    CODE_FONT_MARKERS.iter().any(|marker| font.contains(marker))
}

pub(crate) fn is_bare_integer(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_digit())
}

fn assemble_line(tokens: &[&Token], y: f32) -> Option<Line> {
    if tokens.is_empty() {
        return None;
    }
    let joined = tokens.iter().map(|t| t.text.as_str()).collect::<Vec<_>>().join(" ");
    let max_size = tokens.iter().map(|t| t.size).fold(f32::MIN, f32::max);
    let is_code = tokens.iter().any(|t| is_code_font(&t.font));

    Some(Line {
        text: replace_artifacts(&joined),
        max_size,
        is_code,
        y,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_baseline_joined_in_x_order() {
        let tokens = vec![
            Token::new("world", 60.0, 100.4, 10.0),
            Token::new("Hello", 10.0, 100.0, 10.0),
        ];
        let lines = words_to_lines(&tokens, 14.0, 2.0);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "Hello world");
        assert!((lines[0].max_size - 10.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_distinct_baselines_ordered_top_down() {
        let tokens = vec![
            Token::new("second", 10.0, 120.0, 10.0),
            Token::new("first", 10.0, 100.0, 10.0),
        ];
        let lines = words_to_lines(&tokens, 14.0, 2.0);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "first");
        assert_eq!(lines[1].text, "second");
        assert!(lines[0].y < lines[1].y);
    }

    #[test]
    fn test_oversized_numeral_stripped() {
        let tokens = vec![
            Token::new("3", 5.0, 100.0, 30.0),
            Token::new("Functions", 40.0, 100.0, 20.0),
        ];
        let lines = words_to_lines(&tokens, 14.0, 2.0);
        assert_eq!(lines[0].text, "Functions");
    }

    #[test]
    fn test_body_size_numeral_kept() {
        let tokens = vec![
            Token::new("Step", 5.0, 100.0, 10.0),
            Token::new("3", 40.0, 100.0, 10.0),
        ];
        let lines = words_to_lines(&tokens, 14.0, 2.0);
        assert_eq!(lines[0].text, "Step 3");
    }

    #[test]
    fn test_line_of_only_numeral_dropped() {
        let tokens = vec![Token::new("12", 5.0, 100.0, 40.0)];
        assert!(words_to_lines(&tokens, 14.0, 2.0).is_empty());
    }

    #[test]
    fn test_cid_artifacts_replaced() {
        let tokens = vec![Token::new("e(cid:31)cient", 5.0, 100.0, 10.0)];
        let lines = words_to_lines(&tokens, 14.0, 2.0);
        assert_eq!(lines[0].text, "e[?]cient");
    }

    #[test]
    fn test_code_font_flag() {
        let tokens = vec![
            Token::new("print(x)", 5.0, 100.0, 9.0).with_font("CourierNewPSMT"),
            Token::new("plain", 5.0, 120.0, 9.0).with_font("Times-Roman"),
        ];
        let lines = words_to_lines(&tokens, 14.0, 2.0);
        assert!(lines[0].is_code);
        assert!(!lines[1].is_code);
        assert!(is_code_font("DejaVuSansMono"));
        assert!(is_code_font("SourceCodePro"));
    }

    #[test]
    fn test_empty_input() {
        assert!(words_to_lines(&[], 14.0, 2.0).is_empty());
    }

    #[test]
    fn test_page_number_detection() {
        assert!(Line::new(" 42 ", 10.0, false).is_page_number());
        assert!(!Line::new("42a", 10.0, false).is_page_number());
        assert!(!Line::new("", 10.0, false).is_page_number());
    }
}
