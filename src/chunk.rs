//! Sentence-aligned chunking of oversized blocks.
//!
//! Most blocks fit the character budget and pass through untouched. Those
//! that do not are split at sentence boundaries and the sentences packed
//! greedily:
//!
//! ```text
//! max_chars = 40
//! "This is a short sentence. This is another sentence that pushes it."
//!  └──────── 25 ──────────┘ └──────────────── 40 ─────────────────┘
//! 25 + 1 + 40 > 40  ->  ["This is a short sentence.",
//!                        "This is another sentence that pushes it."]
//! ```
//!
//! ## Sentence Boundaries
//!
//! A boundary is terminal punctuation (`.`, `!`, `?`) followed by
//! whitespace, or a blank line. This is deliberately cruder than UAX #29:
//! extracted PDF text is full of hard line breaks and marker lines that
//! Unicode sentence rules glue together.
//!
//! ## Oversized Sentences
//!
//! A single sentence longer than the budget (a code listing, a table dump)
//! is cut into fixed windows. Windows break between grapheme clusters so a
//! base character is never separated from its combining marks. Nothing is
//! dropped or truncated.
//!
//! All lengths are counted in `char`s.

use std::sync::LazyLock;

use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

use crate::{Block, Segment, SegmentType};

static SENTENCE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]\s+|\n\n").expect("valid sentence break regex"));

/// Hands out segment ids: 1, 2, 3, ...
#[derive(Debug, Clone)]
pub struct SegmentIds {
    next: usize,
}

impl SegmentIds {
    /// Start at 1.
    #[must_use]
    pub const fn new() -> Self {
        Self { next: 1 }
    }

    /// Take the next id.
    pub fn next_id(&mut self) -> usize {
        let id = self.next;
        self.next += 1;
        id
    }

    /// Number of ids handed out so far.
    #[must_use]
    pub const fn issued(&self) -> usize {
        self.next - 1
    }
}

impl Default for SegmentIds {
    fn default() -> Self {
        Self::new()
    }
}

/// Splits block text into chunks of at most `max_chars` characters.
///
/// ## Example
///
/// ```rust
/// use docslab::Chunker;
///
/// let chunker = Chunker::new(40);
/// let chunks = chunker.chunk_text(
///     "This is a short sentence. This is another sentence that pushes it.",
/// );
///
/// assert_eq!(chunks.len(), 2);
/// assert_eq!(chunks[0], "This is a short sentence.");
/// ```
#[derive(Debug, Clone)]
pub struct Chunker {
    max_chars: usize,
}

impl Chunker {
    /// Create a chunker.
    ///
    /// # Panics
    ///
    /// Panics if `max_chars == 0`.
    #[must_use]
    pub fn new(max_chars: usize) -> Self {
        assert!(max_chars > 0, "max_chars must be > 0");
        Self { max_chars }
    }

    /// The character budget.
    #[must_use]
    pub const fn max_chars(&self) -> usize {
        self.max_chars
    }

    /// Split text into chunks.
    ///
    /// Text within the budget is returned unchanged as a single chunk.
    #[must_use]
    pub fn chunk_text(&self, text: &str) -> Vec<String> {
        if text.chars().count() <= self.max_chars {
            return vec![text.to_string()];
        }

        let mut chunks = Vec::with_capacity(self.estimate_chunks(text.len()));
        let mut current = String::new();
        let mut current_len = 0;

        for sentence in split_sentences(text) {
            let len = sentence.chars().count();

            if len > self.max_chars {
                flush(&mut chunks, &mut current, &mut current_len);
                chunks.extend(hard_split(sentence, self.max_chars));
                continue;
            }

            let needed = if current.is_empty() { len } else { current_len + 1 + len };
            if needed > self.max_chars {
                flush(&mut chunks, &mut current, &mut current_len);
                current.push_str(sentence);
                current_len = len;
            } else {
                if !current.is_empty() {
                    current.push(' ');
                }
                current.push_str(sentence);
                current_len = needed;
            }
        }
        flush(&mut chunks, &mut current, &mut current_len);

        chunks
    }

    /// Turn a classified block into segments, numbering them from `ids`.
    ///
    /// Whitespace-only chunks are dropped and consume no id.
    pub fn segments(
        &self,
        block: &Block,
        segment_type: SegmentType,
        ids: &mut SegmentIds,
    ) -> Vec<Segment> {
        self.chunk_text(&block.body)
            .into_iter()
            .filter_map(|chunk| {
                let text = chunk.trim();
                if text.is_empty() {
                    return None;
                }
                Some(Segment::new(
                    ids.next_id(),
                    block.heading.as_deref(),
                    text,
                    segment_type,
                ))
            })
            .collect()
    }

    /// Rough chunk count for a text of `text_len` bytes.
    #[must_use]
    pub fn estimate_chunks(&self, text_len: usize) -> usize {
        text_len.div_ceil(self.max_chars).max(1)
    }
}

/// Split `text` into chunks of at most `max_chars` characters.
///
/// # Panics
///
/// Panics if `max_chars == 0`.
#[must_use]
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    Chunker::new(max_chars).chunk_text(text)
}

/// Trimmed, non-empty sentences of `text` in order.
#[must_use]
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    for m in SENTENCE_BREAK.find_iter(text) {
        // Keep the terminal punctuation with its sentence.
        let end = if text[m.start()..].starts_with(['.', '!', '?']) {
            m.start() + 1
        } else {
            m.start()
        };
        sentences.push(&text[start..end]);
        start = m.end();
    }
    sentences.push(&text[start..]);

    sentences
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

fn flush(chunks: &mut Vec<String>, current: &mut String, current_len: &mut usize) {
    if !current.is_empty() {
        chunks.push(std::mem::take(current));
    }
    *current_len = 0;
}

/// Cut `text` into windows of at most `max_chars` characters on grapheme
/// boundaries. A grapheme cluster longer than the window is cut by `char`.
fn hard_split(text: &str, max_chars: usize) -> Vec<String> {
    let mut windows = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for grapheme in text.graphemes(true) {
        let len = grapheme.chars().count();
        if current_len + len > max_chars {
            flush(&mut windows, &mut current, &mut current_len);
        }
        if len > max_chars {
            for c in grapheme.chars() {
                if current_len == max_chars {
                    flush(&mut windows, &mut current, &mut current_len);
                }
                current.push(c);
                current_len += 1;
            }
            continue;
        }
        current.push_str(grapheme);
        current_len += len;
    }
    flush(&mut windows, &mut current, &mut current_len);

    windows.retain(|w| !w.trim().is_empty());
    windows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_unchanged() {
        let text = "  Fits easily.  ";
        assert_eq!(chunk_text(text, 100), vec![text.to_string()]);
    }

    #[test]
    fn test_exact_budget_unchanged() {
        let text = "a".repeat(40);
        assert_eq!(chunk_text(&text, 40), vec![text]);
    }

    #[test]
    fn test_two_sentence_split() {
        let text = "This is a short sentence. This is another sentence that pushes it.";
        let chunks = chunk_text(text, 40);
        assert_eq!(chunks.len(), 2);
        assert!(chunks[0].contains("This is a short sentence."));
        assert_eq!(chunks[1], "This is another sentence that pushes it.");
    }

    #[test]
    fn test_sentences_packed_greedily() {
        let chunks = chunk_text("One. Two. Three. Four. Five. Six.", 15);
        assert_eq!(chunks, vec!["One. Two.", "Three. Four.", "Five. Six."]);
    }

    #[test]
    fn test_paragraph_break_is_boundary() {
        let text = "first paragraph without period\n\nsecond paragraph without period";
        let chunks = chunk_text(text, 35);
        assert_eq!(chunks, vec!["first paragraph without period", "second paragraph without period"]);
    }

    #[test]
    fn test_long_sentence_hard_split() {
        let long = "x".repeat(25);
        let text = format!("Tiny. {long}");
        let chunks = chunk_text(&text, 10);
        assert_eq!(chunks, vec!["Tiny.", "xxxxxxxxxx", "xxxxxxxxxx", "xxxxx"]);
    }

    #[test]
    fn test_hard_split_respects_graphemes() {
        // "e" + combining acute: one grapheme, two chars.
        let text = "e\u{301}".repeat(5);
        let windows = hard_split(&text, 3);
        for window in &windows {
            assert!(window.chars().count() <= 3);
            assert!(!window.starts_with('\u{301}'));
        }
        assert_eq!(windows.concat(), text);
    }

    #[test]
    fn test_oversized_grapheme_cut_by_char() {
        let text = format!("a{}", "\u{301}".repeat(4));
        let windows = hard_split(&text, 2);
        assert_eq!(windows.concat(), text);
        assert!(windows.iter().all(|w| w.chars().count() <= 2));
    }

    #[test]
    fn test_split_sentences() {
        assert_eq!(
            split_sentences("Is it? Yes!  Done.\n\nNext para"),
            vec!["Is it?", "Yes!", "Done.", "Next para"]
        );
        assert!(split_sentences("   ").is_empty());
    }

    #[test]
    fn test_segments_number_and_skip_blank() {
        let chunker = Chunker::new(100);
        let mut ids = SegmentIds::new();
        let block = Block::new(Some("Intro"), "  Some text.  ");
        let segments = chunker.segments(&block, SegmentType::Exercise, &mut ids);
        assert_eq!(segments, vec![Segment::new(1, Some("Intro"), "Some text.", SegmentType::Exercise)]);

        let blank = Block::new(None, "   \n ");
        assert!(chunker.segments(&blank, SegmentType::Instructional, &mut ids).is_empty());
        assert_eq!(ids.issued(), 1);
        assert_eq!(ids.next_id(), 2);
    }

    #[test]
    #[should_panic]
    fn test_zero_budget_panics() {
        let _ = Chunker::new(0);
    }
}
