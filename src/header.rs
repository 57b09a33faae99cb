//! Header detection and raw block building.
//!
//! ## Finding Chapter Titles Without Semantics
//!
//! The only signal is typography. Body text dominates any course book, so
//! the median token size is a stable estimate of the body font; a title is
//! set noticeably larger:
//!
//! ```text
//! sizes:  10 10 10 10 10 10 11 10 10 24 10 10 ...
//! median: 10          threshold (x1.4): 14
//!                              ^ 24 >= 14 and short -> header
//! ```
//!
//! The median is taken over every token of every page before any line is
//! classified, so one page full of large type cannot move it.
//!
//! Length matters too: a whole paragraph in a callout font is emphasised
//! prose, not a title. Lines of [`HeaderRule::max_title_chars`] characters
//! or more are never headers.
//!
//! ## Accumulation
//!
//! Lines are folded into a [`BlockAccumulator`]. A header flushes the body
//! collected so far under the previous heading and becomes the new heading:
//!
//! ```text
//! "Intro text"      body = [Intro text]
//! "1 Basics" (H)    flush (None, "Intro text"); heading = "1 Basics"
//! "Variables..."    body = [Variables...]
//! <end>             flush ("1 Basics", "Variables...")
//! ```

use serde::{Deserialize, Serialize};

use crate::annotate::{annotate_page, Annotated};
use crate::normalize::page_entries;
use crate::{Document, Line, SegmenterConfig};

/// A `(heading, body)` unit before merging and chunking.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Section title, if the block follows one.
    pub heading: Option<String>,
    /// Body lines joined with newlines.
    pub body: String,
}

impl Block {
    /// Create a block.
    #[must_use]
    pub fn new(heading: Option<&str>, body: impl Into<String>) -> Self {
        Self {
            heading: heading.map(str::to_string),
            body: body.into(),
        }
    }

    /// Body length in characters.
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.body.chars().count()
    }
}

/// Document-wide font statistics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontStats {
    /// Median token font size.
    pub median: f32,
    /// Size at or above which a short line is a header.
    pub threshold: f32,
}

impl FontStats {
    /// Compute statistics over every valid token size in the document.
    ///
    /// Returns `None` when the document has no token with a usable size.
    #[must_use]
    pub fn from_document(doc: &Document, ratio: f32) -> Option<Self> {
        let sizes = doc
            .pages
            .iter()
            .flat_map(|page| page.tokens.iter())
            .filter_map(crate::RawToken::font_size);
        Self::from_sizes(sizes, ratio)
    }

    /// Compute statistics from raw sizes. The upper median is used.
    #[must_use]
    pub fn from_sizes(sizes: impl IntoIterator<Item = f32>, ratio: f32) -> Option<Self> {
        let mut sizes: Vec<f32> = sizes.into_iter().filter(|s| s.is_finite()).collect();
        if sizes.is_empty() {
            return None;
        }
        sizes.sort_by(f32::total_cmp);
        let median = sizes[sizes.len() / 2];
        Some(Self {
            median,
            threshold: median * ratio,
        })
    }
}

/// The dual size-and-length test for section titles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeaderRule {
    threshold: f32,
    max_title_chars: usize,
}

impl HeaderRule {
    /// Create a rule.
    #[must_use]
    pub const fn new(threshold: f32, max_title_chars: usize) -> Self {
        Self {
            threshold,
            max_title_chars,
        }
    }

    /// Header font size threshold.
    #[must_use]
    pub const fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Lines of this many characters or more are never headers.
    #[must_use]
    pub const fn max_title_chars(&self) -> usize {
        self.max_title_chars
    }

    /// Whether the line is a section header.
    #[must_use]
    pub fn is_header(&self, line: &Line) -> bool {
        let text = line.text.trim();
        !text.is_empty()
            && line.max_size >= self.threshold
            && text.chars().count() < self.max_title_chars
    }
}

/// Fold state turning annotated lines into raw blocks.
#[derive(Debug, Clone)]
pub struct BlockAccumulator {
    rule: HeaderRule,
    heading: Option<String>,
    body_lines: Vec<String>,
    blocks: Vec<Block>,
}

impl BlockAccumulator {
    /// Start with no heading and an empty body.
    #[must_use]
    pub fn new(rule: HeaderRule) -> Self {
        Self {
            rule,
            heading: None,
            body_lines: Vec::new(),
            blocks: Vec::new(),
        }
    }

    /// Consume one annotated item.
    pub fn push(&mut self, item: Annotated) {
        match item {
            Annotated::Marker(marker) => self.body_lines.push(marker),
            Annotated::Line(line) => {
                let text = line.text.trim();
                if text.is_empty() || line.is_page_number() {
                    return;
                }
                if self.rule.is_header(&line) {
                    self.flush();
                    self.heading = Some(text.to_string());
                } else {
                    self.body_lines.push(text.to_string());
                }
            }
        }
    }

    /// Current heading.
    #[must_use]
    pub fn heading(&self) -> Option<&str> {
        self.heading.as_deref()
    }

    /// Blocks completed so far.
    #[must_use]
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Flush the remaining body and return every block.
    #[must_use]
    pub fn finish(mut self) -> Vec<Block> {
        self.flush();
        self.blocks
    }

    fn flush(&mut self) {
        if self.body_lines.is_empty() {
            return;
        }
        let body = std::mem::take(&mut self.body_lines).join("\n");
        self.blocks.push(Block {
            heading: self.heading.clone(),
            body,
        });
    }
}

impl Extend<Annotated> for BlockAccumulator {
    fn extend<I: IntoIterator<Item = Annotated>>(&mut self, iter: I) {
        for item in iter {
            self.push(item);
        }
    }
}

/// Build raw blocks for a whole document, pages in order.
///
/// A document without a single usable token yields one empty block.
#[must_use]
pub fn build_blocks(doc: &Document, stats: Option<FontStats>, config: &SegmenterConfig) -> Vec<Block> {
    let Some(stats) = stats else {
        return vec![Block::default()];
    };
    let rule = HeaderRule::new(stats.threshold, config.max_title_chars);

    doc.pages
        .iter()
        .enumerate()
        .fold(BlockAccumulator::new(rule), |mut acc, (index, page)| {
            let entries = page_entries(page, stats.threshold, config);
            if entries.is_empty() {
                tracing::debug!(page = index + 1, "page has no extractable text");
            }
            acc.extend(annotate_page(entries, &rule));
            acc
        })
        .finish()
}
