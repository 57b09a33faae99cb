//! Token stream normalization.
//!
//! Each page is reduced to its body region before any line is built:
//!
//! ```text
//! ┌──────────────────────────┐
//! │  running header          │  crop_top (10%)
//! ├──────────────────────────┤
//! │  body                    │
//! │   ┌──────────┐           │
//! │   │  table   │ -> one [TABLE: ...] entry, its tokens dropped
//! │   └──────────┘           │
//! ├──────────────────────────┤
//! │  footer / page number    │  crop_bottom (8%)
//! └──────────────────────────┘
//! ```
//!
//! The result is a vertically ordered [`Entry`] sequence mixing
//! reconstructed lines and table placeholders.

use crate::line::words_to_lines;
use crate::{Line, Page, SegmenterConfig, TableRegion, Token};

/// A page's body tokens and the tables found in its body.
#[derive(Debug, Clone, Default)]
pub struct NormalizedPage {
    /// Valid tokens inside the body region and outside every table.
    pub tokens: Vec<Token>,
    /// Tables overlapping the body region, clipped to it.
    pub tables: Vec<TableRegion>,
}

/// One item of a page's vertically ordered content.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    /// A reconstructed text line.
    Line(Line),
    /// A table, summarised by its first row.
    Table {
        /// Top edge of the table, clipped to the body region.
        y: f32,
        /// First-row cell texts; empty when unknown.
        first_row: Vec<String>,
    },
}

impl Entry {
    /// Vertical position used for ordering.
    #[must_use]
    pub fn y(&self) -> f32 {
        match self {
            Self::Line(line) => line.y,
            Self::Table { y, .. } => *y,
        }
    }
}

/// Crop a page to its body region and remove tokens covered by tables.
///
/// Malformed tokens are skipped. A page without tokens yields an empty
/// [`NormalizedPage`].
#[must_use]
pub fn normalize_page(page: &Page, config: &SegmenterConfig) -> NormalizedPage {
    let body_top = config.body_top(page.height);
    let body_bottom = config.body_bottom(page.height);

    // A table straddling a crop line is still a table; only its body part counts.
    let tables: Vec<TableRegion> = page
        .tables
        .iter()
        .filter(|t| t.bbox.bottom > body_top && t.bbox.top < body_bottom)
        .map(|t| {
            let mut clipped = t.clone();
            clipped.bbox.top = t.bbox.top.max(body_top);
            clipped.bbox.bottom = t.bbox.bottom.min(body_bottom);
            clipped
        })
        .collect();

    let mut skipped = 0usize;
    let tokens = page
        .tokens
        .iter()
        .filter_map(|raw| {
            let token = raw.validate();
            if token.is_none() {
                skipped += 1;
            }
            token
        })
        .filter(|t| t.top >= body_top && t.bottom <= body_bottom)
        .filter(|t| !tables.iter().any(|table| t.is_within(&table.bbox)))
        .collect();

    if skipped > 0 {
        tracing::trace!(skipped, "skipped tokens with malformed geometry");
    }

    NormalizedPage { tokens, tables }
}

/// Build the vertically ordered entry sequence for one page.
///
/// Lines and tables are merged by `y`; on an exact tie the line comes first.
#[must_use]
pub fn page_entries(page: &Page, header_threshold: f32, config: &SegmenterConfig) -> Vec<Entry> {
    let normalized = normalize_page(page, config);

    let mut entries: Vec<Entry> =
        words_to_lines(&normalized.tokens, header_threshold, config.baseline_tolerance)
            .into_iter()
            .map(Entry::Line)
            .collect();
    entries.extend(normalized.tables.into_iter().map(|table| Entry::Table {
        y: table.bbox.top,
        first_row: table.first_row,
    }));

    // Stable: lines were pushed first.
    entries.sort_by(|a, b| a.y().total_cmp(&b.y()));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BBox, RawToken};

    fn page() -> Page {
        Page::new(600.0, 1000.0)
    }

    #[test]
    fn test_crops_running_header_and_footer() {
        let page = page()
            .with_token(Token::new("Header", 10.0, 40.0, 10.0))
            .with_token(Token::new("Body", 10.0, 500.0, 10.0))
            .with_token(Token::new("Footer", 10.0, 950.0, 10.0));
        let normalized = normalize_page(&page, &SegmenterConfig::default());
        let texts: Vec<_> = normalized.tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, ["Body"]);
    }

    #[test]
    fn test_drops_tokens_inside_table() {
        let table = TableRegion::new(BBox::new(0.0, 300.0, 600.0, 400.0), vec!["Name".into()]);
        let page = page()
            .with_token(Token::new("cell", 10.0, 320.0, 10.0))
            .with_token(Token::new("prose", 10.0, 500.0, 10.0))
            .with_table(table);
        let normalized = normalize_page(&page, &SegmenterConfig::default());
        assert_eq!(normalized.tokens.len(), 1);
        assert_eq!(normalized.tables.len(), 1);
    }

    #[test]
    fn test_partially_overlapping_token_kept() {
        let table = TableRegion::new(BBox::new(0.0, 300.0, 100.0, 400.0), vec![]);
        let page = page()
            .with_token(Token::new("straddles the edge", 90.0, 320.0, 10.0))
            .with_table(table);
        let normalized = normalize_page(&page, &SegmenterConfig::default());
        assert_eq!(normalized.tokens.len(), 1);
    }

    #[test]
    fn test_table_in_header_region_ignored() {
        let table = TableRegion::new(BBox::new(0.0, 10.0, 600.0, 50.0), vec![]);
        let normalized = normalize_page(&page().with_table(table), &SegmenterConfig::default());
        assert!(normalized.tables.is_empty());
    }

    #[test]
    fn test_table_straddling_crop_line_kept() {
        let table = TableRegion::new(
            BBox::new(0.0, 80.0, 600.0, 400.0),
            vec!["Op".into(), "Meaning".into()],
        );
        let page = page()
            .with_token(Token::new("cell", 10.0, 200.0, 10.0))
            .with_token(Token::new("prose", 10.0, 500.0, 10.0))
            .with_table(table);
        let config = SegmenterConfig::default();
        let normalized = normalize_page(&page, &config);
        let texts: Vec<_> = normalized.tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, ["prose"]);
        assert_eq!(normalized.tables.len(), 1);
        assert!((normalized.tables[0].bbox.top - 100.0).abs() < 1e-3);

        let entries = page_entries(&page, 14.0, &config);
        assert!((entries[0].y() - 100.0).abs() < 1e-3);
        assert!(matches!(&entries[0], Entry::Table { first_row, .. } if first_row == &["Op", "Meaning"]));
        assert!(matches!(&entries[1], Entry::Line(l) if l.text == "prose"));
    }

    #[test]
    fn test_table_entirely_in_margin_ignored() {
        let table = TableRegion::new(BBox::new(0.0, 930.0, 600.0, 990.0), vec![]);
        let normalized = normalize_page(&page().with_table(table), &SegmenterConfig::default());
        assert!(normalized.tables.is_empty());
    }

    #[test]
    fn test_malformed_tokens_skipped() {
        let page = page()
            .with_token(RawToken {
                text: "no size".into(),
                x0: Some(1.0),
                top: Some(500.0),
                ..RawToken::default()
            })
            .with_token(Token::new("ok", 10.0, 500.0, 10.0));
        let normalized = normalize_page(&page, &SegmenterConfig::default());
        assert_eq!(normalized.tokens.len(), 1);
        assert_eq!(normalized.tokens[0].text, "ok");
    }

    #[test]
    fn test_entries_interleave_tables_by_position() {
        let table = TableRegion::new(BBox::new(0.0, 300.0, 600.0, 400.0), vec!["A".into()]);
        let page = page()
            .with_token(Token::new("after", 10.0, 500.0, 10.0))
            .with_token(Token::new("before", 10.0, 200.0, 10.0))
            .with_table(table);
        let entries = page_entries(&page, 14.0, &SegmenterConfig::default());
        assert_eq!(entries.len(), 3);
        assert!(matches!(&entries[0], Entry::Line(l) if l.text == "before"));
        assert!(matches!(&entries[1], Entry::Table { first_row, .. } if first_row == &["A"]));
        assert!(matches!(&entries[2], Entry::Line(l) if l.text == "after"));
    }

    #[test]
    fn test_empty_page_yields_no_entries() {
        assert!(page_entries(&page(), 14.0, &SegmenterConfig::default()).is_empty());
    }
}
