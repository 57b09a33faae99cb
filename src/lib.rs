//! # docslab
//!
//! Deterministic segmentation of extracted course documents.
//!
//! ## The Problem
//!
//! A course PDF is hundreds of pages. Scoring it with a language model means
//! cutting it into pieces: few enough to afford, each coherent enough to
//! judge, none too long for the model. And there is no semantic help
//! available. The only structure is what the typesetter left behind:
//! positions, font sizes, font faces.
//!
//! This crate turns positioned text into a bounded list of typed segments
//! using those layout signals alone.
//!
//! ## The Pipeline
//!
//! ```text
//! Document (pages of tokens + tables)
//!   │
//!   ├─ normalize   crop running headers/footers, drop tokens inside tables
//!   ├─ line        group tokens by baseline, join words, strip artifacts
//!   ├─ annotate    [TABLE: ...], [FIGURE Fig. 1.2: ...], [CODE] ... [/CODE]
//!   ├─ header      median font x 1.4 = title size; fold lines into blocks
//!   ├─ merge       fold smallest adjacent pairs until <= pages/10 blocks
//!   ├─ classify    instructional | exercise | solution | reference_table
//!   └─ chunk       sentence-aligned split, nothing over max_chars
//!   │
//!   ▼
//! Vec<Segment>
//! ```
//!
//! Every stage is a plain function over plain values, usable on its own.
//!
//! ## Quick Start
//!
//! ```rust
//! use docslab::{Document, Page, Segmenter, SegmenterConfig, Token};
//!
//! let page = Page::new(600.0, 800.0)
//!     .with_token(Token::new("Variables", 50.0, 120.0, 22.0))
//!     .with_token(Token::new("A variable names a value.", 50.0, 160.0, 10.0))
//!     .with_token(Token::new("x = 1", 50.0, 180.0, 10.0).with_font("Courier"));
//!
//! let segmenter = Segmenter::new(SegmenterConfig::default()).unwrap();
//! let segments = segmenter.segment(&Document::new(vec![page]));
//!
//! assert_eq!(segments[0].heading.as_deref(), Some("Variables"));
//! assert!(segments[0].text.contains("[CODE]\nx = 1\n[/CODE]"));
//! ```
//!
//! ## Degraded Input
//!
//! Segmentation never aborts a pipeline. Pages without text contribute
//! nothing, malformed tokens are skipped, and a document that cannot be read
//! at all (see [`DocumentSource`]) comes back as a single
//! [`Segment::placeholder`].
//!
//! ## Guarantees
//!
//! | Property | Holds |
//! |----------|-------|
//! | Segment text non-empty | always |
//! | Segment length <= `max_chars` | always |
//! | Ids 1..=n in emission order | always |
//! | Blocks before chunking <= `max(1, pages / 10)` | always |
//! | Deterministic | same input, same output |

mod annotate;
mod chunk;
mod classify;
mod config;
mod document;
mod error;
mod header;
mod line;
mod merge;
mod normalize;
mod segment;
mod segmenter;

pub use annotate::{annotate_page, figure_marker, table_marker, Annotated, CODE_CLOSE, CODE_OPEN};
pub use chunk::{chunk_text, split_sentences, Chunker, SegmentIds};
pub use classify::{classify, classify_parts, Rule, RULES, SOLUTION_PREFIX_CHARS};
pub use config::SegmenterConfig;
pub use document::{BBox, Document, DocumentSource, JsonFileSource, Page, RawToken, TableRegion, Token};
pub use error::{Error, Result};
pub use header::{build_blocks, Block, BlockAccumulator, FontStats, HeaderRule};
pub use line::{
    bucket_key, is_code_font, replace_artifacts, words_to_lines, Line, ARTIFACT_PLACEHOLDER,
};
pub use merge::{merge_to_target, target_ceiling, MERGE_SEPARATOR};
pub use normalize::{normalize_page, page_entries, Entry, NormalizedPage};
pub use segment::{Segment, SegmentType, PLACEHOLDER_TEXT};
pub use segmenter::{Analysis, Segmenter};
