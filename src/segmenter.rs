//! The end-to-end segmentation run.

use tracing::{error, info, warn};

use crate::chunk::SegmentIds;
use crate::classify::classify;
use crate::header::{build_blocks, FontStats};
use crate::merge::{merge_to_target, target_ceiling};
use crate::{Block, Chunker, Document, DocumentSource, Result, Segment, SegmenterConfig};

/// Every intermediate result of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    /// Pages in the document.
    pub page_count: usize,
    /// Block ceiling derived from the page count.
    pub target_blocks: usize,
    /// Font statistics; `None` when the document has no text.
    pub font_stats: Option<FontStats>,
    /// Blocks as delimited by headers.
    pub raw_blocks: Vec<Block>,
    /// Blocks after merging down to the ceiling.
    pub merged_blocks: Vec<Block>,
    /// Final segments.
    pub segments: Vec<Segment>,
}

/// Partitions documents into typed, size-bounded segments.
///
/// A `Segmenter` holds only configuration and can be shared across threads
/// to process documents in parallel. Each run is independent.
///
/// ```rust
/// use docslab::{Document, Page, Segmenter, SegmenterConfig, Token};
///
/// let page = Page::new(600.0, 800.0)
///     .with_token(Token::new("Loops", 50.0, 150.0, 24.0))
///     .with_token(Token::new("A loop repeats a block.", 50.0, 200.0, 10.0))
///     .with_token(Token::new("It stops when told to.", 50.0, 220.0, 10.0));
/// let doc = Document::new(vec![page]);
///
/// let segmenter = Segmenter::new(SegmenterConfig::default()).unwrap();
/// let segments = segmenter.segment(&doc);
///
/// assert_eq!(segments.len(), 1);
/// assert_eq!(segments[0].heading.as_deref(), Some("Loops"));
/// ```
#[derive(Debug, Clone)]
pub struct Segmenter {
    config: SegmenterConfig,
    chunker: Chunker,
}

impl Segmenter {
    /// Create a segmenter.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: SegmenterConfig) -> Result<Self> {
        config.validate()?;
        let chunker = Chunker::new(config.max_chars);
        Ok(Self { config, chunker })
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &SegmenterConfig {
        &self.config
    }

    /// Segment a document.
    #[must_use]
    pub fn segment(&self, doc: &Document) -> Vec<Segment> {
        self.analyze(doc).segments
    }

    /// Extract a document from `source` and segment it.
    ///
    /// Never fails: when extraction errors, the error is logged and a
    /// single [`Segment::placeholder`] is returned.
    #[must_use]
    pub fn segment_source<S: DocumentSource + ?Sized>(&self, source: &S) -> Vec<Segment> {
        match source.extract() {
            Ok(doc) => self.segment(&doc),
            Err(e) => {
                error!(source = %source.name(), error = %e, "error reading document");
                vec![Segment::placeholder()]
            }
        }
    }

    /// Run the full pipeline and keep every intermediate result.
    ///
    /// Segments are never empty. When nothing survives cropping and
    /// filtering (no tokens at all, or every token in a margin or table),
    /// `segments` holds the single [`Segment::placeholder`], whose text is
    /// [`PLACEHOLDER_TEXT`](crate::PLACEHOLDER_TEXT) rather than document
    /// content. Check [`Segment::is_placeholder`] to tell the cases apart.
    #[must_use]
    pub fn analyze(&self, doc: &Document) -> Analysis {
        let page_count = doc.page_count();
        let target_blocks = target_ceiling(page_count, self.config.pages_per_segment);
        info!(page_count, target_blocks, "segmenting document");

        let font_stats = FontStats::from_document(doc, self.config.header_ratio);
        match &font_stats {
            Some(stats) => info!(
                median = stats.median,
                threshold = stats.threshold,
                "body font statistics"
            ),
            None => warn!("no native text detected; document may be scanned"),
        }

        let raw_blocks = build_blocks(doc, font_stats, &self.config);
        let merged_blocks = merge_to_target(raw_blocks.clone(), target_blocks);

        let mut ids = SegmentIds::new();
        let mut segments: Vec<Segment> = merged_blocks
            .iter()
            .flat_map(|block| self.chunker.segments(block, classify(block), &mut ids))
            .collect();

        if segments.is_empty() {
            segments.push(Segment::placeholder());
        }
        info!(segments = segments.len(), "segmentation complete");

        Analysis {
            page_count,
            target_blocks,
            font_stats,
            raw_blocks,
            merged_blocks,
            segments,
        }
    }
}

impl Default for Segmenter {
    fn default() -> Self {
        let config = SegmenterConfig::default();
        let chunker = Chunker::new(config.max_chars);
        Self { config, chunker }
    }
}
