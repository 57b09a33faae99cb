//! Positioned-text input model.
//!
//! A [`Document`] is what the PDF extraction collaborator hands over: for
//! each page its size, the text runs it found (with coordinates and font
//! metadata), and any table regions it detected.
//!
//! ## Coordinates
//!
//! Coordinates are in PDF points with the origin at the top-left corner of
//! the page, `top` growing downwards:
//!
//! ```text
//! (0,0) ─────────────────────────── x
//!   │   ┌────────────┐
//!   │   │ token      │ top
//!   │   └────────────┘ bottom
//!   │   x0           x1
//!   y
//! ```
//!
//! ## Wire Shape
//!
//! Extractors are sloppy: attributes go missing, sizes come back as `NaN`.
//! [`RawToken`] therefore keeps every attribute optional and
//! [`RawToken::validate`] is the single gate that turns it into a [`Token`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::Result;

/// A validated text run with its geometry and font.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The run's text.
    pub text: String,
    /// Left edge.
    pub x0: f32,
    /// Right edge.
    pub x1: f32,
    /// Top edge.
    pub top: f32,
    /// Bottom edge.
    pub bottom: f32,
    /// Font size in points.
    pub size: f32,
    /// Font family name, e.g. `"Courier-Bold"`.
    pub font: String,
}

impl Token {
    /// Create a token whose box is derived from its position and size.
    #[must_use]
    pub fn new(text: impl Into<String>, x0: f32, top: f32, size: f32) -> Self {
        let text = text.into();
        let width = size * 0.5 * text.chars().count() as f32;
        Self {
            text,
            x0,
            x1: x0 + width,
            top,
            bottom: top + size,
            size,
            font: String::new(),
        }
    }

    /// Set the font family.
    #[must_use]
    pub fn with_font(mut self, font: impl Into<String>) -> Self {
        self.font = font.into();
        self
    }

    /// Whether the box lies entirely inside `bbox`.
    #[must_use]
    pub fn is_within(&self, bbox: &BBox) -> bool {
        self.x0 >= bbox.x0 && self.x1 <= bbox.x1 && self.top >= bbox.top && self.bottom <= bbox.bottom
    }
}

/// A token as emitted by the extractor, before validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawToken {
    /// The run's text.
    pub text: String,
    /// Left edge.
    pub x0: Option<f32>,
    /// Right edge.
    pub x1: Option<f32>,
    /// Top edge.
    pub top: Option<f32>,
    /// Bottom edge.
    pub bottom: Option<f32>,
    /// Font size in points.
    pub size: Option<f32>,
    /// Font family name.
    pub fontname: Option<String>,
}

impl RawToken {
    /// Turn the raw token into a [`Token`].
    ///
    /// Returns `None` when the text is empty or `x0`, `top` or `size` is
    /// missing or not finite. A missing `x1` collapses the box to `x0`; a
    /// missing `bottom` is taken as `top + size`.
    #[must_use]
    pub fn validate(&self) -> Option<Token> {
        if self.text.is_empty() {
            return None;
        }
        let finite = |v: Option<f32>| v.filter(|v| v.is_finite());
        let x0 = finite(self.x0)?;
        let top = finite(self.top)?;
        let size = finite(self.size)?;
        Some(Token {
            text: self.text.clone(),
            x0,
            x1: finite(self.x1).unwrap_or(x0),
            top,
            bottom: finite(self.bottom).unwrap_or(top + size),
            size,
            font: self.fontname.clone().unwrap_or_default(),
        })
    }

    /// Font size if the token carries a usable one.
    #[must_use]
    pub fn font_size(&self) -> Option<f32> {
        self.size.filter(|s| s.is_finite())
    }
}

impl From<Token> for RawToken {
    fn from(token: Token) -> Self {
        Self {
            text: token.text,
            x0: Some(token.x0),
            x1: Some(token.x1),
            top: Some(token.top),
            bottom: Some(token.bottom),
            size: Some(token.size),
            fontname: (!token.font.is_empty()).then_some(token.font),
        }
    }
}

/// An axis-aligned box in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    /// Left edge.
    pub x0: f32,
    /// Top edge.
    pub top: f32,
    /// Right edge.
    pub x1: f32,
    /// Bottom edge.
    pub bottom: f32,
}

impl BBox {
    /// Create a box from its edges.
    #[must_use]
    pub const fn new(x0: f32, top: f32, x1: f32, bottom: f32) -> Self {
        Self { x0, top, x1, bottom }
    }
}

/// A table detected by the extractor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRegion {
    /// Where the table sits on the page.
    pub bbox: BBox,
    /// Cell texts of the first extracted row; empty when extraction failed.
    #[serde(default)]
    pub first_row: Vec<String>,
}

impl TableRegion {
    /// Create a table region.
    #[must_use]
    pub fn new(bbox: BBox, first_row: Vec<String>) -> Self {
        Self { bbox, first_row }
    }
}

/// One page of extracted content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Page width in points.
    pub width: f32,
    /// Page height in points.
    pub height: f32,
    /// Text runs in extraction order.
    #[serde(default)]
    pub tokens: Vec<RawToken>,
    /// Detected tables.
    #[serde(default)]
    pub tables: Vec<TableRegion>,
}

impl Page {
    /// Create an empty page.
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            tokens: Vec::new(),
            tables: Vec::new(),
        }
    }

    /// Append a token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<RawToken>) -> Self {
        self.tokens.push(token.into());
        self
    }

    /// Append several tokens.
    #[must_use]
    pub fn with_tokens<T: Into<RawToken>>(mut self, tokens: impl IntoIterator<Item = T>) -> Self {
        self.tokens.extend(tokens.into_iter().map(Into::into));
        self
    }

    /// Append a table region.
    #[must_use]
    pub fn with_table(mut self, table: TableRegion) -> Self {
        self.tables.push(table);
        self
    }
}

/// A whole document: pages in reading order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// The pages.
    #[serde(default)]
    pub pages: Vec<Page>,
}

impl Document {
    /// Create a document from its pages.
    #[must_use]
    pub fn new(pages: Vec<Page>) -> Self {
        Self { pages }
    }

    /// Total page count, including pages without text.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Parse a document from the extractor's JSON output.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Json`] if the JSON does not describe a document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Something that can produce a [`Document`].
///
/// This is the seam to the PDF extraction library. Implementations may do
/// blocking I/O; the segmenter calls [`DocumentSource::extract`] once per run.
pub trait DocumentSource {
    /// Extract the full document.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying reader fails.
    fn extract(&self) -> Result<Document>;

    /// Human-readable name used in logs.
    fn name(&self) -> String {
        "<document>".to_string()
    }
}

impl DocumentSource for Document {
    fn extract(&self) -> Result<Document> {
        Ok(self.clone())
    }
}

/// Reads a [`Document`] serialized as JSON from disk.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    /// Create a source for the given path.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl DocumentSource for JsonFileSource {
    fn extract(&self) -> Result<Document> {
        let json = std::fs::read_to_string(&self.path)?;
        Document::from_json_str(&json)
    }

    fn name(&self) -> String {
        self.path.display().to_string()
    }
}
