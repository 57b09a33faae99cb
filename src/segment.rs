//! The Segment type: a typed, size-bounded piece of a document.

use serde::{Deserialize, Serialize};

/// What kind of material a segment holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentType {
    /// Explanatory prose. The default.
    #[default]
    Instructional,
    /// Numbered problems or tasks for the reader.
    Exercise,
    /// Worked answers.
    Solution,
    /// Appendices, indexes and lookup tables.
    ReferenceTable,
}

impl SegmentType {
    /// The snake-case label used on the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Instructional => "instructional",
            Self::Exercise => "exercise",
            Self::Solution => "solution",
            Self::ReferenceTable => "reference_table",
        }
    }
}

impl std::fmt::Display for SegmentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final output unit handed to downstream scoring.
///
/// Segments are created once by the chunker and never mutated. Ids start at
/// 1 and increase strictly in emission order:
///
/// ```text
/// Block "Ch1" (3 chunks)   -> Segment 1, 2, 3   heading "Ch1"
/// Block "Ch2" (1 chunk)    -> Segment 4         heading "Ch2"
/// ```
///
/// ```rust
/// use docslab::{Segment, SegmentType};
///
/// let segment = Segment::new(1, Some("Loops"), "A loop repeats.", SegmentType::Instructional);
/// assert_eq!(segment.len(), 15);
///
/// let json = serde_json::to_string(&segment).unwrap();
/// assert!(json.contains(r#""segment_type":"instructional""#));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// One-based id, unique within a document.
    pub id: usize,
    /// Heading of the block this segment came from.
    pub heading: Option<String>,
    /// Segment text; never empty.
    pub text: String,
    /// Content classification.
    pub segment_type: SegmentType,
}

/// Text of the segment returned when a document could not be read.
pub const PLACEHOLDER_TEXT: &str = "[NO EXTRACTABLE TEXT]";

impl Segment {
    /// Create a segment.
    #[must_use]
    pub fn new(
        id: usize,
        heading: Option<&str>,
        text: impl Into<String>,
        segment_type: SegmentType,
    ) -> Self {
        Self {
            id,
            heading: heading.map(str::to_string),
            text: text.into(),
            segment_type,
        }
    }

    /// The single segment standing in for an unreadable document.
    #[must_use]
    pub fn placeholder() -> Self {
        Self::new(1, None, PLACEHOLDER_TEXT, SegmentType::Instructional)
    }

    /// Whether this is the unreadable-document placeholder.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.heading.is_none() && self.text == PLACEHOLDER_TEXT
    }

    /// Length of the text in characters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    /// Whether the text is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Segment {{ id: {}, type: {}, heading: {:?}, len: {} }}",
            self.id,
            self.segment_type,
            self.heading.as_deref().unwrap_or(""),
            self.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_labels() {
        assert_eq!(SegmentType::ReferenceTable.to_string(), "reference_table");
        assert_eq!(SegmentType::default(), SegmentType::Instructional);
        let parsed: SegmentType = serde_json::from_str(r#""solution""#).unwrap();
        assert_eq!(parsed, SegmentType::Solution);
    }

    #[test]
    fn test_len_counts_chars() {
        let segment = Segment::new(1, None, "naïve", SegmentType::Exercise);
        assert_eq!(segment.len(), 5);
        assert!(!segment.is_empty());
    }

    #[test]
    fn test_placeholder() {
        let segment = Segment::placeholder();
        assert_eq!(segment.id, 1);
        assert!(segment.is_placeholder());
        assert!(!segment.is_empty());
    }

    #[test]
    fn test_display() {
        let segment = Segment::new(3, Some("Loops"), "abc", SegmentType::Solution);
        assert_eq!(
            segment.to_string(),
            r#"Segment { id: 3, type: solution, heading: "Loops", len: 3 }"#
        );
    }

    #[test]
    fn test_json_null_heading() {
        let json = serde_json::to_string(&Segment::new(2, None, "t", SegmentType::Exercise)).unwrap();
        assert_eq!(json, r#"{"id":2,"heading":null,"text":"t","segment_type":"exercise"}"#);
    }
}
