//! Segmenter configuration.
//!
//! Every knob has a default tuned for typeset course books: chapter titles
//! set well above body size, running headers in the top tenth of the page,
//! footers in the bottom twelfth.
//!
//! ```rust
//! use docslab::SegmenterConfig;
//!
//! let config = SegmenterConfig::default()
//!     .with_max_chars(4000)
//!     .with_pages_per_segment(5);
//! assert!(config.validate().is_ok());
//!
//! let config = SegmenterConfig::from_json_str(r#"{ "max_chars": 1200 }"#).unwrap();
//! assert_eq!(config.max_chars, 1200);
//! assert_eq!(config.pages_per_segment, 10);
//! ```

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Tuning parameters for one segmentation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmenterConfig {
    /// Hard ceiling on segment length, in characters.
    pub max_chars: usize,
    /// Pages per segment used to derive the block ceiling.
    pub pages_per_segment: usize,
    /// Header threshold as a multiple of the median font size.
    pub header_ratio: f32,
    /// Lines at least this long are never headers.
    pub max_title_chars: usize,
    /// Fraction of page height cropped from the top (running headers).
    pub crop_top: f32,
    /// Fraction of page height cropped from the bottom (footers).
    pub crop_bottom: f32,
    /// Vertical bucket size, in points, for grouping tokens into lines.
    pub baseline_tolerance: f32,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            max_chars: 8000,
            pages_per_segment: 10,
            header_ratio: 1.4,
            max_title_chars: 80,
            crop_top: 0.10,
            crop_bottom: 0.08,
            baseline_tolerance: 2.0,
        }
    }
}

impl SegmenterConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a value is out of range.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the segment length ceiling.
    #[must_use]
    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    /// Set the pages-per-segment budget.
    #[must_use]
    pub fn with_pages_per_segment(mut self, pages: usize) -> Self {
        self.pages_per_segment = pages;
        self
    }

    /// Set the header threshold multiplier.
    #[must_use]
    pub fn with_header_ratio(mut self, ratio: f32) -> Self {
        self.header_ratio = ratio;
        self
    }

    /// Set the length at which a line stops being a title candidate.
    #[must_use]
    pub fn with_max_title_chars(mut self, chars: usize) -> Self {
        self.max_title_chars = chars;
        self
    }

    /// Set the vertical bucket size used to group tokens into lines.
    #[must_use]
    pub fn with_baseline_tolerance(mut self, points: f32) -> Self {
        self.baseline_tolerance = points;
        self
    }

    /// Set the body crop fractions.
    #[must_use]
    pub fn with_crop(mut self, top: f32, bottom: f32) -> Self {
        self.crop_top = top;
        self.crop_bottom = bottom;
        self
    }

    /// Check that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        if self.max_chars == 0 {
            return Err(Error::invalid_config("max_chars", "must be > 0"));
        }
        if self.pages_per_segment == 0 {
            return Err(Error::invalid_config("pages_per_segment", "must be > 0"));
        }
        if !(self.header_ratio.is_finite() && self.header_ratio > 0.0) {
            return Err(Error::invalid_config(
                "header_ratio",
                format!("must be a positive number, got {}", self.header_ratio),
            ));
        }
        if !(self.baseline_tolerance.is_finite() && self.baseline_tolerance > 0.0) {
            return Err(Error::invalid_config(
                "baseline_tolerance",
                format!("must be a positive number, got {}", self.baseline_tolerance),
            ));
        }
        for (field, value) in [("crop_top", self.crop_top), ("crop_bottom", self.crop_bottom)] {
            if !(0.0..1.0).contains(&value) {
                return Err(Error::invalid_config(
                    field,
                    format!("must be in [0, 1), got {value}"),
                ));
            }
        }
        if self.crop_top + self.crop_bottom >= 1.0 {
            return Err(Error::invalid_config(
                "crop_bottom",
                "crop fractions leave no body region",
            ));
        }
        Ok(())
    }

    /// Top edge of the body region for a page of the given height.
    #[must_use]
    pub fn body_top(&self, height: f32) -> f32 {
        height * self.crop_top
    }

    /// Bottom edge of the body region for a page of the given height.
    #[must_use]
    pub fn body_bottom(&self, height: f32) -> f32 {
        height * (1.0 - self.crop_bottom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SegmenterConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_chars, 8000);
        assert_eq!(config.pages_per_segment, 10);
    }

    #[test]
    fn test_zero_max_chars_rejected() {
        let err = SegmenterConfig::default()
            .with_max_chars(0)
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidConfig {
                field: "max_chars",
                ..
            }
        ));
    }

    #[test]
    fn test_zero_pages_rejected() {
        let result = SegmenterConfig::default().with_pages_per_segment(0).validate();
        assert!(result.is_err());
    }

    #[test]
    fn test_crop_overlap_rejected() {
        assert!(SegmenterConfig::default().with_crop(0.6, 0.5).validate().is_err());
        assert!(SegmenterConfig::default().with_crop(-0.1, 0.1).validate().is_err());
        assert!(SegmenterConfig::default().with_crop(0.0, 0.0).validate().is_ok());
    }

    #[test]
    fn test_title_and_tolerance_setters() {
        let config = SegmenterConfig::default()
            .with_max_title_chars(40)
            .with_baseline_tolerance(3.5);
        assert_eq!(config.max_title_chars, 40);
        assert!((config.baseline_tolerance - 3.5).abs() < f32::EPSILON);
        assert!(config.validate().is_ok());

        let err = SegmenterConfig::default()
            .with_baseline_tolerance(0.0)
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidConfig {
                field: "baseline_tolerance",
                ..
            }
        ));
    }

    #[test]
    fn test_nan_ratio_rejected() {
        let result = SegmenterConfig::default().with_header_ratio(f32::NAN).validate();
        assert!(result.is_err());
    }

    #[test]
    fn test_json_partial_config() {
        let config = SegmenterConfig::from_json_str(r#"{"header_ratio": 1.6}"#).unwrap();
        assert!((config.header_ratio - 1.6).abs() < f32::EPSILON);
        assert_eq!(config.max_title_chars, 80);
    }

    #[test]
    fn test_json_invalid_value() {
        assert!(SegmenterConfig::from_json_str(r#"{"max_chars": 0}"#).is_err());
        assert!(SegmenterConfig::from_json_str("not json").is_err());
    }

    #[test]
    fn test_body_region() {
        let config = SegmenterConfig::default();
        assert!((config.body_top(800.0) - 80.0).abs() < 1e-3);
        assert!((config.body_bottom(800.0) - 736.0).abs() < 1e-3);
    }
}
