//! Structural annotation of a page's entries.
//!
//! Tables, figure captions and code listings are not narrative prose. They
//! are rewritten into inline markers so that downstream consumers can tell
//! them apart from body text:
//!
//! ```text
//! Entry::Table ["Op", "Meaning"]       ->  [TABLE: Op | Meaning]
//! "Fig. 2.3 The call stack"            ->  [FIGURE Fig. 2.3: The call stack]
//! code, code, code, prose              ->  [CODE] code code code [/CODE] prose
//! ```
//!
//! A code run is closed by any non-code line, a table, a header line, or the
//! end of the page.

use std::sync::LazyLock;

use regex::Regex;

use crate::header::HeaderRule;
use crate::normalize::Entry;
use crate::Line;

static FIGURE_CAPTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(Fig\.?\s*\d+\.\d+)\s+(.+)$").expect("valid figure caption regex")
});

/// Opens a code listing.
pub const CODE_OPEN: &str = "[CODE]";
/// Closes a code listing.
pub const CODE_CLOSE: &str = "[/CODE]";

/// A page item after annotation.
#[derive(Debug, Clone, PartialEq)]
pub enum Annotated {
    /// A structural marker line; never a header.
    Marker(String),
    /// An ordinary line, possibly a header.
    Line(Line),
}

impl Annotated {
    /// The text this item contributes to a block body.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Marker(text) => text,
            Self::Line(line) => &line.text,
        }
    }
}

/// Render a table's first row as a marker line.
#[must_use]
pub fn table_marker(first_row: &[String]) -> String {
    if first_row.is_empty() {
        "[TABLE]".to_string()
    } else {
        format!("[TABLE: {}]", first_row.join(" | "))
    }
}

/// Rewrite a figure caption line, if it is one.
///
/// The id keeps its `Fig.` label as printed: `[FIGURE Fig. 1.1: caption]`.
#[must_use]
pub fn figure_marker(text: &str) -> Option<String> {
    let caps = FIGURE_CAPTION.captures(text.trim())?;
    Some(format!("[FIGURE {}: {}]", &caps[1], caps[2].trim()))
}

/// Annotate one page's entries, preserving their order.
#[must_use]
pub fn annotate_page(entries: Vec<Entry>, rule: &HeaderRule) -> Vec<Annotated> {
    let mut out = Vec::with_capacity(entries.len());
    let mut in_code = false;

    for entry in entries {
        let line = match entry {
            Entry::Table { first_row, .. } => {
                close_code(&mut out, &mut in_code);
                out.push(Annotated::Marker(table_marker(&first_row)));
                continue;
            }
            Entry::Line(line) => line,
        };

        // Page numbers are dropped by the blocker and leave code runs open.
        if line.is_page_number() {
            out.push(Annotated::Line(line));
            continue;
        }

        if rule.is_header(&line) {
            close_code(&mut out, &mut in_code);
            out.push(Annotated::Line(line));
            continue;
        }

        if line.is_code {
            if !in_code {
                out.push(Annotated::Marker(CODE_OPEN.to_string()));
                in_code = true;
            }
            out.push(Annotated::Line(line));
            continue;
        }

        close_code(&mut out, &mut in_code);
        match figure_marker(&line.text) {
            Some(marker) => out.push(Annotated::Marker(marker)),
            None => out.push(Annotated::Line(line)),
        }
    }

    close_code(&mut out, &mut in_code);
    out
}

fn close_code(out: &mut Vec<Annotated>, in_code: &mut bool) {
    if *in_code {
        out.push(Annotated::Marker(CODE_CLOSE.to_string()));
        *in_code = false;
    }
}
