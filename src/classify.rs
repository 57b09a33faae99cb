//! Content-type classification of merged blocks.
//!
//! Rules are evaluated in order and the first match wins:
//!
//! | Order | Type | Fires when |
//! |-------|------|------------|
//! | 1 | `reference_table` | heading mentions appendix / index / reference table |
//! | 2 | `solution` | heading or opening of body starts with Answer / Solution |
//! | 3 | `exercise` | heading is numbered exercise, or ≥3 problem lines making ≥40% of the body |
//! | 4 | `instructional` | otherwise |

use std::sync::LazyLock;

use regex::Regex;

use crate::{Block, SegmentType};

/// How much of the body is inspected for a solution label.
pub const SOLUTION_PREFIX_CHARS: usize = 60;

const MIN_EXERCISE_LINES: usize = 3;
const MIN_EXERCISE_FRACTION: f64 = 0.4;

static REFERENCE_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(appendix|table of|reference table|index)\b").expect("valid reference regex")
});

static SOLUTION_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(solutions?|answers?|answer to|solution to)\b").expect("valid solution regex")
});

static EXERCISE_LINE: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        Regex::new(r"(?i)^(\d+[.)]|practice\s+\d|exercise\s+\d|q\d+[.)])")
            .expect("valid numbered exercise regex"),
        Regex::new(r"(?i)^(write a program|create a|implement|design a)\b")
            .expect("valid imperative exercise regex"),
    ]
});

/// A classification rule: the type it assigns and when it fires.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    /// Type assigned when the rule matches.
    pub segment_type: SegmentType,
    /// Predicate over `(heading, body)`.
    pub matches: fn(&str, &str) -> bool,
}

/// The ordered rule list. Blocks matching none are instructional.
pub static RULES: [Rule; 3] = [
    Rule {
        segment_type: SegmentType::ReferenceTable,
        matches: is_reference,
    },
    Rule {
        segment_type: SegmentType::Solution,
        matches: is_solution,
    },
    Rule {
        segment_type: SegmentType::Exercise,
        matches: is_exercise,
    },
];

/// Classify a block.
#[must_use]
pub fn classify(block: &Block) -> SegmentType {
    classify_parts(block.heading.as_deref(), &block.body)
}

/// Classify a heading and body.
#[must_use]
pub fn classify_parts(heading: Option<&str>, body: &str) -> SegmentType {
    let heading = heading.unwrap_or("").trim();
    RULES
        .iter()
        .find(|rule| (rule.matches)(heading, body))
        .map_or(SegmentType::Instructional, |rule| rule.segment_type)
}

fn is_reference(heading: &str, _body: &str) -> bool {
    REFERENCE_HEADING.is_match(heading)
}

fn is_solution(heading: &str, body: &str) -> bool {
    let opening: String = body.trim_start().chars().take(SOLUTION_PREFIX_CHARS).collect();
    SOLUTION_LABEL.is_match(heading) || SOLUTION_LABEL.is_match(&opening)
}

fn is_exercise(heading: &str, body: &str) -> bool {
    if is_exercise_line(heading) {
        return true;
    }
    let lines: Vec<&str> = body.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
    let hits = lines.iter().filter(|line| is_exercise_line(line)).count();
    hits >= MIN_EXERCISE_LINES && hits as f64 >= lines.len() as f64 * MIN_EXERCISE_FRACTION
}

fn is_exercise_line(line: &str) -> bool {
    EXERCISE_LINE.iter().any(|re| re.is_match(line))
}
