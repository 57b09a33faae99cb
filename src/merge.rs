//! Greedy block merging down to a page-derived ceiling.
//!
//! A course book of `P` pages may yield far more header-delimited blocks
//! than downstream scoring can afford. The ceiling is
//! `K = max(1, P / pages_per_segment)`, and blocks are merged pairwise until
//! at most `K` remain.
//!
//! Each step merges the adjacent pair with the smallest combined body
//! length, so stubs and one-line asides fold into their neighbours before
//! substantive sections are touched:
//!
//! ```text
//! K = 2
//! [Ch1 "Short."] [Ch2 "Also short."] [Ch3 "A much longer block..."]
//!      └──── 6 + 11 = 17 ────┘  └──── 11 + 33 = 44 ────┘
//! merge 0+1 -> [Ch1 "Short.\n\nAlso short."] [Ch3 "..."]
//! ```
//!
//! The earlier block's heading survives; ties go to the earliest pair. This
//! is greedy, not globally optimal, but it is deterministic.

use crate::Block;

/// Separator placed between merged bodies.
pub const MERGE_SEPARATOR: &str = "\n\n";

/// Block ceiling for a document: `max(1, page_count / pages_per_segment)`.
///
/// # Panics
///
/// Panics if `pages_per_segment == 0`.
#[must_use]
pub fn target_ceiling(page_count: usize, pages_per_segment: usize) -> usize {
    assert!(pages_per_segment > 0, "pages_per_segment must be > 0");
    (page_count / pages_per_segment).max(1)
}

/// Merge adjacent blocks until at most `max_blocks` remain.
///
/// A `max_blocks` of zero is treated as one.
#[must_use]
pub fn merge_to_target(blocks: Vec<Block>, max_blocks: usize) -> Vec<Block> {
    let max_blocks = max_blocks.max(1);
    let mut blocks = blocks;
    // Body lengths kept alongside so each step is a single linear scan.
    let mut lens: Vec<usize> = blocks.iter().map(Block::char_len).collect();

    while blocks.len() > max_blocks {
        let Some(best) = (0..blocks.len() - 1).min_by_key(|&i| lens[i] + lens[i + 1]) else {
            break;
        };
        let later = blocks.remove(best + 1);
        let later_len = lens.remove(best + 1);

        let earlier = &mut blocks[best];
        earlier.body.push_str(MERGE_SEPARATOR);
        earlier.body.push_str(&later.body);
        lens[best] += MERGE_SEPARATOR.len() + later_len;
    }

    tracing::debug!(ceiling = max_blocks, blocks = blocks.len(), "block merge complete");
    blocks
}
