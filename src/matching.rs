//! Block matching — maps a text query back to the best span-level block.

use indexmap::IndexMap;

use crate::extract::{BlockKey, TextBlock};

/// Finds the block whose text best matches `query` by containment scoring.
///
/// Exact equality wins immediately. Otherwise, if one text contains the
/// other, the score is the length ratio of the shorter to the longer; the
/// best-scoring block is accepted only above `threshold`. Ties keep the first
/// candidate encountered — the map iterates in insertion order, so the result
/// is deterministic.
///
/// `None` means the caller should drop this replacement (soft failure).
pub fn find_best_block(
    query: &str,
    blocks: &IndexMap<BlockKey, TextBlock>,
    threshold: f64,
) -> Option<BlockKey> {
    let query_len = query.chars().count() as f64;
    if query.is_empty() {
        return None;
    }

    let mut best: Option<&BlockKey> = None;
    let mut best_score = 0.0_f64;

    for (key, block) in blocks {
        let block_text = block.text.as_str();

        if query == block_text {
            return Some(key.clone());
        }

        let score = if block_text.contains(query) {
            query_len / block_text.chars().count() as f64
        } else if query.contains(block_text) {
            block_text.chars().count() as f64 / query_len
        } else {
            continue;
        };

        if score > best_score {
            best_score = score;
            best = Some(key);
        }
    }

    if best_score > threshold {
        best.cloned()
    } else {
        None
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
