//! Replacement plan — the accumulated set of block-level substitutions.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::extract::{BlockKey, TextBlock};

/// One planned substitution: new text for the span at `block`'s position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedReplacement {
    pub new_text: String,
    pub block: TextBlock,
}

/// Mapping from block key to planned replacement, built incrementally while
/// walking groups. Lives only for the duration of one customization call.
#[derive(Debug, Clone, Default)]
pub struct ReplacementPlan {
    entries: IndexMap<BlockKey, PlannedReplacement>,
}

impl ReplacementPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a replacement. A key may be overwritten when multiple groups
    /// independently match the same block; last write wins, logged non-fatal.
    pub fn insert(&mut self, key: BlockKey, new_text: String, block: TextBlock) {
        let replaced = self.entries.insert(
            key.clone(),
            PlannedReplacement { new_text, block },
        );
        if replaced.is_some() {
            warn!(
                "replacement plan overwrote existing entry for block {}",
                key.as_str()
            );
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&BlockKey, &PlannedReplacement)> {
        self.entries.iter()
    }

    pub fn get(&self, key: &BlockKey) -> Option<&PlannedReplacement> {
        self.entries.get(key)
    }
}
