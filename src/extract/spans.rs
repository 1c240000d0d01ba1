//! Span-level provider — one keyed text block per show operation.

use indexmap::IndexMap;
use tracing::debug;

use super::interp::SpanEvent;
use super::{BBox, BlockKey, ColorSpec, TextBlock};

const ASCENT_FACTOR: f32 = 0.8;
const DESCENT_FACTOR: f32 = 0.2;

/// Emits one block per span event, keyed by `(text, page, x0, y0)`.
///
/// Blocks keep insertion order so downstream tie-breaks are deterministic.
/// A later span with an identical key overwrites the earlier one — such
/// collisions are rare and non-semantic, so last-write-wins is acceptable.
pub(crate) fn span_blocks(events: &[SpanEvent]) -> IndexMap<BlockKey, TextBlock> {
    let mut blocks = IndexMap::new();

    for event in events {
        let text = event.text.trim();
        if text.is_empty() {
            continue;
        }

        let y0 = event.page_height - (event.baseline + ASCENT_FACTOR * event.font_size);
        let y1 = event.page_height - (event.baseline - DESCENT_FACTOR * event.font_size);

        let key = BlockKey::new(text, event.page, event.x, y0);
        let block = TextBlock {
            text: text.to_string(),
            bbox: BBox {
                x0: event.x,
                y0,
                x1: event.x + event.width,
                y1,
            },
            font_name: event.font_name.clone(),
            font_size: event.font_size,
            color: ColorSpec::Rgb(event.color),
            page: event.page,
        };

        if blocks.insert(key.clone(), block).is_some() {
            debug!("span block key collision, keeping later span: {}", key.as_str());
        }
    }

    blocks
}
