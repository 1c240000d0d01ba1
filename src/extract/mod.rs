//! Layout extraction — two views of the same document.
//!
//! Classification and replacement genuinely need different granularities, so
//! extraction is modeled as two collaborating providers behind this facade:
//!
//! - [`lines`] produces line-level [`TextRun`]s (mono-styled, one per visual
//!   line) that feed the section classifier and proximity grouper.
//! - [`spans`] produces span-level [`TextBlock`]s keyed by a stable composite
//!   key that feed the block matcher and rewriter.
//!
//! Both providers consume the positioned span events of one shared
//! content-stream interpretation pass ([`interp`]), so the two views are
//! guaranteed to describe the same glyphs.
//!
//! Coordinates are normalized to a top-left origin (y increases downward):
//! ascending y is reading order and the vertical gap between two runs is
//! `next.y0 - prev.y1`. The rewriter converts back to PDF-native bottom-left
//! coordinates when painting.

mod interp;
mod lines;
mod spans;

pub(crate) use interp::page_height;

use indexmap::IndexMap;
use lopdf::Document;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::EngineConfig;
use crate::errors::EngineError;

// ────────────────────────────────────────────────────────────────────────────
// Geometry
// ────────────────────────────────────────────────────────────────────────────

/// Axis-aligned bounding box, top-left origin, y increasing downward.
///
/// Invariant: `x0 <= x1` and `y0 <= y1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl BBox {
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    pub fn is_well_formed(&self) -> bool {
        self.x0 <= self.x1 && self.y0 <= self.y1
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Extracted records
// ────────────────────────────────────────────────────────────────────────────

/// A single extracted line of text with position and font metadata.
///
/// A line is treated as mono-styled: it carries the font name and size of its
/// first span. Unit of section classification and proximity grouping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    pub bbox: BBox,
    pub font_name: String,
    pub font_size: f32,
    /// Zero-based page index.
    pub page: usize,
}

/// Text color as extracted — either a packed `0xRRGGBB` integer or a
/// component triple, normalized to `[0,1]³` RGB at paint time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ColorSpec {
    Packed(u32),
    Rgb([f32; 3]),
}

impl ColorSpec {
    /// Normalizes to an RGB triple with components clamped to [0,1].
    pub fn to_rgb(self) -> [f32; 3] {
        match self {
            ColorSpec::Packed(v) => [
                ((v >> 16) & 0xFF) as f32 / 255.0,
                ((v >> 8) & 0xFF) as f32 / 255.0,
                (v & 0xFF) as f32 / 255.0,
            ],
            ColorSpec::Rgb(rgb) => [
                rgb[0].clamp(0.0, 1.0),
                rgb[1].clamp(0.0, 1.0),
                rgb[2].clamp(0.0, 1.0),
            ],
        }
    }
}

/// Stable composite key for a span-level block.
///
/// Derived from `(text, page, x0, y0)` with coordinates rounded to one
/// decimal. Keys are unique within one extraction pass; a coinciding later
/// span overwrites the earlier one (such collisions are rare and
/// non-semantic).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockKey(String);

impl BlockKey {
    pub fn new(text: &str, page: usize, x0: f32, y0: f32) -> Self {
        BlockKey(format!("{text}_{page}_{x0:.1}_{y0:.1}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A span-level text fragment — the unit of replacement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    pub text: String,
    pub bbox: BBox,
    pub font_name: String,
    pub font_size: f32,
    pub color: ColorSpec,
    /// Zero-based page index.
    pub page: usize,
}

/// Both extraction views over one document.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub line_runs: Vec<TextRun>,
    /// Insertion-ordered so the matcher's first-seen tie-break is stable.
    pub span_blocks: IndexMap<BlockKey, TextBlock>,
}

// ────────────────────────────────────────────────────────────────────────────
// Facade
// ────────────────────────────────────────────────────────────────────────────

/// Extracts both views from a loaded document.
///
/// Fails with [`EngineError::Extraction`] if the document yields no text at
/// all (e.g. scanned image-only pages). Never mutates the source document.
pub fn extract(doc: &Document, config: &EngineConfig) -> Result<Extraction, EngineError> {
    let events = interp::interpret_document(doc)?;

    let line_runs = lines::line_runs(&events, config);
    let span_blocks = spans::span_blocks(&events);

    if line_runs.is_empty() {
        return Err(EngineError::Extraction(
            "document has no extractable text layer".to_string(),
        ));
    }

    info!(
        "Extracted {} line runs and {} span blocks",
        line_runs.len(),
        span_blocks.len()
    );

    Ok(Extraction {
        line_runs,
        span_blocks,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
