//! Engine configuration — every tunable heuristic in one explicit structure.
//!
//! The thresholds below are empirically chosen defaults, not load-bearing
//! constants. They are hoisted here so the heuristics stay testable and
//! tunable without hidden module-level state.

use serde::{Deserialize, Serialize};

/// Tunable parameters for the customization pipeline.
///
/// Construct with [`EngineConfig::default`] and override individual fields as
/// needed. All distances are in PDF layout units (points); the internal
/// coordinate convention is top-left origin with y increasing downward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Maximum vertical gap between consecutive runs in one proximity group.
    /// Default: 20.0.
    pub proximity_gap: f32,

    /// Minimum containment score for a block match to be accepted.
    /// Default: 0.5.
    pub match_threshold: f64,

    /// Replacement text wider than `bbox_width * width_tolerance` cannot be
    /// drawn as a single line at the original size. Default: 1.05.
    pub width_tolerance: f32,

    /// Runs with a larger font size than this are treated as section headers.
    /// Default: 11.0.
    pub header_font_threshold: f32,

    /// Short runs (fewer chars than this) containing an uppercase letter are
    /// also treated as headers. Default: 30.
    pub header_max_chars: usize,

    /// Groups whose joined text is shorter than this are not customized.
    /// Default: 10.
    pub min_group_chars: usize,

    /// Generated text whose length drifts more than this fraction from the
    /// original triggers a single length-adjustment refinement call.
    /// Default: 0.2 (accept within 80%–120% of the original length).
    pub length_drift_tolerance: f32,

    /// Printable font size range; sizes outside fall back to
    /// `font_size_default`. Defaults: 6.0–24.0, default 11.0.
    pub font_size_min: f32,
    pub font_size_max: f32,
    pub font_size_default: f32,

    /// Replacement text longer than this is word-wrapped instead of scaled
    /// down when it overflows its box. Default: 50.
    pub wrap_min_chars: usize,

    /// Lower bound for scaled-down font sizes. Default: 7.0.
    pub scale_floor: f32,

    /// Safety factor applied when shrinking a font to fit. Default: 0.95.
    pub scale_safety: f32,

    /// Line height as a multiple of font size for wrapped text. Default: 1.2.
    pub line_height_factor: f32,

    /// Padding added around the cover rectangle that masks original glyphs.
    /// Default: 1.0.
    pub mask_padding: f32,

    /// Fill color of the cover rectangle, RGB in [0,1]. Default: white.
    pub mask_color: [f32; 3],

    /// Baseline sits this fraction of the font size above the box bottom —
    /// box coordinates and glyph baselines are offset. Default: 0.2.
    pub baseline_shift_factor: f32,

    /// Spans whose baselines differ by less than this belong to the same
    /// extracted line. Default: 3.0.
    pub line_y_tolerance: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            proximity_gap: 20.0,
            match_threshold: 0.5,
            width_tolerance: 1.05,
            header_font_threshold: 11.0,
            header_max_chars: 30,
            min_group_chars: 10,
            length_drift_tolerance: 0.2,
            font_size_min: 6.0,
            font_size_max: 24.0,
            font_size_default: 11.0,
            wrap_min_chars: 50,
            scale_floor: 7.0,
            scale_safety: 0.95,
            line_height_factor: 1.2,
            mask_padding: 1.0,
            mask_color: [1.0, 1.0, 1.0],
            baseline_shift_factor: 0.2,
            line_y_tolerance: 3.0,
        }
    }
}
