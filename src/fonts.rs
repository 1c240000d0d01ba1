//! Static font-metric tables for the four canonical replacement fonts.
//!
//! Character widths are in em units (relative to font size). This is an
//! intentional approximation — exact glyph metrics would require parsing the
//! source document's embedded font programs, but static tables for the
//! standard base fonts are accurate enough to drive the fit/wrap/scale
//! decision, and the 5% width tolerance absorbs the residual error.
//!
//! All tables cover ASCII 0x20..=0x7E (95 printable characters).
//! Index = (char as usize) - 32.

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Canonical font classes
// ────────────────────────────────────────────────────────────────────────────

/// The canonical set a source font name is mapped into for repainting.
///
/// Original documents embed arbitrary (often subsetted) fonts that cannot be
/// reused for new text; replacement text is drawn with the visually closest
/// standard base font instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FontClass {
    /// Helvetica-equivalent. The default when nothing else matches.
    Sans,
    /// Times-Roman-equivalent.
    Serif,
    /// Courier-equivalent.
    Mono,
    /// Symbol-equivalent (dingbat/symbol faces).
    Symbol,
}

impl FontClass {
    /// The standard base font painted for this class.
    pub fn base_font(self) -> &'static str {
        match self {
            FontClass::Sans => "Helvetica",
            FontClass::Serif => "Times-Roman",
            FontClass::Mono => "Courier",
            FontClass::Symbol => "Symbol",
        }
    }

    /// Resource name used for this class in rewritten page resources.
    pub fn resource_tag(self) -> &'static str {
        match self {
            FontClass::Sans => "FHelv",
            FontClass::Serif => "FTimes",
            FontClass::Mono => "FCour",
            FontClass::Symbol => "FSymb",
        }
    }
}

/// Maps an extracted font name onto a canonical class.
///
/// Matching is by substring on the normalized name (lower-cased, hyphens and
/// spaces stripped, subset prefixes like `ABCDEF+` already removed by the
/// extractor). Unrecognized names default to [`FontClass::Sans`].
pub fn canonical_class(font_name: &str) -> FontClass {
    let clean: String = font_name
        .to_lowercase()
        .chars()
        .filter(|c| *c != '-' && *c != ' ')
        .collect();

    if clean.contains("times") || clean.contains("roman") || clean.contains("garamond") {
        FontClass::Serif
    } else if clean.contains("courier") || clean.contains("mono") {
        FontClass::Mono
    } else if clean.contains("symbol") || clean.contains("zapf") || clean.contains("dingbat") {
        FontClass::Symbol
    } else {
        // helvetica, arial, and everything else
        FontClass::Sans
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Font metric table
// ────────────────────────────────────────────────────────────────────────────

/// Static character-width table for one font class.
///
/// `widths[i]` = width of ASCII character `(i + 32)` in em units, covering
/// 0x20 (space) through 0x7E (~). Non-ASCII characters fall back to
/// `average_char_width`.
pub struct FontMetricTable {
    pub class: FontClass,
    widths: [f32; 95],
    pub average_char_width: f32,
    pub space_width: f32,
}

impl FontMetricTable {
    /// Measures the rendered width of a string in em units.
    pub fn measure_em(&self, s: &str) -> f32 {
        s.chars()
            .map(|c| {
                let code = c as usize;
                if (32..=126).contains(&code) {
                    self.widths[code - 32]
                } else {
                    self.average_char_width
                }
            })
            .sum()
    }

    /// Measures the rendered width of a string in points at `font_size`.
    pub fn measure(&self, s: &str, font_size: f32) -> f32 {
        self.measure_em(s) * font_size
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Static width tables  (95 ASCII printable characters each)
// ────────────────────────────────────────────────────────────────────────────

/// Helvetica — the sans-serif workhorse of standard base fonts.
static SANS_TABLE: FontMetricTable = FontMetricTable {
    class: FontClass::Sans,
    #[rustfmt::skip]
    widths: [
        // sp    !     "     #     $     %     &     '     (     )     *     +     ,     -     .     /
        0.28, 0.28, 0.35, 0.56, 0.56, 0.89, 0.67, 0.19, 0.33, 0.33, 0.39, 0.58, 0.28, 0.33, 0.28, 0.28,
        // 0     1     2     3     4     5     6     7     8     9
        0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56,
        // :     ;     <     =     >     ?     @
        0.28, 0.28, 0.58, 0.58, 0.58, 0.56, 1.02,
        // A     B     C     D     E     F     G     H     I     J     K     L     M
        0.67, 0.67, 0.72, 0.72, 0.67, 0.61, 0.78, 0.72, 0.28, 0.50, 0.67, 0.56, 0.83,
        // N     O     P     Q     R     S     T     U     V     W     X     Y     Z
        0.72, 0.78, 0.67, 0.78, 0.72, 0.67, 0.61, 0.72, 0.67, 0.94, 0.67, 0.67, 0.61,
        // [     \     ]     ^     _     `
        0.28, 0.28, 0.28, 0.47, 0.56, 0.33,
        // a     b     c     d     e     f     g     h     i     j     k     l     m
        0.56, 0.56, 0.50, 0.56, 0.56, 0.28, 0.56, 0.56, 0.22, 0.22, 0.50, 0.22, 0.83,
        // n     o     p     q     r     s     t     u     v     w     x     y     z
        0.56, 0.56, 0.56, 0.56, 0.33, 0.50, 0.28, 0.56, 0.50, 0.72, 0.50, 0.50, 0.50,
        // {     |     }     ~
        0.33, 0.26, 0.33, 0.58,
    ],
    average_char_width: 0.52,
    space_width: 0.28,
};

/// Times-Roman — old-style serif, noticeably narrower than Helvetica.
static SERIF_TABLE: FontMetricTable = FontMetricTable {
    class: FontClass::Serif,
    #[rustfmt::skip]
    widths: [
        // sp    !     "     #     $     %     &     '     (     )     *     +     ,     -     .     /
        0.25, 0.33, 0.41, 0.50, 0.50, 0.83, 0.78, 0.18, 0.33, 0.33, 0.50, 0.56, 0.25, 0.33, 0.25, 0.28,
        // 0     1     2     3     4     5     6     7     8     9
        0.50, 0.50, 0.50, 0.50, 0.50, 0.50, 0.50, 0.50, 0.50, 0.50,
        // :     ;     <     =     >     ?     @
        0.28, 0.28, 0.56, 0.56, 0.56, 0.44, 0.92,
        // A     B     C     D     E     F     G     H     I     J     K     L     M
        0.72, 0.67, 0.67, 0.72, 0.61, 0.56, 0.72, 0.72, 0.33, 0.39, 0.72, 0.61, 0.89,
        // N     O     P     Q     R     S     T     U     V     W     X     Y     Z
        0.72, 0.72, 0.56, 0.72, 0.67, 0.56, 0.61, 0.72, 0.72, 0.94, 0.72, 0.72, 0.61,
        // [     \     ]     ^     _     `
        0.33, 0.28, 0.33, 0.47, 0.50, 0.33,
        // a     b     c     d     e     f     g     h     i     j     k     l     m
        0.44, 0.50, 0.44, 0.50, 0.44, 0.33, 0.50, 0.50, 0.28, 0.28, 0.50, 0.28, 0.78,
        // n     o     p     q     r     s     t     u     v     w     x     y     z
        0.50, 0.50, 0.50, 0.50, 0.33, 0.39, 0.28, 0.50, 0.50, 0.72, 0.50, 0.50, 0.44,
        // {     |     }     ~
        0.48, 0.20, 0.48, 0.54,
    ],
    average_char_width: 0.47,
    space_width: 0.25,
};

/// Courier — fixed pitch, every glyph 0.6 em.
static MONO_TABLE: FontMetricTable = FontMetricTable {
    class: FontClass::Mono,
    widths: [0.60; 95],
    average_char_width: 0.60,
    space_width: 0.60,
};

/// Symbol — varied widths in reality; a flat estimate is sufficient because
/// symbol-class runs are never wrapped into prose.
static SYMBOL_TABLE: FontMetricTable = FontMetricTable {
    class: FontClass::Symbol,
    widths: [0.55; 95],
    average_char_width: 0.55,
    space_width: 0.25,
};

/// Returns the static metric table for a canonical class.
pub fn metrics_for(class: FontClass) -> &'static FontMetricTable {
    match class {
        FontClass::Sans => &SANS_TABLE,
        FontClass::Serif => &SERIF_TABLE,
        FontClass::Mono => &MONO_TABLE,
        FontClass::Symbol => &SYMBOL_TABLE,
    }
}

/// Convenience: metric table for a raw extracted font name.
pub fn metrics_for_name(font_name: &str) -> &'static FontMetricTable {
    metrics_for(canonical_class(font_name))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_class_serif_names() {
        assert_eq!(canonical_class("Times-Roman"), FontClass::Serif);
        assert_eq!(canonical_class("TimesNewRomanPSMT"), FontClass::Serif);
        assert_eq!(canonical_class("EB Garamond"), FontClass::Serif);
    }

    #[test]
    fn test_canonical_class_sans_names() {
        assert_eq!(canonical_class("Helvetica-Bold"), FontClass::Sans);
        assert_eq!(canonical_class("ArialMT"), FontClass::Sans);
    }

    #[test]
    fn test_canonical_class_mono_and_symbol() {
        assert_eq!(canonical_class("Courier New"), FontClass::Mono);
        assert_eq!(canonical_class("DejaVuSansMono"), FontClass::Mono);
        assert_eq!(canonical_class("ZapfDingbats"), FontClass::Symbol);
    }

    #[test]
    fn test_canonical_class_defaults_to_sans() {
        assert_eq!(canonical_class("Calibri"), FontClass::Sans);
        assert_eq!(canonical_class(""), FontClass::Sans);
    }

    #[test]
    fn test_measure_em_empty_returns_zero() {
        assert_eq!(metrics_for(FontClass::Sans).measure_em(""), 0.0);
    }

    #[test]
    fn test_measure_points_scales_with_size() {
        let metrics = metrics_for(FontClass::Sans);
        let at_10 = metrics.measure("Rust", 10.0);
        let at_20 = metrics.measure("Rust", 20.0);
        assert!(
            (at_20 - 2.0 * at_10).abs() < 1e-3,
            "width should scale linearly with font size"
        );
    }

    #[test]
    fn test_mono_width_is_char_count() {
        let metrics = metrics_for(FontClass::Mono);
        let width = metrics.measure_em("abcde");
        assert!((width - 3.0).abs() < 1e-4, "5 chars at 0.6 em = 3.0 em");
    }

    #[test]
    fn test_non_ascii_falls_back_to_average() {
        let metrics = metrics_for(FontClass::Sans);
        let width = metrics.measure_em("é");
        assert!((width - metrics.average_char_width).abs() < 1e-4);
    }

    #[test]
    fn test_serif_narrower_than_sans_for_lowercase_prose() {
        let text = "architected a distributed caching layer";
        let sans = metrics_for(FontClass::Sans).measure_em(text);
        let serif = metrics_for(FontClass::Serif).measure_em(text);
        assert!(serif < sans, "Times prose should measure narrower than Helvetica");
    }

    #[test]
    fn test_resource_tags_are_distinct() {
        let tags = [
            FontClass::Sans.resource_tag(),
            FontClass::Serif.resource_tag(),
            FontClass::Mono.resource_tag(),
            FontClass::Symbol.resource_tag(),
        ];
        for (i, a) in tags.iter().enumerate() {
            for b in tags.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }
}
