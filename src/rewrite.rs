//! Document rewriting — masks original spans and repaints replacement text.
//!
//! Each page is the unit of mutation: all of a page's planned replacements
//! are rendered into one appended content stream, ordered bottom-to-top then
//! left-to-right so a later paint never obscures an earlier one on the same
//! line. Per replacement the original glyphs are covered with an opaque
//! rectangle, then the new text is drawn with a visually similar standard
//! base font.
//!
//! Painting a single replacement can fail (text the target encoding cannot
//! represent); that degrades to a truncated minimal insertion and is reported,
//! never raised. Only failure to save the rewritten document is fatal.

use std::collections::{BTreeMap, BTreeSet};
use std::io::Write as _;

use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::errors::EngineError;
use crate::extract::{page_height, BBox};
use crate::fonts::{canonical_class, metrics_for, FontClass, FontMetricTable};
use crate::plan::{PlannedReplacement, ReplacementPlan};

// ────────────────────────────────────────────────────────────────────────────
// Report types
// ────────────────────────────────────────────────────────────────────────────

/// One replacement that could not be painted normally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaintFallback {
    /// Original block text, for diagnostics.
    pub block_text: String,
    pub reason: String,
}

/// Outcome of one rewrite pass. Soft failures are data, not errors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RewriteReport {
    pub painted: usize,
    pub fallbacks: Vec<PaintFallback>,
}

// ────────────────────────────────────────────────────────────────────────────
// Entry point
// ────────────────────────────────────────────────────────────────────────────

/// Applies the replacement plan to the document and returns the rewritten
/// bytes. The source is never modified; the page count is preserved.
pub fn rewrite_document(
    source: &[u8],
    plan: &ReplacementPlan,
    config: &EngineConfig,
) -> Result<(Vec<u8>, RewriteReport), EngineError> {
    let mut doc = Document::load_mem(source)
        .map_err(|e| EngineError::Rewrite(format!("failed to reload document: {e}")))?;

    let page_ids: Vec<ObjectId> = doc.get_pages().values().copied().collect();

    // Group replacements by page, dropping plans for pages that don't exist.
    let mut by_page: BTreeMap<usize, Vec<&PlannedReplacement>> = BTreeMap::new();
    for (_, replacement) in plan.iter() {
        let page = replacement.block.page;
        if page >= page_ids.len() {
            warn!(
                "replacement targets page {page} but document has {} pages, skipping",
                page_ids.len()
            );
            continue;
        }
        by_page.entry(page).or_default().push(replacement);
    }

    let mut report = RewriteReport::default();

    for (page, mut replacements) in by_page {
        let page_id = page_ids[page];
        let height = page_height(&doc, page_id);

        // Bottom-to-top, then left-to-right.
        replacements.sort_by(|a, b| {
            b.block
                .bbox
                .y1
                .partial_cmp(&a.block.bbox.y1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(
                    a.block
                        .bbox
                        .x0
                        .partial_cmp(&b.block.bbox.x0)
                        .unwrap_or(std::cmp::Ordering::Equal),
                )
        });

        let mut classes: BTreeSet<FontClass> = replacements
            .iter()
            .map(|r| canonical_class(&r.block.font_name))
            .collect();
        // The fallback path always paints with the sans base font.
        classes.insert(FontClass::Sans);
        ensure_fonts(&mut doc, page_id, &classes)?;

        let mut content: Vec<u8> = Vec::new();
        content.extend_from_slice(b"q\n");

        for replacement in replacements {
            paint_replacement(&mut content, replacement, height, config, &mut report);
        }

        content.extend_from_slice(b"Q\n");
        append_content(&mut doc, page_id, content)?;
    }

    let mut output = Vec::new();
    doc.save_to(&mut output)
        .map_err(|e| EngineError::Persistence(format!("failed to save rewritten document: {e}")))?;

    info!(
        "Rewrote document: {} replacements painted, {} fallbacks",
        report.painted,
        report.fallbacks.len()
    );

    Ok((output, report))
}

// ────────────────────────────────────────────────────────────────────────────
// Per-replacement painting
// ────────────────────────────────────────────────────────────────────────────

fn paint_replacement(
    content: &mut Vec<u8>,
    replacement: &PlannedReplacement,
    page_height: f32,
    config: &EngineConfig,
    report: &mut RewriteReport,
) {
    let bbox = replacement.block.bbox;
    let text: String = replacement
        .new_text
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if text.is_empty() || !bbox.is_well_formed() {
        return;
    }

    mask_ops(content, &bbox, page_height, config);

    let class = canonical_class(&replacement.block.font_name);
    let metrics = metrics_for(class);
    let size = clamp_font_size(replacement.block.font_size, config);
    let color = replacement.block.color.to_rgb();

    match text_ops(&text, &bbox, page_height, class, metrics, size, color, config) {
        Ok(ops) => {
            content.extend_from_slice(&ops);
            report.painted += 1;
        }
        Err(reason) => {
            warn!(
                "painting failed for block {:?}: {reason}, inserting fallback",
                replacement.block.text
            );
            fallback_ops(content, &text, &bbox, page_height);
            report.fallbacks.push(PaintFallback {
                block_text: replacement.block.text.clone(),
                reason,
            });
        }
    }
}

/// Opaque cover over the original glyphs, expanded by the mask padding.
fn mask_ops(content: &mut Vec<u8>, bbox: &BBox, page_height: f32, config: &EngineConfig) {
    let pad = config.mask_padding;
    let [r, g, b] = config.mask_color;
    let x = bbox.x0 - pad;
    let y = page_height - bbox.y1 - pad;
    let w = bbox.width() + 2.0 * pad;
    let h = bbox.height() + 2.0 * pad;
    let _ = writeln!(content, "{r:.3} {g:.3} {b:.3} rg");
    let _ = writeln!(content, "{x:.2} {y:.2} {w:.2} {h:.2} re f");
}

/// Builds the text-painting operations for one replacement, or the reason
/// they cannot be built. Nothing is emitted to the page on failure.
#[allow(clippy::too_many_arguments)]
fn text_ops(
    text: &str,
    bbox: &BBox,
    page_height: f32,
    class: FontClass,
    metrics: &FontMetricTable,
    size: f32,
    color: [f32; 3],
    config: &EngineConfig,
) -> Result<Vec<u8>, String> {
    let mut ops: Vec<u8> = Vec::new();
    let [r, g, b] = color;
    let _ = writeln!(ops, "{r:.3} {g:.3} {b:.3} rg");

    match decide_placement(text, bbox.width(), metrics, size, config) {
        Placement::SingleLine { size } => {
            let shift = config.baseline_shift_factor * size;
            let y = page_height - bbox.y1 + shift;
            show_line(&mut ops, class, size, bbox.x0, y, text)?;
        }
        Placement::Scaled { size } => {
            let shift = config.baseline_shift_factor * size;
            let y = page_height - bbox.y1 + shift;
            show_line(&mut ops, class, size, bbox.x0, y, text)?;
        }
        Placement::Wrapped { lines, size } => {
            let shift = config.baseline_shift_factor * size;
            let line_height = config.line_height_factor * size;
            let capacity = (bbox.height() / line_height).floor().max(1.0) as usize;
            let max_lines = lines.len().min(capacity);

            let mut emitted = 0;
            for (i, line) in lines.iter().take(max_lines).enumerate() {
                let y_top = bbox.y0 + (i as f32 + 1.0) * line_height - shift;
                if y_top > bbox.y1 {
                    break;
                }
                show_line(&mut ops, class, size, bbox.x0, page_height - y_top, line)?;
                emitted += 1;
            }
            if emitted < lines.len() {
                // Box height exhausted; surplus lines are dropped.
                debug!("dropped {} wrapped lines beyond box height", lines.len() - emitted);
            }
        }
    }

    Ok(ops)
}

fn show_line(
    ops: &mut Vec<u8>,
    class: FontClass,
    size: f32,
    x: f32,
    y: f32,
    text: &str,
) -> Result<(), String> {
    let encoded = encode_winansi(text)?;
    ops.extend_from_slice(b"BT\n");
    let _ = writeln!(ops, "/{} {size:.2} Tf", class.resource_tag());
    let _ = writeln!(ops, "{x:.2} {y:.2} Td");
    ops.push(b'(');
    ops.extend_from_slice(&encoded);
    ops.extend_from_slice(b") Tj\n");
    ops.extend_from_slice(b"ET\n");
    Ok(())
}

/// Minimal insertion used when normal painting fails: ASCII-sanitized,
/// truncated text at a small fixed size near the box origin.
fn fallback_ops(content: &mut Vec<u8>, text: &str, bbox: &BBox, page_height: f32) {
    const FALLBACK_SIZE: f32 = 9.0;
    const MAX_CHARS: usize = 50;

    let mut sanitized: String = text
        .chars()
        .take(MAX_CHARS)
        .map(|c| if (' '..='~').contains(&c) { c } else { '?' })
        .collect();
    if text.chars().count() > MAX_CHARS {
        sanitized.push_str("...");
    }

    let y = page_height - bbox.y1 + 10.0;
    let _ = writeln!(content, "0.000 0.000 0.000 rg");
    // Sanitized to printable ASCII above, so encoding cannot fail here.
    if show_line(
        content,
        FontClass::Sans,
        FALLBACK_SIZE,
        bbox.x0,
        y,
        &sanitized,
    )
    .is_err()
    {
        warn!("fallback insertion failed, replacement left masked only");
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Placement decision
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
enum Placement {
    /// Fits (within tolerance) at the original size on the original baseline.
    SingleLine { size: f32 },
    /// Long text wrapped into box-width lines.
    Wrapped { lines: Vec<String>, size: f32 },
    /// Short text drawn as one line at a reduced size.
    Scaled { size: f32 },
}

fn decide_placement(
    text: &str,
    box_width: f32,
    metrics: &FontMetricTable,
    size: f32,
    config: &EngineConfig,
) -> Placement {
    let width = metrics.measure(text, size);

    if width <= box_width * config.width_tolerance {
        Placement::SingleLine { size }
    } else if text.chars().count() > config.wrap_min_chars {
        Placement::Wrapped {
            lines: greedy_wrap(text, box_width, metrics, size),
            size,
        }
    } else {
        let adjusted = (size * (box_width / width) * config.scale_safety)
            .min(size)
            .max(config.scale_floor);
        Placement::Scaled { size: adjusted }
    }
}

/// Greedy word wrap. A single word wider than the box is placed alone on its
/// own line rather than broken.
fn greedy_wrap(text: &str, max_width: f32, metrics: &FontMetricTable, size: f32) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for word in text.split_whitespace() {
        let mut candidate = current.clone();
        candidate.push(word);
        let test = candidate.join(" ");

        if metrics.measure(&test, size) <= max_width {
            current = candidate;
        } else if current.is_empty() {
            lines.push(word.to_string());
        } else {
            lines.push(current.join(" "));
            current = vec![word];
        }
    }
    if !current.is_empty() {
        lines.push(current.join(" "));
    }

    lines
}

fn clamp_font_size(size: f32, config: &EngineConfig) -> f32 {
    if size < config.font_size_min || size > config.font_size_max {
        config.font_size_default
    } else {
        size
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Text encoding
// ────────────────────────────────────────────────────────────────────────────

/// Encodes text as a WinAnsi literal string body, escaping the PDF string
/// delimiters. Characters outside WinAnsi are a hard error — the caller
/// degrades to the fallback insertion.
fn encode_winansi(text: &str) -> Result<Vec<u8>, String> {
    let mut out = Vec::with_capacity(text.len());

    for c in text.chars() {
        let byte = match c {
            ' '..='~' => c as u8,
            '\u{00A0}'..='\u{00FF}' => c as u32 as u8,
            '\u{2018}' => 0x91, // left single quote
            '\u{2019}' => 0x92, // right single quote
            '\u{201C}' => 0x93, // left double quote
            '\u{201D}' => 0x94, // right double quote
            '\u{2013}' => 0x96, // en dash
            '\u{2014}' => 0x97, // em dash
            '\u{2022}' => 0x95, // bullet
            '\u{2026}' => 0x85, // ellipsis
            '\u{20AC}' => 0x80, // euro sign
            other => return Err(format!("character {other:?} is not WinAnsi-encodable")),
        };
        match byte {
            b'(' | b')' | b'\\' => {
                out.push(b'\\');
                out.push(byte);
            }
            _ => out.push(byte),
        }
    }

    Ok(out)
}

// ────────────────────────────────────────────────────────────────────────────
// Document plumbing
// ────────────────────────────────────────────────────────────────────────────

/// Registers the standard base fonts for `classes` in the page's resources.
fn ensure_fonts(
    doc: &mut Document,
    page_id: ObjectId,
    classes: &BTreeSet<FontClass>,
) -> Result<(), EngineError> {
    let mut tag_ids: Vec<(&'static str, ObjectId)> = Vec::new();
    for class in classes {
        let mut font = Dictionary::new();
        font.set("Type", Object::Name(b"Font".to_vec()));
        font.set("Subtype", Object::Name(b"Type1".to_vec()));
        font.set("BaseFont", Object::Name(class.base_font().as_bytes().to_vec()));
        font.set("Encoding", Object::Name(b"WinAnsiEncoding".to_vec()));
        let id = doc.add_object(font);
        tag_ids.push((class.resource_tag(), id));
    }

    let mut resources = resolve_dict(doc, page_id, b"Resources");
    let mut fonts_dict = match resources.get(b"Font") {
        Ok(Object::Dictionary(d)) => d.clone(),
        Ok(Object::Reference(id)) => match doc.get_object(*id) {
            Ok(Object::Dictionary(d)) => d.clone(),
            _ => Dictionary::new(),
        },
        _ => Dictionary::new(),
    };

    for (tag, id) in tag_ids {
        fonts_dict.set(tag, Object::Reference(id));
    }
    resources.set("Font", Object::Dictionary(fonts_dict));

    let page = doc
        .get_object_mut(page_id)
        .map_err(|e| EngineError::Rewrite(format!("failed to access page: {e}")))?;
    if let Object::Dictionary(dict) = page {
        dict.set("Resources", Object::Dictionary(resources));
    }

    Ok(())
}

/// Resolves a page dictionary entry to an owned dictionary, following one
/// level of indirection. Missing or malformed entries resolve to empty.
fn resolve_dict(doc: &Document, page_id: ObjectId, key: &[u8]) -> Dictionary {
    let Ok(Object::Dictionary(page)) = doc.get_object(page_id) else {
        return Dictionary::new();
    };
    match page.get(key) {
        Ok(Object::Dictionary(d)) => d.clone(),
        Ok(Object::Reference(id)) => match doc.get_object(*id) {
            Ok(Object::Dictionary(d)) => d.clone(),
            _ => Dictionary::new(),
        },
        _ => Dictionary::new(),
    }
}

/// Appends a content stream to the page, preserving existing content.
fn append_content(doc: &mut Document, page_id: ObjectId, content: Vec<u8>) -> Result<(), EngineError> {
    let stream = Stream::new(Dictionary::new(), content);
    let content_id = doc.add_object(Object::Stream(stream));

    let page = doc
        .get_object_mut(page_id)
        .map_err(|e| EngineError::Rewrite(format!("failed to access page: {e}")))?;

    if let Object::Dictionary(dict) = page {
        let existing = dict.get(b"Contents").ok().cloned();
        match existing {
            Some(Object::Reference(existing_id)) => {
                dict.set(
                    "Contents",
                    Object::Array(vec![
                        Object::Reference(existing_id),
                        Object::Reference(content_id),
                    ]),
                );
            }
            Some(Object::Array(mut arr)) => {
                arr.push(Object::Reference(content_id));
                dict.set("Contents", Object::Array(arr));
            }
            _ => {
                dict.set("Contents", Object::Reference(content_id));
            }
        }
    }

    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{extract, BlockKey, TextBlock};
    use crate::test_support::single_page_pdf;

    fn plan_for(
        source: &[u8],
        replacements: &[(&str, &str)],
        config: &EngineConfig,
    ) -> ReplacementPlan {
        let doc = Document::load_mem(source).unwrap();
        let extraction = extract(&doc, config).unwrap();

        let mut plan = ReplacementPlan::new();
        for (original, new_text) in replacements {
            let (key, block): (&BlockKey, &TextBlock) = extraction
                .span_blocks
                .iter()
                .find(|(_, b)| b.text == *original)
                .unwrap_or_else(|| panic!("no block for {original}"));
            plan.insert(key.clone(), new_text.to_string(), block.clone());
        }
        plan
    }

    #[test]
    fn test_rewrite_preserves_page_count_and_parses() {
        let config = EngineConfig::default();
        let source = single_page_pdf(&[("Python", 72.0, 700.0, 11.0)]);
        let plan = plan_for(&source, &[("Python", "Rust")], &config);

        let (output, report) = rewrite_document(&source, &plan, &config).unwrap();
        assert_eq!(report.painted, 1);
        assert!(report.fallbacks.is_empty());

        let rewritten = Document::load_mem(&output).unwrap();
        assert_eq!(rewritten.get_pages().len(), 1);
    }

    #[test]
    fn test_rewritten_text_is_extractable() {
        let config = EngineConfig::default();
        let source = single_page_pdf(&[("Python", 72.0, 700.0, 11.0)]);
        let plan = plan_for(&source, &[("Python", "Rust")], &config);

        let (output, _) = rewrite_document(&source, &plan, &config).unwrap();
        let rewritten = Document::load_mem(&output).unwrap();
        let extraction = extract(&rewritten, &config).unwrap();

        assert!(
            extraction.line_runs.iter().any(|r| r.text.contains("Rust")),
            "painted replacement text must be extractable from the output"
        );
    }

    #[test]
    fn test_mask_rectangle_is_emitted() {
        let config = EngineConfig::default();
        let source = single_page_pdf(&[("Python", 72.0, 700.0, 11.0)]);
        let plan = plan_for(&source, &[("Python", "Rust")], &config);

        let (output, _) = rewrite_document(&source, &plan, &config).unwrap();
        let rewritten = Document::load_mem(&output).unwrap();
        let page_id = *rewritten.get_pages().values().next().unwrap();
        let content = rewritten.get_page_content(page_id).unwrap();
        let content_str = String::from_utf8_lossy(&content);

        assert!(content_str.contains("re f"), "cover rectangle op missing");
        assert!(content_str.contains("1.000 1.000 1.000 rg"), "mask color missing");
    }

    #[test]
    fn test_same_line_paints_bottom_to_top_left_to_right() {
        let config = EngineConfig::default();
        let source = single_page_pdf(&[
            ("Upper", 72.0, 700.0, 11.0),
            ("Lower", 72.0, 650.0, 11.0),
        ]);
        let plan = plan_for(
            &source,
            &[("Upper", "UpperNew"), ("Lower", "LowerNew")],
            &config,
        );

        let (output, _) = rewrite_document(&source, &plan, &config).unwrap();
        let rewritten = Document::load_mem(&output).unwrap();
        let page_id = *rewritten.get_pages().values().next().unwrap();
        let content = rewritten.get_page_content(page_id).unwrap();
        let content_str = String::from_utf8_lossy(&content);

        let lower_at = content_str.find("(LowerNew)").expect("LowerNew painted");
        let upper_at = content_str.find("(UpperNew)").expect("UpperNew painted");
        assert!(
            lower_at < upper_at,
            "the lower replacement must be painted first"
        );
    }

    #[test]
    fn test_long_text_wraps_into_multiple_lines() {
        let config = EngineConfig::default();
        let source = single_page_pdf(&[("Short line", 72.0, 700.0, 11.0)]);
        let long_text = "This replacement is considerably longer than fifty characters \
                         and must therefore be wrapped into several lines";
        let plan = plan_for(&source, &[("Short line", long_text)], &config);

        let (output, report) = rewrite_document(&source, &plan, &config).unwrap();
        assert_eq!(report.painted, 1);

        let rewritten = Document::load_mem(&output).unwrap();
        let page_id = *rewritten.get_pages().values().next().unwrap();
        let content = rewritten.get_page_content(page_id).unwrap();
        let content_str = String::from_utf8_lossy(&content);
        let tj_count = content_str.matches(" Tj").count();
        // Original Tj plus at least one painted line.
        assert!(tj_count >= 2, "expected painted text ops, got {tj_count}");
    }

    #[test]
    fn test_unencodable_text_degrades_to_fallback() {
        let config = EngineConfig::default();
        let source = single_page_pdf(&[("Python", 72.0, 700.0, 11.0)]);
        let plan = plan_for(&source, &[("Python", "日本語")], &config);

        let (output, report) = rewrite_document(&source, &plan, &config).unwrap();
        assert_eq!(report.painted, 0);
        assert_eq!(report.fallbacks.len(), 1);
        assert!(Document::load_mem(&output).is_ok());
    }

    #[test]
    fn test_replacement_on_missing_page_is_skipped() {
        let config = EngineConfig::default();
        let source = single_page_pdf(&[("Python", 72.0, 700.0, 11.0)]);
        let mut plan = plan_for(&source, &[("Python", "Rust")], &config);

        // Forge an entry pointing past the last page.
        let doc = Document::load_mem(&source).unwrap();
        let extraction = extract(&doc, &config).unwrap();
        let (_, block) = extraction.span_blocks.iter().next().unwrap();
        let mut ghost = block.clone();
        ghost.page = 7;
        plan.insert(
            BlockKey::new("ghost", 7, 0.0, 0.0),
            "ghost text".to_string(),
            ghost,
        );

        let (_, report) = rewrite_document(&source, &plan, &config).unwrap();
        assert_eq!(report.painted, 1, "only the real page's replacement paints");
    }

    #[test]
    fn test_empty_plan_round_trips_document() {
        let config = EngineConfig::default();
        let source = single_page_pdf(&[("Python", 72.0, 700.0, 11.0)]);
        let plan = ReplacementPlan::new();

        let (output, report) = rewrite_document(&source, &plan, &config).unwrap();
        assert_eq!(report.painted, 0);
        let rewritten = Document::load_mem(&output).unwrap();
        assert_eq!(rewritten.get_pages().len(), 1);
    }

    #[test]
    fn test_decide_placement_prefers_single_line() {
        let config = EngineConfig::default();
        let metrics = metrics_for(FontClass::Sans);
        let placement = decide_placement("Rust", 200.0, metrics, 11.0, &config);
        assert_eq!(placement, Placement::SingleLine { size: 11.0 });
    }

    #[test]
    fn test_decide_placement_scales_short_overflow() {
        let config = EngineConfig::default();
        let metrics = metrics_for(FontClass::Sans);
        // Short (< 50 chars) but wider than the box at 11pt.
        let placement = decide_placement("Distributed Systems", 40.0, metrics, 11.0, &config);
        match placement {
            Placement::Scaled { size } => {
                assert!(size < 11.0);
                assert!(size >= config.scale_floor);
            }
            other => panic!("expected Scaled, got {other:?}"),
        }
    }

    #[test]
    fn test_greedy_wrap_preserves_all_words() {
        let metrics = metrics_for(FontClass::Sans);
        let text = "one two three four five six seven eight nine ten";
        let lines = greedy_wrap(text, 60.0, metrics, 11.0);
        assert!(lines.len() >= 2);
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn test_greedy_wrap_overlong_word_gets_own_line() {
        let metrics = metrics_for(FontClass::Sans);
        let lines = greedy_wrap("tiny Supercalifragilisticexpialidocious end", 50.0, metrics, 11.0);
        assert!(lines
            .iter()
            .any(|l| l == "Supercalifragilisticexpialidocious"));
    }

    #[test]
    fn test_clamp_font_size_out_of_range_uses_default() {
        let config = EngineConfig::default();
        assert_eq!(clamp_font_size(4.0, &config), 11.0);
        assert_eq!(clamp_font_size(30.0, &config), 11.0);
        assert_eq!(clamp_font_size(10.0, &config), 10.0);
    }

    #[test]
    fn test_encode_winansi_escapes_delimiters() {
        let encoded = encode_winansi("a(b)c\\d").unwrap();
        assert_eq!(encoded, b"a\\(b\\)c\\\\d".to_vec());
    }

    #[test]
    fn test_encode_winansi_maps_typographic_chars() {
        let encoded = encode_winansi("café – “quoted”").unwrap();
        assert!(encoded.contains(&0xE9)); // é
        assert!(encoded.contains(&0x96)); // en dash
        assert!(encoded.contains(&0x93)); // left double quote
    }

    #[test]
    fn test_encode_winansi_rejects_cjk() {
        assert!(encode_winansi("日本語").is_err());
    }
}
