//! Shared content-stream interpretation pass.
//!
//! Walks each page's content stream tracking the text state (font, size, text
//! and line matrices, leading) and the fill color, and emits one positioned
//! span event per show operation. Both extraction providers consume these
//! events, so line and span views always agree on what the page contains.
//!
//! Approximations, consistent with the rest of the heuristic pipeline:
//! glyph advances come from the static metric tables rather than embedded
//! font programs, the CTM is assumed to be page-aligned, and character/word
//! spacing adjustments are ignored.

use lopdf::content::Content;
use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::errors::EngineError;
use crate::fonts::metrics_for_name;

/// One show operation with resolved position, style, and color.
#[derive(Debug, Clone)]
pub(crate) struct SpanEvent {
    pub text: String,
    /// Left edge, PDF device coordinates (bottom-left origin).
    pub x: f32,
    /// Baseline y, PDF device coordinates.
    pub baseline: f32,
    /// Estimated advance width in points.
    pub width: f32,
    pub font_name: String,
    pub font_size: f32,
    pub color: [f32; 3],
    /// Zero-based page index.
    pub page: usize,
    pub page_height: f32,
}

/// Interprets every page of the document into span events.
pub(crate) fn interpret_document(doc: &Document) -> Result<Vec<SpanEvent>, EngineError> {
    let mut events = Vec::new();

    for (index, (_, page_id)) in doc.get_pages().into_iter().enumerate() {
        let page_height = page_height(doc, page_id);
        interpret_page(doc, page_id, index, page_height, &mut events)?;
    }

    Ok(events)
}

// ────────────────────────────────────────────────────────────────────────────
// Per-page interpreter
// ────────────────────────────────────────────────────────────────────────────

struct TextState {
    /// Text matrix [a b c d e f]; e/f are the device-space pen position.
    tm: [f32; 6],
    /// Line matrix — start of the current text line.
    lm: [f32; 6],
    leading: f32,
    font_resource: Vec<u8>,
    font_size: f32,
    in_text: bool,
}

const IDENTITY: [f32; 6] = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

impl TextState {
    fn new() -> Self {
        TextState {
            tm: IDENTITY,
            lm: IDENTITY,
            leading: 0.0,
            font_resource: Vec::new(),
            font_size: 12.0,
            in_text: false,
        }
    }

    /// Vertical advance used by T* when no leading was set.
    fn effective_leading(&self) -> f32 {
        if self.leading != 0.0 {
            self.leading
        } else {
            self.font_size * 1.2
        }
    }

    fn next_line(&mut self) {
        self.lm[5] -= self.effective_leading();
        self.tm = self.lm;
    }
}

fn interpret_page(
    doc: &Document,
    page_id: ObjectId,
    page_index: usize,
    page_height: f32,
    events: &mut Vec<SpanEvent>,
) -> Result<(), EngineError> {
    let fonts = doc.get_page_fonts(page_id).unwrap_or_default();

    let content_data = doc
        .get_page_content(page_id)
        .map_err(|e| EngineError::Extraction(format!("unreadable page content: {e}")))?;
    let content = Content::decode(&content_data)
        .map_err(|e| EngineError::Extraction(format!("undecodable content stream: {e}")))?;

    let mut state = TextState::new();
    let mut fill_color = [0.0_f32, 0.0, 0.0];

    for op in &content.operations {
        match op.operator.as_str() {
            "BT" => {
                state.in_text = true;
                state.tm = IDENTITY;
                state.lm = IDENTITY;
            }
            "ET" => state.in_text = false,
            "Tf" => {
                if op.operands.len() >= 2 {
                    if let Ok(name) = op.operands[0].as_name() {
                        state.font_resource = name.to_vec();
                    }
                    if let Some(size) = as_number(&op.operands[1]) {
                        state.font_size = size;
                    }
                }
            }
            "TL" => {
                if let Some(l) = op.operands.first().and_then(as_number) {
                    state.leading = l;
                }
            }
            "Td" | "TD" => {
                if op.operands.len() >= 2 {
                    let tx = as_number(&op.operands[0]).unwrap_or(0.0);
                    let ty = as_number(&op.operands[1]).unwrap_or(0.0);
                    if op.operator == "TD" {
                        state.leading = -ty;
                    }
                    state.lm[4] += tx;
                    state.lm[5] += ty;
                    state.tm = state.lm;
                }
            }
            "Tm" => {
                if op.operands.len() >= 6 {
                    for (i, operand) in op.operands.iter().take(6).enumerate() {
                        state.tm[i] = as_number(operand)
                            .unwrap_or(if i == 0 || i == 3 { 1.0 } else { 0.0 });
                    }
                    state.lm = state.tm;
                }
            }
            "T*" => state.next_line(),
            "Tj" => {
                if state.in_text {
                    if let Some(operand) = op.operands.first() {
                        show_string(
                            operand, doc, &fonts, &mut state, fill_color, page_index,
                            page_height, events,
                        );
                    }
                }
            }
            "TJ" => {
                if state.in_text {
                    if let Some(Ok(array)) = op.operands.first().map(|o| o.as_array()) {
                        for item in array {
                            if let Some(adjust) = as_number(item) {
                                // Kerning adjustment in 1/1000 text-space units.
                                let advance = adjust / 1000.0 * state.font_size * h_scale(&state.tm);
                                state.tm[4] -= advance;
                            } else {
                                show_string(
                                    item, doc, &fonts, &mut state, fill_color, page_index,
                                    page_height, events,
                                );
                            }
                        }
                    }
                }
            }
            "'" => {
                state.next_line();
                if let Some(operand) = op.operands.first() {
                    show_string(
                        operand, doc, &fonts, &mut state, fill_color, page_index, page_height,
                        events,
                    );
                }
            }
            "\"" => {
                // Word/char spacing operands are ignored; the string is shown
                // on the next line like the ' operator.
                state.next_line();
                if let Some(operand) = op.operands.get(2) {
                    show_string(
                        operand, doc, &fonts, &mut state, fill_color, page_index, page_height,
                        events,
                    );
                }
            }
            "rg" | "sc" | "scn" if numeric_operands(&op.operands) == 3 => {
                fill_color = [
                    as_number(&op.operands[0]).unwrap_or(0.0),
                    as_number(&op.operands[1]).unwrap_or(0.0),
                    as_number(&op.operands[2]).unwrap_or(0.0),
                ];
            }
            "g" | "sc" | "scn" if numeric_operands(&op.operands) == 1 => {
                let v = as_number(&op.operands[0]).unwrap_or(0.0);
                fill_color = [v, v, v];
            }
            "k" if numeric_operands(&op.operands) == 4 => {
                let c = as_number(&op.operands[0]).unwrap_or(0.0);
                let m = as_number(&op.operands[1]).unwrap_or(0.0);
                let y = as_number(&op.operands[2]).unwrap_or(0.0);
                let k = as_number(&op.operands[3]).unwrap_or(0.0);
                fill_color = [
                    (1.0 - c) * (1.0 - k),
                    (1.0 - m) * (1.0 - k),
                    (1.0 - y) * (1.0 - k),
                ];
            }
            _ => {}
        }
    }

    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Show-operation handling
// ────────────────────────────────────────────────────────────────────────────

#[allow(clippy::too_many_arguments)]
fn show_string(
    operand: &Object,
    doc: &Document,
    fonts: &std::collections::BTreeMap<Vec<u8>, &Dictionary>,
    state: &mut TextState,
    fill_color: [f32; 3],
    page_index: usize,
    page_height: f32,
    events: &mut Vec<SpanEvent>,
) {
    let Some(text) = decode_string(operand, doc, fonts, &state.font_resource) else {
        return;
    };

    let font_name = resolved_base_font(fonts, &state.font_resource);
    let effective_size = state.font_size * v_scale(&state.tm);
    let width = metrics_for_name(&font_name).measure(&text, state.font_size) * h_scale(&state.tm);

    if !text.trim().is_empty() {
        events.push(SpanEvent {
            text,
            x: state.tm[4],
            baseline: state.tm[5],
            width,
            font_name,
            font_size: effective_size,
            color: fill_color,
            page: page_index,
            page_height,
        });
    }

    state.tm[4] += width;
}

/// Decodes a PDF string through the current font's encoding, with UTF-16BE
/// and Latin-1 fallbacks for fonts without a usable encoding entry.
fn decode_string(
    operand: &Object,
    doc: &Document,
    fonts: &std::collections::BTreeMap<Vec<u8>, &Dictionary>,
    font_resource: &[u8],
) -> Option<String> {
    let Object::String(bytes, _) = operand else {
        return None;
    };

    if let Some(font_dict) = fonts.get(font_resource) {
        if let Ok(encoding) = font_dict.get_font_encoding(doc) {
            if let Ok(text) = Document::decode_text(&encoding, bytes) {
                return Some(text);
            }
        }
    }

    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|chunk| u16::from_be_bytes([chunk[0], chunk[1]]))
            .collect();
        return Some(String::from_utf16_lossy(&utf16));
    }

    Some(bytes.iter().map(|&b| b as char).collect())
}

/// Resolves the current font resource to its BaseFont name, stripping any
/// `ABCDEF+` subset prefix. Empty string when unresolvable.
fn resolved_base_font(
    fonts: &std::collections::BTreeMap<Vec<u8>, &Dictionary>,
    font_resource: &[u8],
) -> String {
    let Some(font_dict) = fonts.get(font_resource) else {
        return String::new();
    };
    let Ok(base) = font_dict.get(b"BaseFont") else {
        return String::new();
    };
    let Ok(name) = base.as_name() else {
        return String::new();
    };
    let name = String::from_utf8_lossy(name).to_string();

    if let Some((prefix, rest)) = name.split_once('+') {
        if prefix.len() == 6 {
            return rest.to_string();
        }
    }
    name
}

// ────────────────────────────────────────────────────────────────────────────
// Small helpers
// ────────────────────────────────────────────────────────────────────────────

fn as_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

fn numeric_operands(operands: &[Object]) -> usize {
    operands.iter().filter(|o| as_number(o).is_some()).count()
}

fn h_scale(tm: &[f32; 6]) -> f32 {
    if tm[0].abs() > f32::EPSILON {
        tm[0].abs()
    } else {
        1.0
    }
}

fn v_scale(tm: &[f32; 6]) -> f32 {
    if tm[3].abs() > f32::EPSILON {
        tm[3].abs()
    } else {
        1.0
    }
}

/// MediaBox height of the page, walking up the Pages tree with a depth limit.
/// Defaults to US letter when absent or malformed.
pub(crate) fn page_height(doc: &Document, page_id: ObjectId) -> f32 {
    const LETTER_HEIGHT: f32 = 792.0;

    let Ok(page_obj) = doc.get_object(page_id) else {
        return LETTER_HEIGHT;
    };
    media_box(doc, page_obj, 10)
        .map(|mb| mb[3] - mb[1])
        .unwrap_or(LETTER_HEIGHT)
}

fn media_box(doc: &Document, obj: &Object, depth: usize) -> Option<[f32; 4]> {
    if depth == 0 {
        return None;
    }
    let Object::Dictionary(dict) = obj else {
        return None;
    };

    if let Ok(mb) = dict.get(b"MediaBox") {
        let arr = match mb {
            Object::Array(arr) => Some(arr),
            Object::Reference(id) => match doc.get_object(*id) {
                Ok(Object::Array(arr)) => Some(arr),
                _ => None,
            },
            _ => None,
        };
        if let Some(arr) = arr {
            let values: Vec<f32> = arr.iter().filter_map(as_number).collect();
            if values.len() == 4 {
                return Some([values[0], values[1], values[2], values[3]]);
            }
        }
    }

    if let Ok(Object::Reference(parent_id)) = dict.get(b"Parent") {
        if let Ok(parent) = doc.get_object(*parent_id) {
            return media_box(doc, parent, depth - 1);
        }
    }

    None
}
