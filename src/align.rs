//! Content alignment — proportional re-chunking of one generated blob
//! against several original sub-texts.
//!
//! The generator returns one blob per group; the originals were several
//! separately positioned lines. Each original gets a slice of the blob whose
//! length is proportional to its own, with the cut point snapped to the
//! nearest sentence boundary inside a small search window. Trailing content
//! is never dropped: any remainder after the last cut is appended to the
//! final chunk.
//!
//! Lengths are measured in characters, not bytes, so the cut points are
//! always on `char` boundaries.

const SENTENCE_TERMINALS: [char; 3] = ['.', '!', '?'];

/// Maximum distance, in characters, the cut point may move to reach a
/// sentence boundary.
const MAX_WINDOW: usize = 30;

/// Splits `blob` into exactly `original_texts.len()` chunks.
///
/// Postconditions:
/// - `result.len() == original_texts.len()`;
/// - the concatenated chunks cover the whole blob (up to trimmed whitespace).
pub fn align_chunks(original_texts: &[String], blob: &str) -> Vec<String> {
    if original_texts.is_empty() {
        return Vec::new();
    }

    let chars: Vec<char> = blob.chars().collect();
    let total_new = chars.len();
    let total_orig: usize = original_texts.iter().map(|t| t.chars().count()).sum();

    let mut chunks: Vec<String> = Vec::with_capacity(original_texts.len());
    let mut pos = 0usize;

    for text in original_texts {
        let proportion = text.chars().count() as f64 / total_orig.max(1) as f64;
        let raw_size = ((proportion * total_new as f64).round() as usize).max(1);
        let raw_end = (pos + raw_size).min(total_new);
        let window = (raw_size / 2).min(MAX_WINDOW);

        let split = find_split(&chars, pos, raw_end, window);

        let chunk: String = chars[pos..split].iter().collect();
        chunks.push(chunk.trim().to_string());
        pos = split;
    }

    // Never drop trailing content — the remainder joins the last chunk.
    if pos < total_new {
        let rest: String = chars[pos..].iter().collect();
        let rest = rest.trim();
        if !rest.is_empty() {
            if let Some(last) = chunks.last_mut() {
                if !last.is_empty() {
                    last.push(' ');
                }
                last.push_str(rest);
            }
        }
    }

    // Defensive: the loop emits one chunk per original, but keep the
    // contract airtight.
    while chunks.len() < original_texts.len() {
        chunks.push(String::new());
    }
    chunks.truncate(original_texts.len());

    chunks
}

/// Finds the cut point nearest `raw_end`: backward scan first, then forward,
/// both bounded by `window`; `raw_end` itself if no terminal is found.
fn find_split(chars: &[char], pos: usize, raw_end: usize, window: usize) -> usize {
    let search_start = raw_end.saturating_sub(window).max(pos);
    for i in ((search_start + 1)..=raw_end).rev() {
        if SENTENCE_TERMINALS.contains(&chars[i - 1]) {
            return i;
        }
    }

    let search_end = (raw_end + window).min(chars.len());
    for i in raw_end..search_end {
        if i >= 1 && SENTENCE_TERMINALS.contains(&chars[i - 1]) {
            return i;
        }
    }

    raw_end
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
