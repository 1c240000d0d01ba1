//! Line-level provider — groups span events into mono-styled line runs.

use crate::config::EngineConfig;

use super::interp::SpanEvent;
use super::{BBox, TextRun};

/// Fraction of the font size a horizontal gap must exceed before a space is
/// inserted between two spans on the same line.
const WORD_GAP_EM: f32 = 0.3;

/// Ascent/descent estimates as fractions of the font size, used to widen a
/// baseline into a bounding box.
const ASCENT_FACTOR: f32 = 0.8;
const DESCENT_FACTOR: f32 = 0.2;

/// Groups span events into line runs, top-down reading order.
///
/// Spans land on the same line when they share a page and their baselines
/// differ by less than the configured tolerance. The line keeps the font name
/// and size of its first span — a line is treated as mono-styled.
pub(crate) fn line_runs(events: &[SpanEvent], config: &EngineConfig) -> Vec<TextRun> {
    if events.is_empty() {
        return Vec::new();
    }

    let mut sorted: Vec<&SpanEvent> = events.iter().collect();
    sorted.sort_by(|a, b| {
        a.page
            .cmp(&b.page)
            .then(
                b.baseline
                    .partial_cmp(&a.baseline)
                    .unwrap_or(std::cmp::Ordering::Equal),
            )
            .then(a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal))
    });

    let mut runs: Vec<TextRun> = Vec::new();
    let mut current: Option<LineBuilder> = None;

    for event in sorted {
        match &mut current {
            Some(line)
                if line.page == event.page
                    && (line.baseline - event.baseline).abs() < config.line_y_tolerance =>
            {
                line.push(event);
            }
            _ => {
                if let Some(line) = current.take() {
                    if let Some(run) = line.finish() {
                        runs.push(run);
                    }
                }
                current = Some(LineBuilder::start(event));
            }
        }
    }
    if let Some(line) = current {
        if let Some(run) = line.finish() {
            runs.push(run);
        }
    }

    runs
}

struct LineBuilder {
    page: usize,
    page_height: f32,
    baseline: f32,
    text: String,
    x0: f32,
    x_end: f32,
    font_name: String,
    font_size: f32,
    max_size: f32,
}

impl LineBuilder {
    fn start(event: &SpanEvent) -> Self {
        LineBuilder {
            page: event.page,
            page_height: event.page_height,
            baseline: event.baseline,
            text: event.text.clone(),
            x0: event.x,
            x_end: event.x + event.width,
            font_name: event.font_name.clone(),
            font_size: event.font_size,
            max_size: event.font_size,
        }
    }

    fn push(&mut self, event: &SpanEvent) {
        let gap = event.x - self.x_end;
        if gap > WORD_GAP_EM * self.font_size && !self.text.ends_with(' ') {
            self.text.push(' ');
        }
        self.text.push_str(&event.text);
        self.x0 = self.x0.min(event.x);
        self.x_end = self.x_end.max(event.x + event.width);
        self.max_size = self.max_size.max(event.font_size);
    }

    fn finish(self) -> Option<TextRun> {
        if self.text.trim().is_empty() {
            return None;
        }

        // Flip to top-left origin: the box top is ascent above the baseline.
        let y0 = self.page_height - (self.baseline + ASCENT_FACTOR * self.max_size);
        let y1 = self.page_height - (self.baseline - DESCENT_FACTOR * self.max_size);

        Some(TextRun {
            text: self.text,
            bbox: BBox {
                x0: self.x0,
                y0,
                x1: self.x_end,
                y1,
            },
            font_name: self.font_name,
            font_size: self.font_size,
            page: self.page,
        })
    }
}
