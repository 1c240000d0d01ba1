//! Proximity grouping — clusters a section's runs into paragraph-like groups
//! by vertical gap.

use crate::extract::TextRun;

/// Splits runs into groups of vertically adjacent lines.
///
/// Runs are sorted top-down; a new group starts whenever the gap between a
/// run's top and the previous run's bottom reaches `gap_threshold`, or when
/// the page changes. Each group is one unit of content generation.
pub fn group_by_proximity(items: &[TextRun], gap_threshold: f32) -> Vec<Vec<TextRun>> {
    if items.is_empty() {
        return Vec::new();
    }

    let mut sorted: Vec<&TextRun> = items.iter().collect();
    sorted.sort_by(|a, b| {
        a.page.cmp(&b.page).then(
            a.bbox
                .y0
                .partial_cmp(&b.bbox.y0)
                .unwrap_or(std::cmp::Ordering::Equal),
        )
    });

    let mut groups: Vec<Vec<TextRun>> = Vec::new();
    let mut current: Vec<TextRun> = vec![sorted[0].clone()];

    for pair in sorted.windows(2) {
        let (prev, item) = (pair[0], pair[1]);
        let gap = item.bbox.y0 - prev.bbox.y1;

        if item.page == prev.page && gap < gap_threshold {
            current.push(item.clone());
        } else {
            groups.push(std::mem::replace(&mut current, vec![item.clone()]));
        }
    }
    groups.push(current);

    groups
}
