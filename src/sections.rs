//! Section classification — a sequential label-propagation state machine.
//!
//! Runs are visited in reading order with one piece of state: the currently
//! active section. A run that looks like a header and matches a section's
//! keyword set reassigns the state; every other run (headers included) is
//! appended to whatever section is active. There is no backtracking — a
//! misdetected header reassigns everything that follows until the next
//! header flips the state again.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::EngineConfig;
use crate::extract::TextRun;

// ────────────────────────────────────────────────────────────────────────────
// Section names
// ────────────────────────────────────────────────────────────────────────────

/// The fixed set of semantic resume sections subject to customization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SectionName {
    Summary,
    Experience,
    Skills,
    Education,
}

impl SectionName {
    /// All sections, in canonical document order.
    pub const ALL: [SectionName; 4] = [
        SectionName::Summary,
        SectionName::Experience,
        SectionName::Skills,
        SectionName::Education,
    ];

    /// Header keywords that activate this section.
    fn keywords(self) -> &'static [&'static str] {
        match self {
            SectionName::Summary => &["summary", "profile", "objective", "about"],
            SectionName::Experience => &["experience", "work history", "employment", "professional"],
            SectionName::Skills => &["skills", "competencies", "abilities", "expertise"],
            SectionName::Education => &["education", "academic", "degree", "university"],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SectionName::Summary => "Summary",
            SectionName::Experience => "Experience",
            SectionName::Skills => "Skills",
            SectionName::Education => "Education",
        }
    }
}

impl fmt::Display for SectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Classification
// ────────────────────────────────────────────────────────────────────────────

/// Labels each line run into a semantic section. Only non-empty sections are
/// returned, in canonical order. Runs preceding any detected header belong to
/// no section and are dropped from customization.
pub fn classify(runs: &[TextRun], config: &EngineConfig) -> IndexMap<SectionName, Vec<TextRun>> {
    let mut sections: IndexMap<SectionName, Vec<TextRun>> = SectionName::ALL
        .iter()
        .map(|s| (*s, Vec::new()))
        .collect();

    let mut sorted: Vec<&TextRun> = runs.iter().collect();
    sorted.sort_by(|a, b| {
        a.page.cmp(&b.page).then(
            a.bbox
                .y0
                .partial_cmp(&b.bbox.y0)
                .unwrap_or(std::cmp::Ordering::Equal),
        )
    });

    let mut current: Option<SectionName> = None;

    for run in sorted {
        let trimmed = run.text.trim();
        if trimmed.is_empty() {
            continue;
        }
        let lowered = trimmed.to_lowercase();

        let is_header = run.font_size > config.header_font_threshold
            || (trimmed.chars().count() < config.header_max_chars
                && run.text.chars().any(|c| c.is_uppercase()));

        if is_header {
            // An unmatched header leaves the active section unchanged.
            for section in SectionName::ALL {
                if section.keywords().iter().any(|k| lowered.contains(k)) {
                    current = Some(section);
                    break;
                }
            }
        }

        if let Some(section) = current {
            if let Some(items) = sections.get_mut(&section) {
                items.push(run.clone());
            }
        }
    }

    sections.retain(|_, items| !items.is_empty());

    info!(
        "Identified sections: {:?}",
        sections.keys().map(|s| s.as_str()).collect::<Vec<_>>()
    );

    sections
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::BBox;

    fn run(text: &str, y: f32, size: f32) -> TextRun {
        TextRun {
            text: text.to_string(),
            bbox: BBox {
                x0: 72.0,
                y0: y,
                x1: 300.0,
                y1: y + size,
            },
            font_name: "Helvetica".to_string(),
            font_size: size,
            page: 0,
        }
    }

    #[test]
    fn test_header_keyword_assigns_following_runs() {
        let runs = vec![
            run("SKILLS", 100.0, 14.0),
            run("Python, SQL, and a pinch of awk", 120.0, 10.0),
        ];
        let sections = classify(&runs, &EngineConfig::default());

        let skills = sections.get(&SectionName::Skills).unwrap();
        assert_eq!(skills.len(), 2, "header and body both land in the section");
        assert_eq!(skills[1].text, "Python, SQL, and a pinch of awk");
    }

    #[test]
    fn test_runs_before_first_header_are_dropped() {
        let runs = vec![
            run("Jane Doe — jane@example.com", 50.0, 10.0),
            run("EXPERIENCE", 100.0, 14.0),
            run("Built a billing system", 120.0, 10.0),
        ];
        let sections = classify(&runs, &EngineConfig::default());

        assert!(!sections.contains_key(&SectionName::Summary));
        let experience = sections.get(&SectionName::Experience).unwrap();
        assert!(experience.iter().all(|r| r.text != "Jane Doe — jane@example.com"));
    }

    #[test]
    fn test_unmatched_header_keeps_active_section() {
        let runs = vec![
            run("SUMMARY", 50.0, 14.0),
            run("Seasoned engineer", 70.0, 10.0),
            run("AWARDS", 90.0, 14.0),
            run("Employee of the month", 110.0, 10.0),
        ];
        let sections = classify(&runs, &EngineConfig::default());

        // "AWARDS" matches no keyword set, so Summary stays active.
        let summary = sections.get(&SectionName::Summary).unwrap();
        assert!(summary.iter().any(|r| r.text == "Employee of the month"));
    }

    #[test]
    fn test_new_header_flips_active_section() {
        let runs = vec![
            run("EXPERIENCE", 50.0, 14.0),
            run("Did backend work", 70.0, 10.0),
            run("EDUCATION", 90.0, 14.0),
            run("BSc Computer Science", 110.0, 10.0),
        ];
        let sections = classify(&runs, &EngineConfig::default());

        assert!(sections
            .get(&SectionName::Experience)
            .unwrap()
            .iter()
            .all(|r| r.text != "BSc Computer Science"));
        assert!(sections
            .get(&SectionName::Education)
            .unwrap()
            .iter()
            .any(|r| r.text == "BSc Computer Science"));
    }

    #[test]
    fn test_large_font_alone_marks_header() {
        // "professional summary" is 20 chars but lowercase; only the font
        // size makes it a header here.
        let runs = vec![
            run("professional summary and more words to pass thirty", 50.0, 16.0),
            run("Delivers on time", 70.0, 10.0),
        ];
        let sections = classify(&runs, &EngineConfig::default());
        assert!(sections.contains_key(&SectionName::Summary));
    }

    #[test]
    fn test_empty_sections_are_omitted() {
        let runs = vec![run("SKILLS", 50.0, 14.0)];
        let sections = classify(&runs, &EngineConfig::default());
        assert_eq!(sections.len(), 1);
        assert!(sections.contains_key(&SectionName::Skills));
    }

    #[test]
    fn test_classification_follows_reading_order_not_input_order() {
        // Input deliberately shuffled; the EDUCATION header at y=90 must
        // still take over only for runs below it.
        let runs = vec![
            run("BSc Computer Science", 110.0, 10.0),
            run("EXPERIENCE", 50.0, 14.0),
            run("EDUCATION", 90.0, 14.0),
            run("Did backend work", 70.0, 10.0),
        ];
        let sections = classify(&runs, &EngineConfig::default());

        assert!(sections
            .get(&SectionName::Experience)
            .unwrap()
            .iter()
            .any(|r| r.text == "Did backend work"));
        assert!(sections
            .get(&SectionName::Education)
            .unwrap()
            .iter()
            .any(|r| r.text == "BSc Computer Science"));
    }
}
