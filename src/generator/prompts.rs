//! Prompt construction for the content generator.

use std::fmt::Write;

use crate::sections::SectionName;

use super::LengthDirection;

pub const SYSTEM: &str = "You are a professional resume customization expert. \
You tailor existing resume content to a job description while preserving the \
original structure, length, and tone. You reply with the rewritten text only — \
no preamble, no markdown, no commentary.";

/// Instructions applied to every section.
const BASE_INSTRUCTIONS: [&str; 6] = [
    "Maintain the original structure and formatting",
    "Keep approximately the same length as the original text",
    "Use professional language consistent with the original",
    "Preserve dates, company names, and education details",
    "Do not add new sections or completely rewrite the content",
    "Focus on subtle refinements that align with the job description",
];

fn section_instructions(section: SectionName) -> &'static [&'static str] {
    match section {
        SectionName::Summary => &[
            "Emphasize skills and qualities mentioned in the job description",
            "Keep the personal tone and voice consistent with the original",
        ],
        SectionName::Experience => &[
            "Highlight achievements that relate to the job requirements",
            "Use action verbs and quantify results where possible",
            "Maintain chronological order and date formats",
        ],
        SectionName::Skills => &[
            "Prioritize skills mentioned in the job description",
            "Keep technical terms and industry terminology accurate",
            "Maintain the original skill categorization if present",
        ],
        SectionName::Education => &[
            "Keep all educational qualifications exactly as in the original",
            "Only make minor wording changes if necessary",
        ],
    }
}

/// Builds the per-group customization prompt.
pub fn customization_prompt(original: &str, job_description: &str, section: SectionName) -> String {
    let mut prompt = String::new();

    let _ = writeln!(
        prompt,
        "Tailor this {section} section to better match the job description \
         while preserving the original format and style.\n"
    );
    let _ = writeln!(prompt, "JOB DESCRIPTION:\n{job_description}\n");
    let _ = writeln!(prompt, "ORIGINAL {} SECTION:\n{original}\n", section.as_str().to_uppercase());

    prompt.push_str("INSTRUCTIONS:\n");
    for instruction in BASE_INSTRUCTIONS
        .iter()
        .chain(section_instructions(section))
    {
        let _ = writeln!(prompt, "- {instruction}");
    }

    let _ = writeln!(
        prompt,
        "\nIMPORTANT: Keep the same text length and structure as the original. \
         Focus on subtle keyword optimization without changing the overall format.\n"
    );
    let _ = writeln!(prompt, "CUSTOMIZED {} SECTION:", section.as_str().to_uppercase());

    prompt
}

/// Builds the single length-adjustment follow-up prompt.
pub fn length_adjustment_prompt(draft: &str, target_chars: usize, direction: LengthDirection) -> String {
    let verb = match direction {
        LengthDirection::Expand => "expanded",
        LengthDirection::Condense => "condensed",
    };
    format!(
        "The following text needs to be {verb} to approximately {target_chars} \
         characters while keeping the same meaning and professional tone. \
         Reply with the adjusted text only.\n\n{draft}"
    )
}
