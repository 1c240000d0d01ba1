//! Content generator interface — the external text-to-text collaborator.
//!
//! The engine consumes generation as an opaque service: given a group's
//! original text, the job description, and the section label, it returns
//! customized text of unpredictable length. Failures are never fatal for a
//! group — the caller degrades to the verbatim original.
//!
//! The engine performs at most one automatic follow-up call per group: the
//! length-adjustment refinement. There is no retry loop and no iterative
//! convergence.

pub mod llm;
pub mod prompts;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};

use crate::sections::SectionName;

pub use llm::LlmGenerator;

// ────────────────────────────────────────────────────────────────────────────
// Errors and trait
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("generator returned empty content")]
    EmptyContent,
}

/// Direction of the single length-adjustment refinement round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthDirection {
    Expand,
    Condense,
}

/// The external content generator, as consumed by the engine.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Produces customized text for one content group.
    async fn generate(
        &self,
        original: &str,
        job_description: &str,
        section: SectionName,
    ) -> Result<String, GenerationError>;

    /// Expands or condenses `draft` toward `target_chars` characters.
    /// Called at most once per group, after `generate`.
    async fn refine_length(
        &self,
        draft: &str,
        target_chars: usize,
        direction: LengthDirection,
    ) -> Result<String, GenerationError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Length-fit wrapper
// ────────────────────────────────────────────────────────────────────────────

/// Outcome of [`generate_with_length_fit`], with the fallback visible in the
/// data flow rather than hidden behind a caught exception.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedText {
    pub text: String,
    /// True when generation failed and the original text was substituted.
    pub fell_back: bool,
}

/// Calls the generator and reconciles the result length with the original.
///
/// - Generation failure or empty output → the original text, flagged as a
///   fallback (graceful degradation, never fatal).
/// - Result length within `1 ± drift_tolerance` of the original → accepted.
/// - Otherwise one refinement call is issued; the refinement is kept only if
///   it moves the length strictly closer to the target.
pub async fn generate_with_length_fit<G: ContentGenerator + ?Sized>(
    generator: &G,
    original: &str,
    job_description: &str,
    section: SectionName,
    drift_tolerance: f32,
) -> GeneratedText {
    let generated = match generator.generate(original, job_description, section).await {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => {
            warn!("generator returned empty content for {section}, keeping original text");
            return GeneratedText {
                text: original.to_string(),
                fell_back: true,
            };
        }
        Err(e) => {
            warn!("generation failed for {section}: {e}, keeping original text");
            return GeneratedText {
                text: original.to_string(),
                fell_back: true,
            };
        }
    };

    let target = original.chars().count();
    let produced = generated.chars().count();
    let ratio = produced as f32 / target.max(1) as f32;

    let direction = if ratio < 1.0 - drift_tolerance {
        LengthDirection::Expand
    } else if ratio > 1.0 + drift_tolerance {
        LengthDirection::Condense
    } else {
        return GeneratedText {
            text: generated,
            fell_back: false,
        };
    };

    debug!(
        "generated length {produced} drifts from target {target} ({section}), requesting {direction:?}"
    );

    let text = match generator.refine_length(&generated, target, direction).await {
        Ok(refined) => {
            let refined_delta = refined.chars().count().abs_diff(target);
            let produced_delta = produced.abs_diff(target);
            // Accept only if strictly closer to the target.
            if refined_delta < produced_delta {
                refined
            } else {
                generated
            }
        }
        Err(e) => {
            warn!("length refinement failed for {section}: {e}, keeping first result");
            generated
        }
    };

    GeneratedText {
        text,
        fell_back: false,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    /// Scripted generator for exercising the length-fit logic.
    struct Scripted {
        generate_result: Result<String, ()>,
        refine_result: Result<String, ()>,
    }

    #[async_trait]
    impl ContentGenerator for Scripted {
        async fn generate(
            &self,
            _original: &str,
            _job_description: &str,
            _section: SectionName,
        ) -> Result<String, GenerationError> {
            self.generate_result
                .clone()
                .map_err(|_| GenerationError::EmptyContent)
        }

        async fn refine_length(
            &self,
            _draft: &str,
            _target_chars: usize,
            _direction: LengthDirection,
        ) -> Result<String, GenerationError> {
            self.refine_result
                .clone()
                .map_err(|_| GenerationError::EmptyContent)
        }
    }

    #[tokio::test]
    async fn test_failure_falls_back_to_original() {
        let gen = Scripted {
            generate_result: Err(()),
            refine_result: Err(()),
        };
        let out =
            generate_with_length_fit(&gen, "the original", "jd", SectionName::Skills, 0.2).await;
        assert_eq!(out.text, "the original");
        assert!(out.fell_back);
    }

    #[tokio::test]
    async fn test_empty_output_falls_back_to_original() {
        let gen = Scripted {
            generate_result: Ok("   ".to_string()),
            refine_result: Err(()),
        };
        let out =
            generate_with_length_fit(&gen, "the original", "jd", SectionName::Summary, 0.2).await;
        assert!(out.fell_back);
    }

    #[tokio::test]
    async fn test_in_tolerance_result_is_accepted_without_refinement() {
        let gen = Scripted {
            generate_result: Ok("elevenchars".to_string()), // 11 vs 12: ratio 0.92
            refine_result: Err(()),
        };
        let out =
            generate_with_length_fit(&gen, "twelve chars", "jd", SectionName::Skills, 0.2).await;
        assert_eq!(out.text, "elevenchars");
        assert!(!out.fell_back);
    }

    #[tokio::test]
    async fn test_refinement_accepted_only_when_strictly_closer() {
        // Original 20 chars, draft 40, refinement 30: closer → kept.
        let gen = Scripted {
            generate_result: Ok("d".repeat(40)),
            refine_result: Ok("r".repeat(30)),
        };
        let out = generate_with_length_fit(
            &gen,
            &"o".repeat(20),
            "jd",
            SectionName::Experience,
            0.2,
        )
        .await;
        assert_eq!(out.text.len(), 30);
    }

    #[tokio::test]
    async fn test_refinement_rejected_when_not_closer() {
        // Draft 40, refinement 45: farther from target 20 → first kept.
        let gen = Scripted {
            generate_result: Ok("d".repeat(40)),
            refine_result: Ok("r".repeat(45)),
        };
        let out = generate_with_length_fit(
            &gen,
            &"o".repeat(20),
            "jd",
            SectionName::Experience,
            0.2,
        )
        .await;
        assert_eq!(out.text.len(), 40);
    }

    #[tokio::test]
    async fn test_refinement_failure_keeps_first_result() {
        let gen = Scripted {
            generate_result: Ok("d".repeat(40)),
            refine_result: Err(()),
        };
        let out = generate_with_length_fit(
            &gen,
            &"o".repeat(20),
            "jd",
            SectionName::Summary,
            0.2,
        )
        .await;
        assert_eq!(out.text.len(), 40);
        assert!(!out.fell_back);
    }
}
