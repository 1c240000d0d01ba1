//! Customization pipeline — the engine's single entry point.
//!
//! Flow: validate → extract → classify → group → (per group) generate with
//! length fit → align chunks → match blocks → accumulate plan → rewrite
//! document-wide → (optionally) stage and store.
//!
//! One request runs synchronously through the pipeline; concurrent requests
//! for different documents are independent pipeline instances with no shared
//! mutable state. There is no cancellation path mid-pipeline — a request
//! either completes or fails outright.

use bytes::Bytes;
use lopdf::Document;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::align::align_chunks;
use crate::config::EngineConfig;
use crate::errors::EngineError;
use crate::extract::{extract, Extraction};
use crate::generator::{generate_with_length_fit, ContentGenerator};
use crate::grouping::group_by_proximity;
use crate::matching::find_best_block;
use crate::plan::ReplacementPlan;
use crate::rewrite::{rewrite_document, PaintFallback};
use crate::sections::{classify, SectionName};
use crate::storage::{ArtifactMetadata, ArtifactStore, StoredArtifact};

// ────────────────────────────────────────────────────────────────────────────
// Result types
// ────────────────────────────────────────────────────────────────────────────

/// Counters describing one customization run. Soft failures surface here
/// rather than as errors: the caller sees reduced fidelity, never a failed
/// request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomizeReport {
    pub line_runs: usize,
    pub span_blocks: usize,
    pub sections: Vec<SectionName>,
    /// Groups that were sent to the content generator.
    pub groups_customized: usize,
    pub planned_replacements: usize,
    /// Chunks dropped because no block scored above the match threshold.
    pub dropped_chunks: usize,
    /// Groups that kept their original text after a generation failure.
    pub generation_fallbacks: usize,
    pub painted: usize,
    pub paint_fallbacks: Vec<PaintFallback>,
}

/// A rewritten document plus the run's report.
#[derive(Debug, Clone)]
pub struct CustomizedDocument {
    pub bytes: Vec<u8>,
    pub report: CustomizeReport,
}

/// Intermediate statistics from the plan-building phase.
#[derive(Debug, Clone, Default)]
pub struct PlanStats {
    pub sections: Vec<SectionName>,
    pub groups_customized: usize,
    pub dropped_chunks: usize,
    pub generation_fallbacks: usize,
}

// ────────────────────────────────────────────────────────────────────────────
// Customizer
// ────────────────────────────────────────────────────────────────────────────

/// One customization pipeline instance, parameterized by its content
/// generator. Holds no per-request state; a single instance may serve many
/// sequential requests.
pub struct Customizer<G> {
    generator: G,
    config: EngineConfig,
}

impl<G: ContentGenerator> Customizer<G> {
    pub fn new(generator: G) -> Self {
        Self::with_config(generator, EngineConfig::default())
    }

    pub fn with_config(generator: G, config: EngineConfig) -> Self {
        Self { generator, config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Runs the full pipeline over `source` and returns the rewritten
    /// document bytes with the run report.
    pub async fn customize(
        &self,
        source: &[u8],
        job_description: &str,
    ) -> Result<CustomizedDocument, EngineError> {
        if source.is_empty() {
            return Err(EngineError::Validation(
                "no source document provided".to_string(),
            ));
        }
        if job_description.trim().is_empty() {
            return Err(EngineError::Validation(
                "no job description provided".to_string(),
            ));
        }

        let doc = Document::load_mem(source)
            .map_err(|e| EngineError::Extraction(format!("unreadable document: {e}")))?;
        let extraction = extract(&doc, &self.config)?;

        let (plan, stats) = self.build_plan(&extraction, job_description).await;
        info!(
            "Planned {} replacements across {} groups",
            plan.len(),
            stats.groups_customized
        );

        let (bytes, rewrite_report) = rewrite_document(source, &plan, &self.config)?;

        Ok(CustomizedDocument {
            bytes,
            report: CustomizeReport {
                line_runs: extraction.line_runs.len(),
                span_blocks: extraction.span_blocks.len(),
                sections: stats.sections,
                groups_customized: stats.groups_customized,
                planned_replacements: plan.len(),
                dropped_chunks: stats.dropped_chunks,
                generation_fallbacks: stats.generation_fallbacks,
                painted: rewrite_report.painted,
                paint_fallbacks: rewrite_report.fallbacks,
            },
        })
    }

    /// Builds the replacement plan for an already-extracted document.
    ///
    /// Each proximity group is customized as one unit: the generator sees the
    /// group's joined text, the result is re-chunked proportionally, and each
    /// chunk is matched back to a span block through its original run text.
    pub async fn build_plan(
        &self,
        extraction: &Extraction,
        job_description: &str,
    ) -> (ReplacementPlan, PlanStats) {
        let sections = classify(&extraction.line_runs, &self.config);

        let mut plan = ReplacementPlan::new();
        let mut stats = PlanStats {
            sections: sections.keys().copied().collect(),
            ..PlanStats::default()
        };

        for (section, items) in &sections {
            for group in group_by_proximity(items, self.config.proximity_gap) {
                let original_texts: Vec<String> =
                    group.iter().map(|r| r.text.trim().to_string()).collect();
                let joined = original_texts.join("\n");

                // Very short groups (stray labels, dates) are left alone.
                if joined.chars().count() < self.config.min_group_chars {
                    debug!("skipping short group in {section}: {joined:?}");
                    continue;
                }
                stats.groups_customized += 1;

                let generated = generate_with_length_fit(
                    &self.generator,
                    &joined,
                    job_description,
                    *section,
                    self.config.length_drift_tolerance,
                )
                .await;
                if generated.fell_back {
                    stats.generation_fallbacks += 1;
                }

                let chunks = align_chunks(&original_texts, &generated.text);

                for (original, chunk) in original_texts.iter().zip(chunks) {
                    if original.is_empty() || chunk.trim().is_empty() {
                        continue;
                    }
                    match find_best_block(
                        original,
                        &extraction.span_blocks,
                        self.config.match_threshold,
                    ) {
                        Some(key) => {
                            // The key came from the same map; the lookup
                            // cannot miss.
                            if let Some(block) = extraction.span_blocks.get(&key) {
                                plan.insert(key, chunk, block.clone());
                            }
                        }
                        None => {
                            stats.dropped_chunks += 1;
                            warn!("no block matched run {original:?} in {section}, chunk dropped");
                        }
                    }
                }
            }
        }

        (plan, stats)
    }

    /// Customizes and hands the result to the artifact store, staging the
    /// bytes in a request-scoped temp file on the way.
    ///
    /// The staged file is removed on every exit path; removal failures are
    /// logged and never surfaced.
    pub async fn customize_and_store(
        &self,
        source: &[u8],
        job_description: &str,
        store: &dyn ArtifactStore,
        metadata: &ArtifactMetadata,
    ) -> Result<StoredArtifact, EngineError> {
        let document = self.customize(source, job_description).await?;

        let mut staged = tempfile::NamedTempFile::new()
            .map_err(|e| EngineError::Persistence(format!("failed to stage output: {e}")))?;
        std::io::Write::write_all(&mut staged, &document.bytes)
            .map_err(|e| EngineError::Persistence(format!("failed to stage output: {e}")))?;
        debug!("staged rewritten document at {:?}", staged.path());

        let result = store
            .put(Bytes::from(document.bytes), metadata)
            .await
            .map_err(|e| EngineError::Persistence(e.to_string()));

        if let Err(e) = staged.close() {
            warn!("failed to remove staged artifact: {e}");
        }

        result
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
