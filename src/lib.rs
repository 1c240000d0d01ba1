//! restitch — layout-preserving content substitution for paginated resumes.
//!
//! Given a source PDF and a job description, the engine rewrites the text of
//! the resume's semantic sections so that externally generated substitute
//! content occupies the same visual positions as the original, reconciling
//! text of arbitrary new length against fixed page geometry with heuristics
//! (no layout-engine re-flow).
//!
//! Pipeline: extraction → section classification → proximity grouping →
//! (per group) content generation → proportional chunk alignment → block
//! matching → one document-wide rewrite pass.
//!
//! The crate is invoked as a library by a request-handling layer. The content
//! generator and the artifact store are consumed through the
//! [`ContentGenerator`] and [`ArtifactStore`] traits; an LLM-backed generator
//! is provided in [`generator::llm`].

pub mod align;
pub mod config;
pub mod errors;
pub mod extract;
pub mod fonts;
pub mod generator;
pub mod grouping;
pub mod matching;
pub mod pipeline;
pub mod plan;
pub mod rewrite;
pub mod sections;
pub mod storage;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::EngineConfig;
pub use errors::EngineError;
pub use generator::{ContentGenerator, GenerationError, LlmGenerator};
pub use pipeline::{CustomizeReport, CustomizedDocument, Customizer};
pub use sections::SectionName;
pub use storage::{ArtifactMetadata, ArtifactStore, StoredArtifact};
