use thiserror::Error;

/// Crate-level error type returned from the customization pipeline.
///
/// Only fatal conditions appear here. Per-item soft failures (a chunk that
/// matches no block, a replacement that cannot be painted) are carried in the
/// [`CustomizeReport`](crate::pipeline::CustomizeReport) instead of being
/// raised — the caller receives either a rewritten document or exactly one
/// descriptive error.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Missing or empty input. Raised before the pipeline starts.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The document has no extractable text layer or is structurally
    /// unreadable. Aborts the whole request.
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// The rewritten document could not be assembled or saved.
    #[error("Rewrite error: {0}")]
    Rewrite(String),

    /// The final artifact could not be saved or stored.
    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
