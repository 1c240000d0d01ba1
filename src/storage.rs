//! Artifact store interface — the external persistence collaborator.
//!
//! The engine hands over final document bytes plus metadata and receives a
//! stable reference back; it does not know (or care) whether the backend is
//! an object store, a database, or a directory on disk.

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store rejected artifact: {0}")]
    Rejected(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Metadata accompanying a stored artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    /// Owning identity, assigned by the calling layer.
    pub owner: Uuid,
    /// Name of the source document this artifact was derived from.
    pub source_name: String,
}

impl ArtifactMetadata {
    pub fn new(owner: Uuid, source_name: impl Into<String>) -> Self {
        Self {
            owner,
            source_name: source_name.into(),
        }
    }
}

/// Stable reference to a persisted artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredArtifact {
    pub url: String,
}

/// Persistence backend for finished documents.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    async fn put(
        &self,
        bytes: Bytes,
        metadata: &ArtifactMetadata,
    ) -> Result<StoredArtifact, StoreError>;
}
