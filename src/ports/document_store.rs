//! Document Store Port - Whole-document text access by identifier.
//!
//! The editor core never addresses documents by anything other than their
//! opaque id and always reads and writes the full text.

use async_trait::async_trait;

use crate::domain::foundation::{DocumentId, DomainError, ErrorCode};

/// Errors that can occur during document store operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentStoreError {
    #[error("Document not found: {0}")]
    NotFound(DocumentId),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<DocumentStoreError> for DomainError {
    fn from(err: DocumentStoreError) -> Self {
        match &err {
            DocumentStoreError::NotFound(id) => {
                DomainError::new(ErrorCode::DocumentNotFound, err.to_string())
                    .with_detail("document_id", id.to_string())
            }
            DocumentStoreError::Storage(_) => {
                DomainError::new(ErrorCode::StorageError, err.to_string())
            }
        }
    }
}

/// Port for reading and replacing document text
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Current text of the document.
    ///
    /// # Errors
    /// Returns `DocumentStoreError::NotFound` if no document has this id
    async fn get_content(&self, id: &DocumentId) -> Result<String, DocumentStoreError>;

    /// Replaces the whole text of the document.
    ///
    /// # Errors
    /// Returns `DocumentStoreError::NotFound` if no document has this id
    async fn set_content(&self, id: &DocumentId, content: String)
        -> Result<(), DocumentStoreError>;
}
