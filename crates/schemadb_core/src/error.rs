//! Error types for mapping-layer operations.

use thiserror::Error;

/// Result type for mapping-layer operations.
pub type DbResult<T> = Result<T, DbError>;

/// Errors that can occur in SchemaDB operations.
#[derive(Debug, Error)]
pub enum DbError {
    /// Engine error surfaced by the underlying key-value store.
    #[error("storage error: {0}")]
    Storage(#[from] schemadb_kv::KvError),

    /// Wire document could not be serialized or parsed.
    #[error("codec error: {0}")]
    Codec(#[from] serde_json::Error),

    /// Namespace or key absent on get/update/delete.
    #[error("record not found")]
    NotFound,

    /// Delete blocked by the referential-integrity gate.
    #[error("record is in use by {kind} records")]
    InUse {
        /// Namespace name of the referring kind that blocked the delete.
        kind: &'static str,
    },

    /// A string primary key was empty on create.
    #[error("invalid identifier: {message}")]
    InvalidIdentifier {
        /// Description of the violation.
        message: String,
    },

    /// The primary field's kind is not integer or string.
    #[error("unsupported identifier type for field {field}")]
    UnsupportedIdentifierType {
        /// Wire name of the offending primary field.
        field: String,
    },

    /// A request conflicts with the type's schema descriptor.
    #[error("schema mismatch: {message}")]
    SchemaMismatch {
        /// Description of the conflict.
        message: String,
    },
}

impl DbError {
    /// Creates an invalid identifier error.
    pub fn invalid_identifier(message: impl Into<String>) -> Self {
        Self::InvalidIdentifier {
            message: message.into(),
        }
    }

    /// Creates an unsupported identifier type error.
    pub fn unsupported_identifier(field: impl Into<String>) -> Self {
        Self::UnsupportedIdentifierType {
            field: field.into(),
        }
    }

    /// Creates a schema mismatch error.
    pub fn schema_mismatch(message: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            message: message.into(),
        }
    }
}
