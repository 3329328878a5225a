//! Errors raised while saving or resuming a machine checkpoint.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckpointError {
    /// Encoding to JSON or bincode failed
    #[error("Checkpoint encoding failed: {0}")]
    SerializationFailed(String),

    /// Decoding from JSON or bincode failed
    #[error("Checkpoint decoding failed: {0}")]
    DeserializationFailed(String),

    #[error("Checkpoint format version {found} is not supported (expected {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// The decoded graph breaks a machine invariant
    #[error("Checkpoint rejected: {0}")]
    ValidationFailed(String),
}
