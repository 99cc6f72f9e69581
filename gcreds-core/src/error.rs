//! Error types for the credential store.

use std::path::PathBuf;

use thiserror::Error;

/// Error type for credential store operations.
///
/// All messages carry the `gcreds/store:` prefix so callers of the
/// credential-helper protocol can attribute failures to this component.
#[derive(Debug, Error)]
pub enum CredStoreError {
    /// I/O error creating the credential directory or reading/writing the file.
    #[error("gcreds/store: {0}")]
    Io(#[from] std::io::Error),

    /// The credential file exists but does not decode to a well-formed record.
    #[error("gcreds/store: failed to decode credentials from {}: {}", .path.display(), .source)]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Serialization of the record failed.
    ///
    /// Not reachable for records built through this crate's own mutators.
    #[error("gcreds/store: failed to encode credentials: {0}")]
    Encode(#[source] serde_json::Error),

    /// No third-party credentials are stored for the requested registry.
    #[error("gcreds/store: no credentials present for {server_url}")]
    NotFound { server_url: String },

    /// No primary identity is signed in.
    #[error("gcreds/store: primary credentials not present in store")]
    NoPrimaryAuth,

    /// The credential file path could not be resolved.
    #[error("gcreds/store: couldn't construct config path: {message}")]
    ConfigPath { message: String },
}

impl CredStoreError {
    /// Whether this error is "the credential file does not exist".
    ///
    /// Deletes treat this as success and sets as "start from empty"; every
    /// other failure propagates.
    pub(crate) fn is_file_missing(&self) -> bool {
        matches!(self, Self::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }
}
