//! The file-backed credential store.
//!
//! Every public operation is a self-contained load → mutate → save cycle
//! against one resolved file path: the whole record is decoded, changed in
//! memory, re-encoded, and the file rewritten wholesale. Nothing is cached
//! across calls, so concurrent helper invocations see a classic last-writer-
//! wins race; callers needing stronger guarantees must serialize externally.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::auth::{PrimaryAuth, PrimaryToken};
use crate::credential::Credential;
use crate::error::CredStoreError;
use crate::path::credential_path;
use crate::record::{AuthTokens, CredentialRecord};

/// A credential store backed by a single JSON file.
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    /// Open the store at the default OS-specific path.
    ///
    /// The file itself does not have to exist yet; it is created lazily on
    /// the first successful write.
    pub fn new() -> Result<Self, CredStoreError> {
        Ok(Self {
            path: credential_path()?,
        })
    }

    /// Open the store at an explicit path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The resolved path of the credential file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Return the stored credentials for the given registry URL.
    pub fn get_other_credentials(&self, server_url: &str) -> Result<Credential, CredStoreError> {
        let mut all = self.all_other_credentials()?;
        all.remove(server_url)
            .ok_or_else(|| CredStoreError::NotFound {
                server_url: server_url.to_string(),
            })
    }

    /// Store credentials under the registry URL carried by `creds`.
    ///
    /// The URL field is cleared inside the stored value because the record's
    /// map key already encodes it. A missing or unreadable prior file never
    /// blocks the write; the record is rebuilt from empty instead.
    pub fn set_other_credentials(&self, mut creds: Credential) -> Result<(), CredStoreError> {
        let server_url = std::mem::take(&mut creds.server_url);

        let mut record = self.load_record_or_empty();
        record.other_creds.insert(server_url.clone(), creds);
        self.save_record(&record)?;

        tracing::info!(%server_url, "stored third-party credentials");
        Ok(())
    }

    /// Remove the credentials for the given registry URL.
    ///
    /// Deleting from a store whose file does not exist is a no-op. A corrupt
    /// file surfaces its decode error rather than being silently discarded.
    pub fn delete_other_credentials(&self, server_url: &str) -> Result<(), CredStoreError> {
        let mut record = match self.load_record() {
            Ok(record) => record,
            Err(e) if e.is_file_missing() => return Ok(()),
            Err(e) => return Err(e),
        };

        // Skip the rewrite when there is nothing to remove.
        if record.other_creds.remove(server_url).is_some() {
            self.save_record(&record)?;
            tracing::info!(%server_url, "removed third-party credentials");
        }
        Ok(())
    }

    /// Return all third-party credentials keyed by registry URL.
    ///
    /// A missing file yields an empty map; any other read failure propagates.
    pub fn all_other_credentials(&self) -> Result<HashMap<String, Credential>, CredStoreError> {
        match self.load_record() {
            Ok(record) => Ok(record.other_creds),
            Err(e) if e.is_file_missing() => Ok(HashMap::new()),
            Err(e) => Err(e),
        }
    }

    /// Return the primary identity's auth from a prior sign-in.
    ///
    /// Fails with [`CredStoreError::NoPrimaryAuth`] when no primary identity
    /// is stored (including when the file does not exist at all).
    pub fn get_primary_auth(&self) -> Result<PrimaryAuth, CredStoreError> {
        let record = match self.load_record() {
            Ok(record) => record,
            Err(e) if e.is_file_missing() => return Err(CredStoreError::NoPrimaryAuth),
            Err(e) => return Err(e),
        };

        let tokens = record.primary_auth.ok_or(CredStoreError::NoPrimaryAuth)?;
        Ok(PrimaryAuth::new(PrimaryToken {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            expires_at: tokens.token_expiry,
        }))
    }

    /// Store the primary identity's tokens, replacing any previous ones.
    pub fn set_primary_auth(&self, token: &PrimaryToken) -> Result<(), CredStoreError> {
        let mut record = self.load_record_or_empty();
        record.primary_auth = Some(AuthTokens {
            access_token: token.access_token.clone(),
            refresh_token: token.refresh_token.clone(),
            token_expiry: token.expires_at,
        });
        self.save_record(&record)?;

        tracing::info!("stored primary auth tokens");
        Ok(())
    }

    /// Remove the primary identity's tokens.
    ///
    /// Deleting when nothing is stored is a no-op; a corrupt file surfaces
    /// its decode error.
    pub fn delete_primary_auth(&self) -> Result<(), CredStoreError> {
        let mut record = match self.load_record() {
            Ok(record) => record,
            Err(e) if e.is_file_missing() => return Ok(()),
            Err(e) => return Err(e),
        };

        // Skip the rewrite when there is nothing to remove.
        if record.primary_auth.take().is_some() {
            self.save_record(&record)?;
            tracing::info!("removed primary auth tokens");
        }
        Ok(())
    }

    fn load_record(&self) -> Result<CredentialRecord, CredStoreError> {
        let bytes = fs::read(&self.path)?;
        serde_json::from_slice(&bytes).map_err(|e| CredStoreError::Decode {
            path: self.path.clone(),
            source: e,
        })
    }

    /// Load the prior record for a write, falling back to an empty record on
    /// any failure. Writes are never blocked by a missing or corrupt file;
    /// last write wins and the store is recoverable.
    fn load_record_or_empty(&self) -> CredentialRecord {
        match self.load_record() {
            Ok(record) => record,
            Err(e) => {
                if !e.is_file_missing() {
                    tracing::warn!(error = %e, "discarding unreadable credential file");
                }
                CredentialRecord::default()
            }
        }
    }

    fn save_record(&self, record: &CredentialRecord) -> Result<(), CredStoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let bytes = serde_json::to_vec(record).map_err(CredStoreError::Encode)?;
        fs::write(&self.path, bytes)?;

        tracing::debug!(path = %self.path.display(), "rewrote credential file");
        Ok(())
    }
}
