//! Resolution of the credential file's OS-specific path.
//!
//! The file lives alongside the rest of the gcloud SDK configuration:
//! `%APPDATA%\gcloud\docker_credentials.json` on Windows and
//! `$HOME/.config/gcloud/docker_credentials.json` everywhere else. There is
//! no override; a store pointed elsewhere uses
//! [`CredentialStore::with_path`](crate::store::CredentialStore::with_path).

use std::path::PathBuf;

use crate::error::CredStoreError;

const CREDENTIAL_FILENAME: &str = "docker_credentials.json";

/// Resolve the full path of the credential file.
pub fn credential_path() -> Result<PathBuf, CredStoreError> {
    Ok(sdk_config_dir()?.join(CREDENTIAL_FILENAME))
}

/// The gcloud SDK configuration directory on the Windows family.
#[cfg(windows)]
fn sdk_config_dir() -> Result<PathBuf, CredStoreError> {
    let appdata = std::env::var_os("APPDATA").ok_or_else(|| CredStoreError::ConfigPath {
        message: "%APPDATA% is not set".to_string(),
    })?;
    Ok(PathBuf::from(appdata).join("gcloud"))
}

/// The gcloud SDK configuration directory on Unix-likes.
///
/// Home resolution goes through the platform user-account lookup with an
/// environment-variable fallback; if neither yields a home directory the
/// resolution fails hard.
#[cfg(not(windows))]
fn sdk_config_dir() -> Result<PathBuf, CredStoreError> {
    let user_dirs = directories::UserDirs::new().ok_or_else(|| CredStoreError::ConfigPath {
        message: "unable to get current user home directory: account lookup failed and $HOME is empty"
            .to_string(),
    })?;
    Ok(user_dirs.home_dir().join(".config").join("gcloud"))
}
