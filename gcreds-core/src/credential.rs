//! Third-party registry credentials.
//!
//! [`Credential`] mirrors the wire shape used by the Docker credential-helper
//! protocol (`ServerURL`/`Username`/`Secret`). The store treats it as opaque
//! apart from its URL field, which is cleared before persistence because the
//! map key in the credential file already encodes it.

use serde::{Deserialize, Serialize};

use crate::secret::Secret;

/// An opaque username/secret pair associated with one registry server URL.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Credential {
    /// The registry server this credential applies to.
    ///
    /// Empty inside the stored record; the enclosing map key carries the URL.
    #[serde(rename = "ServerURL", default)]
    pub server_url: String,

    /// The username, or a sentinel understood by the registry.
    #[serde(rename = "Username", default)]
    pub username: String,

    /// The password or token.
    #[serde(rename = "Secret", default)]
    pub secret: Secret,
}

impl Credential {
    /// Create a credential for the given registry.
    pub fn new(
        server_url: impl Into<String>,
        username: impl Into<String>,
        secret: impl Into<Secret>,
    ) -> Self {
        Self {
            server_url: server_url.into(),
            username: username.into(),
            secret: secret.into(),
        }
    }
}
