//! The on-disk credential record.
//!
//! The entire credential file is one serialized [`CredentialRecord`]: the
//! primary identity's OAuth2 tokens under `"gcrCreds"` and the third-party
//! registry credentials under `"otherCreds"`. Absent optional fields are
//! omitted from the encoding entirely rather than written as null
//! placeholders, and `decode(encode(r)) == r` holds for every record this
//! crate constructs.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::credential::Credential;
use crate::secret::Secret;

/// The stored OAuth2 tokens for the primary identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthTokens {
    /// The short-lived access token.
    pub access_token: Secret,

    /// The long-lived refresh token.
    pub refresh_token: Secret,

    /// Absolute expiry instant of the access token.
    ///
    /// Absent means the expiry is unknown and the token is treated as
    /// already expired for refresh purposes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_expiry: Option<DateTime<Utc>>,
}

/// The entire content of the credential file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CredentialRecord {
    /// Tokens for the signed-in primary identity, if any.
    #[serde(rename = "gcrCreds", default, skip_serializing_if = "Option::is_none")]
    pub primary_auth: Option<AuthTokens>,

    /// Third-party credentials keyed by registry server URL.
    ///
    /// Omitted from the encoding when empty, so a record whose last entry was
    /// removed round-trips to the same value as one that never had any.
    #[serde(rename = "otherCreds", default, skip_serializing_if = "HashMap::is_empty")]
    pub other_creds: HashMap<String, Credential>,
}
