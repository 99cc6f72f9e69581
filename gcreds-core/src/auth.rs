//! Primary-identity auth and the deferred-refresh token source.
//!
//! [`PrimaryAuth`] wraps the tokens of a prior sign-in as read from the
//! credential file. Its [`TokenSource`] yields a currently valid access
//! token on demand: the cached token while it is still fresh, otherwise the
//! result of a refresh-token exchange against the provider's token endpoint.
//! A refresh updates the source's in-memory state only; it is never written
//! back to the credential file. Callers that want the refreshed token to
//! survive the process persist it explicitly via
//! [`CredentialStore::set_primary_auth`](crate::store::CredentialStore::set_primary_auth).

use chrono::{DateTime, Duration, Utc};
use oauth2::basic::BasicClient;
use oauth2::reqwest::http_client;
use oauth2::{AuthUrl, ClientId, ClientSecret, RefreshToken, TokenResponse, TokenUrl};
use thiserror::Error;

use crate::config;
use crate::secret::Secret;

/// Clock-skew leeway: a token this close to its expiry counts as expired.
const EXPIRY_LEEWAY_SECONDS: i64 = 10;

/// Error type for token-source operations.
#[derive(Debug, Error)]
pub enum TokenError {
    /// An endpoint URL failed to parse.
    #[error("gcreds/auth: invalid endpoint URL: {0}")]
    InvalidEndpoint(#[from] oauth2::url::ParseError),

    /// The refresh-token exchange failed.
    #[error("gcreds/auth: token refresh failed: {message}")]
    RefreshFailed { message: String },
}

/// The primary identity's token pair with its expiry.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimaryToken {
    /// The short-lived access token.
    pub access_token: Secret,

    /// The long-lived refresh token.
    pub refresh_token: Secret,

    /// Absolute expiry of the access token; `None` counts as expired.
    pub expires_at: Option<DateTime<Utc>>,
}

impl PrimaryToken {
    /// Create a token pair.
    pub fn new(
        access_token: impl Into<Secret>,
        refresh_token: impl Into<Secret>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            expires_at,
        }
    }

    /// Whether the access token can still be used without a refresh.
    ///
    /// A token with an unknown expiry is treated as already expired rather
    /// than as non-expiring, so stale files never suppress a refresh.
    pub fn is_valid(&self) -> bool {
        if self.access_token.is_empty() {
            return false;
        }
        match self.expires_at {
            None => false,
            Some(expiry) => expiry > Utc::now() + Duration::seconds(EXPIRY_LEEWAY_SECONDS),
        }
    }
}

/// Access to the tokens from a prior sign-in.
#[derive(Debug, Clone)]
pub struct PrimaryAuth {
    token: PrimaryToken,
}

impl PrimaryAuth {
    pub(crate) fn new(token: PrimaryToken) -> Self {
        Self { token }
    }

    /// The stored token pair, exactly as read from the credential file.
    pub fn token(&self) -> &PrimaryToken {
        &self.token
    }

    /// Build a [`TokenSource`] over the stored tokens, configured with the
    /// fixed client identity and the provider's standard token endpoint.
    pub fn token_source(&self) -> Result<TokenSource, TokenError> {
        TokenSource::new(self.token.clone())
    }
}

/// A capability object that yields a currently valid access token.
///
/// Holds the last-known token and refreshes it lazily when expired. The
/// refreshed token is cached in memory for subsequent calls on the same
/// source but is never persisted.
pub struct TokenSource {
    client: BasicClient,
    current: PrimaryToken,
}

impl TokenSource {
    /// Create a source refreshing against the provider's standard endpoint.
    pub fn new(initial: PrimaryToken) -> Result<Self, TokenError> {
        Self::with_token_endpoint(initial, config::OAUTH_TOKEN_URL)
    }

    /// Create a source refreshing against a specific token endpoint.
    pub fn with_token_endpoint(
        initial: PrimaryToken,
        token_url: impl Into<String>,
    ) -> Result<Self, TokenError> {
        let client = BasicClient::new(
            ClientId::new(config::OAUTH_CLIENT_ID.to_string()),
            Some(ClientSecret::new(
                config::OAUTH_CLIENT_NOT_SO_SECRET.to_string(),
            )),
            AuthUrl::new(config::OAUTH_AUTH_URL.to_string())?,
            Some(TokenUrl::new(token_url.into())?),
        );
        Ok(Self {
            client,
            current: initial,
        })
    }

    /// Return a currently valid token, refreshing it first if necessary.
    pub fn token(&mut self) -> Result<PrimaryToken, TokenError> {
        if self.current.is_valid() {
            tracing::debug!("using cached access token");
            return Ok(self.current.clone());
        }

        let refreshed = self.refresh()?;
        // In-memory cache only; the credential file keeps the stale token
        // until the caller stores the new one.
        self.current = refreshed.clone();
        Ok(refreshed)
    }

    fn refresh(&self) -> Result<PrimaryToken, TokenError> {
        tracing::info!("access token expired, performing refresh-token exchange");

        let refresh_token = RefreshToken::new(self.current.refresh_token.expose().to_string());
        let response = self
            .client
            .exchange_refresh_token(&refresh_token)
            .request(http_client)
            .map_err(|e| TokenError::RefreshFailed {
                message: e.to_string(),
            })?;

        let expires_at = response
            .expires_in()
            .and_then(|d| Duration::from_std(d).ok())
            .map(|d| Utc::now() + d);

        // Providers may rotate the refresh token; keep the old one otherwise.
        let refresh_token = response
            .refresh_token()
            .map(|t| Secret::new(t.secret().clone()))
            .unwrap_or_else(|| self.current.refresh_token.clone());

        Ok(PrimaryToken {
            access_token: Secret::new(response.access_token().secret().clone()),
            refresh_token,
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_validity() {
        let fresh = PrimaryToken::new("a1", "r1", Some(Utc::now() + Duration::hours(1)));
        assert!(fresh.is_valid());

        let expired = PrimaryToken::new("a1", "r1", Some(Utc::now() - Duration::hours(1)));
        assert!(!expired.is_valid());

        let no_expiry = PrimaryToken::new("a1", "r1", None);
        assert!(!no_expiry.is_valid());

        let empty_access = PrimaryToken::new("", "r1", Some(Utc::now() + Duration::hours(1)));
        assert!(!empty_access.is_valid());
    }

    #[test]
    fn test_token_within_leeway_is_invalid() {
        let nearly_expired =
            PrimaryToken::new("a1", "r1", Some(Utc::now() + Duration::seconds(5)));
        assert!(!nearly_expired.is_valid());
    }

    #[test]
    fn test_fresh_token_returned_without_network() {
        let token = PrimaryToken::new("a1", "r1", Some(Utc::now() + Duration::hours(1)));
        // An unroutable endpoint proves no request is made for a fresh token.
        let mut source =
            TokenSource::with_token_endpoint(token.clone(), "http://localhost:1/token").unwrap();

        let got = source.token().unwrap();
        assert_eq!(got, token);
    }

    #[test]
    fn test_invalid_endpoint_rejected() {
        let token = PrimaryToken::new("a1", "r1", None);
        let result = TokenSource::with_token_endpoint(token, "not a url");
        assert!(matches!(result, Err(TokenError::InvalidEndpoint(_))));
    }
}
