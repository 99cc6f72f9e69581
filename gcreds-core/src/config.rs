//! Fixed OAuth2 client identity and endpoint configuration.
//!
//! These constants identify the credential helper itself to the provider.
//! They are not user-configurable; the helper is registered as a public
//! installed application, so the "secret" is not confidential.

/// OAuth2 client ID of the credential helper.
pub const OAUTH_CLIENT_ID: &str =
    "99426463878-o7n0bshgue20tdpm25q4f01ibs8kkp7s.apps.googleusercontent.com";

/// OAuth2 client secret of the credential helper.
///
/// Installed-application flows treat this as public knowledge; it must still
/// be sent with token-endpoint requests.
pub const OAUTH_CLIENT_NOT_SO_SECRET: &str = "HpVi8cnKx8AAkddzaNrSWmS8";

/// Scopes requested during the initial authorization exchange.
pub const OAUTH_SCOPES: &[&str] = &["https://www.googleapis.com/auth/cloud-platform"];

/// Authorization endpoint of the provider.
pub const OAUTH_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/auth";

/// Token endpoint of the provider, used for refresh-token exchanges.
pub const OAUTH_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
