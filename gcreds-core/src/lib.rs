//! # gcreds Core
//!
//! Storage core for the gcreds Docker credential helper.
//!
//! One JSON file caches two credential kinds: the OAuth2 access/refresh
//! tokens of the signed-in primary identity, and an arbitrary set of opaque
//! third-party registry credentials keyed by server URL. Every operation
//! reads the whole file, mutates an in-memory copy, and rewrites the file;
//! there is no cache across calls and no partial-file access.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use gcreds_core::{Credential, CredentialStore};
//!
//! let store = CredentialStore::new()?;
//! store.set_other_credentials(Credential::new("https://registry.example.com", "bob", "s3cret"))?;
//!
//! let mut source = store.get_primary_auth()?.token_source()?;
//! let token = source.token()?; // refreshed on demand, never persisted here
//! ```

pub mod auth;
pub mod config;
pub mod credential;
pub mod error;
pub mod path;
pub mod record;
pub mod secret;
pub mod store;

// Re-export commonly used types at crate root
pub use auth::{PrimaryAuth, PrimaryToken, TokenError, TokenSource};
pub use credential::Credential;
pub use error::CredStoreError;
pub use record::{AuthTokens, CredentialRecord};
pub use secret::Secret;
pub use store::CredentialStore;
