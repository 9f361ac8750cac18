//! czs-client - client library for the Clip Zip Ship services.
//!
//! Clip Zip Ship exposes two backends: a web (session) service protected by a
//! CSRF token and an API (resource) service protected by a bearer token. This
//! crate wraps both behind [`CzsClient`]: two generic dispatchers that attach
//! the right authentication header and normalize error handling, and a set of
//! named operations (login, logout, user CRUD, metadata/extent/collection
//! queries) that delegate to them with fixed verbs and URL templates.
//!
//! Tokens live behind the injected [`TokenStore`] abstraction; configuration
//! (base URLs, CSRF token, language) is an explicit [`Config`] passed at
//! construction. This layer performs no business logic and no validation.

pub mod api;
pub mod auth;
pub mod config;
pub mod models;

pub use api::{report_failure, ApiError, CzsClient};
pub use auth::{CredentialStore, FileTokenStore, MemoryTokenStore, TokenKind, TokenStore};
pub use config::{Config, Language};
pub use models::{Credentials, DbConnection, ErrorDetail, TokenResponse};
