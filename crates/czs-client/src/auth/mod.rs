//! Authentication support: token storage and saved credentials.
//!
//! This module provides:
//! - `TokenStore`: the storage abstraction for the two session tokens,
//!   with in-memory and file-backed implementations
//! - `CredentialStore`: secure OS-level username/password storage via keyring

pub mod credentials;
pub mod store;

pub use credentials::CredentialStore;
pub use store::{FileTokenStore, MemoryTokenStore, TokenKind, TokenStore};
