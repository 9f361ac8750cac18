use anyhow::{Context, Result};
use keyring::Entry;

use crate::models::Credentials;

const SERVICE_NAME: &str = "czs-client";

/// Secure storage for saved login credentials, backed by the OS keychain.
///
/// The client never consults this on its own; consumers use it to offer
/// remembered logins (see [`crate::api::CzsClient::login_saved`]).
pub struct CredentialStore;

impl CredentialStore {
    fn entry(username: &str) -> Result<Entry> {
        Entry::new(SERVICE_NAME, username).context("Failed to create keyring entry")
    }

    /// Store a credential pair in the OS keychain, keyed by username.
    pub fn save(credentials: &Credentials) -> Result<()> {
        Self::entry(&credentials.username)?
            .set_password(&credentials.password)
            .context("Failed to store password in keychain")
    }

    /// Load the credential pair saved for a username.
    pub fn load(username: &str) -> Result<Credentials> {
        let password = Self::entry(username)?
            .get_password()
            .context("Failed to retrieve password from keychain")?;
        Ok(Credentials::new(username, password))
    }

    /// Delete the saved credentials for a username.
    pub fn delete(username: &str) -> Result<()> {
        Self::entry(username)?
            .delete_credential()
            .context("Failed to delete credential from keychain")
    }

    /// Check if credentials exist for a username.
    pub fn has_credentials(username: &str) -> bool {
        Self::entry(username)
            .map(|e| e.get_password().is_ok())
            .unwrap_or(false)
    }
}
