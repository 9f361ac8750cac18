//! Token storage for the two session tokens.
//!
//! Both tokens live behind an injected trait so the client can run against an
//! in-memory map in tests or a file on disk in a desktop target. At most one
//! token of each kind is held at a time; tokens carry no expiry and are
//! removed only by an explicit clear.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Token file name in the storage directory
const TOKEN_FILE: &str = "tokens.json";

/// The two session tokens the client manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Session credential for the first-party web service.
    Web,
    /// Bearer credential for the separate API service.
    Api,
}

impl TokenKind {
    /// Stable name for this token in persisted storage.
    pub fn storage_name(&self) -> &'static str {
        match self {
            TokenKind::Web => "web_token",
            TokenKind::Api => "api_token",
        }
    }
}

/// Storage abstraction for session tokens.
///
/// Implementations must be `Send + Sync`; the client reads the API token on
/// every API call and writes both tokens during login/logout.
pub trait TokenStore: Send + Sync {
    /// Current value of the token, if one is set.
    fn get(&self, kind: TokenKind) -> Result<Option<String>>;

    /// Replace the token, dropping any previous value.
    fn set(&self, kind: TokenKind, value: &str) -> Result<()>;

    /// Remove the token. Clearing an absent token is not an error.
    fn clear(&self, kind: TokenKind) -> Result<()>;
}

/// In-process token storage, the default for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: Mutex<HashMap<TokenKind, String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn locked(&self) -> Result<std::sync::MutexGuard<'_, HashMap<TokenKind, String>>> {
        self.tokens
            .lock()
            .map_err(|_| anyhow::anyhow!("Token store lock poisoned"))
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, kind: TokenKind) -> Result<Option<String>> {
        Ok(self.locked()?.get(&kind).cloned())
    }

    fn set(&self, kind: TokenKind, value: &str) -> Result<()> {
        self.locked()?.insert(kind, value.to_string());
        Ok(())
    }

    fn clear(&self, kind: TokenKind) -> Result<()> {
        self.locked()?.remove(&kind);
        Ok(())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct TokenFile {
    #[serde(default)]
    web_token: Option<String>,
    #[serde(default)]
    api_token: Option<String>,
    #[serde(default)]
    saved_at: Option<DateTime<Utc>>,
}

impl TokenFile {
    fn slot(&mut self, kind: TokenKind) -> &mut Option<String> {
        match kind {
            TokenKind::Web => &mut self.web_token,
            TokenKind::Api => &mut self.api_token,
        }
    }
}

/// File-backed token storage under a caller-supplied directory.
///
/// The file is re-read on every access so that clearing by another process is
/// observed, mirroring how cookie storage behaves. `saved_at` is recorded for
/// diagnostics only; no expiry logic is applied.
pub struct FileTokenStore {
    dir: PathBuf,
}

impl FileTokenStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Store tokens under the platform cache directory.
    pub fn default_location() -> Result<Self> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(Self::new(cache_dir.join("czs-client")))
    }

    fn token_path(&self) -> PathBuf {
        self.dir.join(TOKEN_FILE)
    }

    fn read(&self) -> Result<TokenFile> {
        let path = self.token_path();
        if !path.exists() {
            return Ok(TokenFile::default());
        }
        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read token file {}", path.display()))?;
        serde_json::from_str(&contents).context("Failed to parse token file")
    }

    fn write(&self, mut file: TokenFile) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create token directory {}", self.dir.display()))?;
        file.saved_at = Some(Utc::now());
        let contents = serde_json::to_string_pretty(&file)?;
        std::fs::write(self.token_path(), contents).context("Failed to write token file")?;
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self, kind: TokenKind) -> Result<Option<String>> {
        let mut file = self.read()?;
        Ok(file.slot(kind).take())
    }

    fn set(&self, kind: TokenKind, value: &str) -> Result<()> {
        let mut file = self.read()?;
        *file.slot(kind) = Some(value.to_string());
        self.write(file)
    }

    fn clear(&self, kind: TokenKind) -> Result<()> {
        let mut file = self.read()?;
        if file.slot(kind).take().is_some() {
            self.write(file)?;
        }
        Ok(())
    }
}
