//! Wire types shared by the web and API services.
//!
//! - `Credentials`: username/password pair sent to both login endpoints
//! - `TokenResponse`: the access token returned by either login
//! - `ErrorDetail`: the structured error body `{detail, detail_fr?}`
//! - `DbConnection`: database descriptor for the extent query

use serde::{Deserialize, Serialize};

/// Login credentials. The same pair is posted to the web service and,
/// once the web login succeeds, to the API service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Successful login response from either service.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
}

/// Structured error body returned by both services on failure.
/// `detail_fr` carries the French variant when the server has one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub detail: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail_fr: Option<String>,
}

/// Connection descriptor for the database backing a table, posted with
/// the extent query so the API can reach the table's source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbConnection {
    #[serde(rename = "db_host")]
    pub host: String,
    #[serde(rename = "db_port")]
    pub port: u16,
    #[serde(rename = "db_name")]
    pub name: String,
    #[serde(rename = "db_user")]
    pub user: String,
    #[serde(rename = "db_password")]
    pub password: String,
}
