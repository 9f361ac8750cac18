//! Client for the Clip Zip Ship web and API services.
//!
//! Two dispatchers carry every request: `call_web` targets the session (web)
//! service and signs requests with the configured CSRF token, `call_api`
//! targets the resource (API) service and signs with the stored bearer token.
//! The named operations below them are thin verb+path+payload mappings.

use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::{header, Client, Method};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::auth::{CredentialStore, TokenKind, TokenStore};
use crate::config::Config;
use crate::models::{Credentials, DbConnection, TokenResponse};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Content type sent with every request that carries a body.
const CONTENT_TYPE_JSON: &str = "application/json; charset=utf-8";

/// Anti-forgery header expected by the web service on state-changing calls.
const CSRF_HEADER: &str = "X-CSRFToken";

/// Which of the two backend services a request targets.
#[derive(Debug, Clone, Copy)]
enum Service {
    Web,
    Api,
}

/// Client for both Clip Zip Ship services.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct CzsClient {
    http: Client,
    config: Config,
    tokens: Arc<dyn TokenStore>,
}

impl CzsClient {
    /// Create a new client over the given configuration and token storage.
    pub fn new(config: Config, tokens: Arc<dyn TokenStore>) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http,
            config,
            tokens,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // ===== Dispatch =====

    fn headers_for(&self, service: Service) -> Result<header::HeaderMap> {
        let mut headers = header::HeaderMap::new();
        match service {
            Service::Web => {
                if let Some(ref token) = self.config.csrf_token {
                    headers.insert(CSRF_HEADER, header::HeaderValue::from_str(token)?);
                }
            }
            Service::Api => {
                if let Some(token) = self.tokens.get(TokenKind::Api)? {
                    headers.insert(
                        header::AUTHORIZATION,
                        header::HeaderValue::from_str(&format!("Bearer {}", token))?,
                    );
                }
            }
        }
        Ok(headers)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        service: Service,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<reqwest::Response> {
        let base = match service {
            Service::Web => &self.config.web_base_url,
            Service::Api => &self.config.api_base_url,
        };
        let url = format!("{}{}", base, path);
        debug!(method = %method, url = %url, "Dispatching request");

        let mut request = self
            .http
            .request(method, &url)
            .headers(self.headers_for(service)?);
        if let Some(body) = body {
            let payload =
                serde_json::to_vec(body).context("Failed to serialize request body")?;
            request = request
                .header(header::CONTENT_TYPE, CONTENT_TYPE_JSON)
                .body(payload);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))?;

        Self::check_response(response).await
    }

    /// Parse a successful response into the expected type.
    async fn parse_json<T: DeserializeOwned>(response: reqwest::Response, path: &str) -> Result<T> {
        let text = response
            .text()
            .await
            .with_context(|| format!("Failed to read response body from {}", path))?;
        serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(format!("{}: {}", path, e)).into())
    }

    /// Parse a successful response leniently; endpoints with an opaque or
    /// empty body yield `Value::Null` rather than a parse failure.
    async fn parse_value(response: reqwest::Response, path: &str) -> Result<Value> {
        let text = response
            .text()
            .await
            .with_context(|| format!("Failed to read response body from {}", path))?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(format!("{}: {}", path, e)).into())
    }

    /// Issue a request against the web service, attaching the CSRF header
    /// when one is configured.
    pub async fn call_web<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.send(Service::Web, method, path, body).await?;
        Self::parse_json(response, path).await
    }

    /// Issue a request against the API service, attaching a bearer token
    /// when the store holds one.
    pub async fn call_api<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.send(Service::Api, method, path, body).await?;
        Self::parse_json(response, path).await
    }

    // ===== Session =====

    /// Log in against both services and return the navigation target.
    ///
    /// The web login runs first and its token is stored; only then is the API
    /// login attempted with the same credentials. A failure at either phase
    /// aborts the sequence, so a web failure leaves both tokens unset.
    /// The target is `redirect_uri` when supplied (a caller returning from an
    /// expired page), otherwise the language-specific home route.
    pub async fn login(
        &self,
        credentials: &Credentials,
        redirect_uri: Option<&str>,
    ) -> Result<String> {
        let web: TokenResponse = self
            .call_web(Method::POST, "/login", Some(credentials))
            .await
            .context("Web login failed")?;
        self.tokens.set(TokenKind::Web, &web.access_token)?;

        let api: TokenResponse = self
            .call_api(Method::POST, "/login", Some(credentials))
            .await
            .context("API login failed")?;
        self.tokens.set(TokenKind::Api, &api.access_token)?;

        Ok(match redirect_uri {
            Some(uri) => uri.to_string(),
            None => self.config.language.home_route().to_string(),
        })
    }

    /// Log in with credentials previously saved in the OS keychain.
    pub async fn login_saved(&self, username: &str, redirect_uri: Option<&str>) -> Result<String> {
        let credentials = CredentialStore::load(username)?;
        self.login(&credentials, redirect_uri).await
    }

    /// Log out of both services and return the home route.
    ///
    /// The web token is dropped before the server call; if the API logout
    /// fails, the API token remains while the web token is already gone.
    pub async fn logout(&self) -> Result<String> {
        self.tokens.clear(TokenKind::Web)?;

        self.send(Service::Api, Method::DELETE, "/logout", None::<&Value>)
            .await
            .context("API logout failed")?;
        self.tokens.clear(TokenKind::Api)?;

        Ok(self.config.language.home_route().to_string())
    }

    // ===== Users =====

    pub async fn create_user<B: Serialize + ?Sized>(&self, fields: &B) -> Result<Value> {
        let response = self.send(Service::Api, Method::POST, "/user", Some(fields)).await?;
        Self::parse_value(response, "/user").await
    }

    pub async fn update_user<B: Serialize + ?Sized>(
        &self,
        username: &str,
        fields: &B,
    ) -> Result<Value> {
        let path = format!("/user/{}", username);
        let response = self.send(Service::Api, Method::PATCH, &path, Some(fields)).await?;
        Self::parse_value(response, &path).await
    }

    pub async fn delete_user(&self, username: &str) -> Result<Value> {
        let path = format!("/user/{}", username);
        let response = self.send(Service::Api, Method::DELETE, &path, None::<&Value>).await?;
        Self::parse_value(response, &path).await
    }

    // ===== Clip Zip Ship Admin =====

    /// Fetch the metadata record for a collection by UUID.
    pub async fn fetch_metadata(&self, uuid: &str) -> Result<Value> {
        let path = format!("/metadata/{}", uuid);
        let response = self.send(Service::Api, Method::GET, &path, None::<&Value>).await?;
        Self::parse_value(response, &path).await
    }

    /// Query the extent of a table, posting the connection descriptor for the
    /// database that backs it.
    pub async fn fetch_extent(
        &self,
        schema: &str,
        table: &str,
        crs: &str,
        db: &DbConnection,
    ) -> Result<Value> {
        let path = format!("/extent/{}/{}/{}", schema, table, crs);
        let response = self.send(Service::Api, Method::POST, &path, Some(db)).await?;
        Self::parse_value(response, &path).await
    }

    /// Query the extent of a table by name alone. Older API deployments serve
    /// this surface instead of the connection-descriptor one.
    pub async fn fetch_extent_by_name(&self, table: &str) -> Result<Value> {
        let path = format!("/extent/{}", table);
        let response = self.send(Service::Api, Method::GET, &path, None::<&Value>).await?;
        Self::parse_value(response, &path).await
    }

    pub async fn add_parent<B: Serialize + ?Sized>(&self, payload: &B) -> Result<Value> {
        let response = self.send(Service::Api, Method::PUT, "/parents", Some(payload)).await?;
        Self::parse_value(response, "/parents").await
    }

    pub async fn add_collection<B: Serialize + ?Sized>(&self, payload: &B) -> Result<Value> {
        let response = self
            .send(Service::Api, Method::PUT, "/collections", Some(payload))
            .await?;
        Self::parse_value(response, "/collections").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MemoryTokenStore;

    fn test_client(csrf: Option<&str>) -> CzsClient {
        let mut config = Config::new("http://web.local", "http://api.local");
        if let Some(token) = csrf {
            config = config.with_csrf_token(token);
        }
        CzsClient::new(config, Arc::new(MemoryTokenStore::new())).unwrap()
    }

    #[test]
    fn test_web_headers_follow_csrf_config() {
        let client = test_client(Some("csrf-123"));
        let headers = client.headers_for(Service::Web).unwrap();
        assert_eq!(headers.get(CSRF_HEADER).unwrap(), "csrf-123");

        let client = test_client(None);
        let headers = client.headers_for(Service::Web).unwrap();
        assert!(headers.get(CSRF_HEADER).is_none());
    }

    #[test]
    fn test_api_headers_follow_token_store() {
        let client = test_client(None);

        let headers = client.headers_for(Service::Api).unwrap();
        assert!(headers.get(header::AUTHORIZATION).is_none());

        client.tokens.set(TokenKind::Api, "tok").unwrap();
        let headers = client.headers_for(Service::Api).unwrap();
        assert_eq!(headers.get(header::AUTHORIZATION).unwrap(), "Bearer tok");
    }

    #[test]
    fn test_csrf_token_never_sent_to_api() {
        let client = test_client(Some("csrf-123"));
        let headers = client.headers_for(Service::Api).unwrap();
        assert!(headers.get(CSRF_HEADER).is_none());
    }
}
