//! Management Console HTTP Client
//!
//! A small, typed client for the Management Console REST API (`/api/v2`).
//!
//! The monitor and the CLI both talk to the console through this crate so
//! request building, authentication and error mapping live in one place.
//!
//! # Example
//!
//! ```no_run
//! use syncwatch_client::McClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = McClient::for_host("mc.example.com", 8443, "API-TOKEN")?;
//!
//!     for agent in client.list_agents().await? {
//!         println!("{} {} online={}", agent.id, agent.name, agent.online);
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
mod agents;
mod jobs;
mod runs;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use runs::RunSummary;

use reqwest::Client;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use syncwatch_core::dto::ApiErrorBody;
use tracing::debug;

/// Path prefix of every API endpoint
const API_PREFIX: &str = "/api/v2";

/// HTTP client for the Management Console API
///
/// Endpoints are grouped by resource:
/// - Agents (list, get)
/// - Jobs (list, get, create, delete)
/// - Runs (start, get, list per job, stop)
#[derive(Debug, Clone)]
pub struct McClient {
    /// Base URL of the API including the version prefix
    /// (e.g., "https://mc.example.com:8443/api/v2")
    base_url: String,
    /// HTTP client instance carrying the authorization header
    client: Client,
}

impl McClient {
    /// Create a new client for a console reachable at `address`
    ///
    /// # Arguments
    /// * `address` - Scheme, host and port of the console (e.g., "https://mc.example.com:8443")
    /// * `token` - API token issued by the console
    pub fn new(address: impl Into<String>, token: &str) -> Result<Self> {
        let client = Client::builder()
            .default_headers(auth_headers(token)?)
            .build()?;

        Ok(Self::with_client(address, client))
    }

    /// Create a client for `https://<host>:<port>`
    pub fn for_host(host: &str, port: u16, token: &str) -> Result<Self> {
        if host.is_empty() {
            return Err(ClientError::InvalidConfig("host cannot be empty".to_string()));
        }
        Self::new(format!("https://{}:{}", host, port), token)
    }

    /// Create a new client with a custom HTTP client
    ///
    /// The caller is responsible for the authorization header; use
    /// [`auth_headers`] to build it. This allows configuring timeouts,
    /// proxies and TLS settings.
    pub fn with_client(address: impl Into<String>, client: Client) -> Self {
        let address = address.into();
        Self {
            base_url: format!("{}{}", address.trim_end_matches('/'), API_PREFIX),
            client,
        }
    }

    /// Get the base URL of the API
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Check the status code and deserialize the JSON body
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let response = self.check_status(response).await?;

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Check the status code of a response whose body is not needed
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<()> {
        self.check_status(response).await.map(|_| ())
    }

    async fn check_status(&self, response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        let message = error_message(&body);
        debug!("Console answered {}: {}", status, message);

        if status.as_u16() == 401 {
            return Err(ClientError::Unauthorized(message));
        }
        Err(ClientError::api_error(status.as_u16(), message))
    }
}

/// Build the `Authorization: Token <token>` header set
pub fn auth_headers(token: &str) -> Result<HeaderMap> {
    if token.is_empty() {
        return Err(ClientError::InvalidConfig("token cannot be empty".to_string()));
    }

    let mut value = HeaderValue::from_str(&format!("Token {}", token))
        .map_err(|e| ClientError::InvalidConfig(format!("invalid token: {}", e)))?;
    value.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, value);
    Ok(headers)
}

/// Extract the console's `message` field, falling back to the raw body
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) if !parsed.message.is_empty() => parsed.message,
        _ => body.to_string(),
    }
}
