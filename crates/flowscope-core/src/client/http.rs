use async_trait::async_trait;
use reqwest::{header, Client, Method, StatusCode, Url};
use serde_json::Value;
use tracing::debug;

use super::{ApiError, NifiApi};
use crate::config::{ServerConfig, DEFAULT_API_PREFIX};

const JSON_CONTENT_TYPE: &str = "application/json";

/// `reqwest` based NiFi REST client.
///
/// Attaches a bearer token and session cookies when configured. Responses
/// must be successful and carry a JSON content type.
pub struct HttpClient {
    base_url: String,
    token: Option<String>,
    cookies: Vec<(String, String)>,
    client: Client,
}

impl HttpClient {
    /// Creates a client for `server_url` using the default API prefix.
    ///
    /// # Arguments
    /// * `server_url` - The server URL (e.g., "https://nifi.example.com:8443")
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            base_url: join_base(&server_url.into(), DEFAULT_API_PREFIX),
            token: None,
            cookies: Vec::new(),
            client: Client::new(),
        }
    }

    /// Creates a client from server configuration.
    pub fn from_config(config: &ServerConfig) -> Result<Self, ApiError> {
        Url::parse(&config.url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", config.url, e)))?;

        let client = Client::builder()
            .danger_accept_invalid_certs(config.insecure)
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            base_url: join_base(&config.url, &config.api_prefix),
            token: config.token.clone(),
            cookies: Vec::new(),
            client,
        })
    }

    /// Sets the bearer token sent with every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Adds a session cookie sent with every request.
    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.push((name.into(), value.into()));
        self
    }

    /// Base URL including the API prefix.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn cookie_header(&self) -> String {
        self.cookies
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("; ")
    }

    async fn call(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<String, ApiError> {
        let url = self.url(path);
        debug!(%method, %url, "request");

        let mut req = self
            .client
            .request(method, &url)
            .header(header::CONTENT_TYPE, JSON_CONTENT_TYPE);

        if !query.is_empty() {
            req = req.query(query);
        }

        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }

        if !self.cookies.is_empty() {
            req = req.header(header::COOKIE, self.cookie_header());
        }

        if let Some(body) = body {
            req = req.json(body);
        }

        let response = req.send().await?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let text = response.text().await?;

        check_response(status, content_type, text)
    }
}

/// Accept only successful responses with a JSON body.
fn check_response(
    status: StatusCode,
    content_type: String,
    text: String,
) -> Result<String, ApiError> {
    if !status.is_success() {
        return Err(ApiError::Status {
            status: status.as_u16(),
            message: text,
        });
    }

    if !content_type.starts_with(JSON_CONTENT_TYPE) {
        return Err(ApiError::UnexpectedContentType {
            content_type,
            body: text,
        });
    }

    Ok(text)
}

#[async_trait]
impl NifiApi for HttpClient {
    async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<String, ApiError> {
        self.call(Method::GET, path, query, None).await
    }

    async fn post(&self, path: &str, body: Option<&Value>) -> Result<String, ApiError> {
        self.call(Method::POST, path, &[], body).await
    }

    async fn put(&self, path: &str, body: &Value) -> Result<String, ApiError> {
        self.call(Method::PUT, path, &[], Some(body)).await
    }

    async fn delete(&self, path: &str, query: &[(&str, &str)]) -> Result<String, ApiError> {
        self.call(Method::DELETE, path, query, None).await
    }
}

fn join_base(server_url: &str, api_prefix: &str) -> String {
    let prefix = api_prefix.trim_matches('/');
    let server = server_url.trim_end_matches('/');
    if prefix.is_empty() {
        server.to_string()
    } else {
        format!("{}/{}", server, prefix)
    }
}
