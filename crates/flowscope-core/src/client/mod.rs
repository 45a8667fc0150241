//! Access to a NiFi server.
//!
//! [`NifiApi`] is the transport seam: it issues REST calls and hands back the
//! raw response body. [`HttpClient`] implements it over `reqwest`; tests use
//! in-memory implementations. [`Flow`] builds the status operations on top.

mod error;
mod flow;
mod http;

pub use error::ApiError;
pub use flow::{flatten_all, tree_all, Flow, RootGroup, StatusDocument};
pub use http::HttpClient;

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

/// Transport for the NiFi REST API.
///
/// Paths are relative to the API prefix, e.g. `/flow/process-groups/root/status`.
/// Implementations return the body of successful responses and an
/// [`ApiError`] for everything else.
#[async_trait]
pub trait NifiApi: Send + Sync {
    async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<String, ApiError>;

    async fn post(&self, path: &str, body: Option<&Value>) -> Result<String, ApiError>;

    async fn put(&self, path: &str, body: &Value) -> Result<String, ApiError>;

    async fn delete(&self, path: &str, query: &[(&str, &str)]) -> Result<String, ApiError>;
}

/// Blanket implementation for boxed trait objects.
#[async_trait]
impl NifiApi for Box<dyn NifiApi> {
    async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<String, ApiError> {
        (**self).get(path, query).await
    }

    async fn post(&self, path: &str, body: Option<&Value>) -> Result<String, ApiError> {
        (**self).post(path, body).await
    }

    async fn put(&self, path: &str, body: &Value) -> Result<String, ApiError> {
        (**self).put(path, body).await
    }

    async fn delete(&self, path: &str, query: &[(&str, &str)]) -> Result<String, ApiError> {
        (**self).delete(path, query).await
    }
}

/// Run state of a process group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Stopped,
}

impl RunState {
    /// Wire representation used by the API.
    pub fn as_str(&self) -> &'static str {
        match self {
            RunState::Running => "RUNNING",
            RunState::Stopped => "STOPPED",
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
