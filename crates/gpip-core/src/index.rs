//! Package index metadata (`GET {index}/{name}/json`).

use std::time::Duration;

use anyhow::Context;
use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::debug;

const USER_AGENT: &str = concat!("gpip/", env!("CARGO_PKG_VERSION"));

/// Distribution classification PyPI uses for source archives.
pub const SOURCE_PYTHON_VERSION: &str = "source";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectMetadata {
    #[serde(default)]
    pub urls: Vec<DistributionFile>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DistributionFile {
    pub url: String,
    #[serde(default)]
    pub python_version: Option<String>,
}

impl ProjectMetadata {
    /// First distribution classified as `source`; later entries are never
    /// considered, whatever their version or type.
    #[must_use]
    pub fn source_url(&self) -> Option<&str> {
        self.urls
            .iter()
            .find(|file| file.python_version.as_deref() == Some(SOURCE_PYTHON_VERSION))
            .map(|file| file.url.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("failed to query {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("invalid metadata from {url}: {source}")]
    Malformed {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl IndexError {
    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            IndexError::Network { .. } => "network",
            IndexError::Status { .. } => "http-status",
            IndexError::Malformed { .. } => "malformed-response",
        }
    }
}

/// Shared client for index lookups and archive downloads. Proxy settings come
/// from the environment; only connecting is bounded by `connect_timeout`.
pub(crate) fn build_http_client(connect_timeout: Duration) -> anyhow::Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(connect_timeout)
        .timeout(None::<Duration>)
        .build()
        .context("failed to build http client")
}

/// Fetches and decodes the JSON metadata document at `url` within `timeout`.
pub(crate) fn fetch_project(
    client: &Client,
    url: &str,
    timeout: Duration,
) -> Result<ProjectMetadata, IndexError> {
    debug!(%url, "querying package index");
    let response = client
        .get(url)
        .timeout(timeout)
        .send()
        .map_err(|source| IndexError::Network {
            url: url.to_string(),
            source,
        })?;
    let status = response.status();
    if !status.is_success() {
        return Err(IndexError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    let body = response.text().map_err(|source| IndexError::Network {
        url: url.to_string(),
        source,
    })?;
    serde_json::from_str(&body).map_err(|source| IndexError::Malformed {
        url: url.to_string(),
        source,
    })
}

/// Client that ignores proxy variables, for talking to local test servers.
#[cfg(test)]
pub(crate) fn direct_client() -> Client {
    Client::builder()
        .user_agent(USER_AGENT)
        .no_proxy()
        .build()
        .expect("client")
}
