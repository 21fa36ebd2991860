//! Packaging forge spec file downloads
//!
//! This module provides:
//! - Shared HTTP client with timeout, User-Agent and simple retry backoff
//! - Spec file download from `<base>/<package>/raw/<branch>/<package>.spec`

use crate::error::SpecError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default timeout for HTTP requests (30 seconds)
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default User-Agent header
const DEFAULT_USER_AGENT: &str = concat!("specup/", env!("CARGO_PKG_VERSION"));

/// Maximum number of retry attempts for transient failures
const MAX_RETRIES: u32 = 3;

/// Base delay for exponential backoff (in milliseconds)
const BASE_DELAY_MS: u64 = 100;

/// Trait for fetching a package's spec file into a local directory
#[async_trait]
pub trait SpecFetcher: Send + Sync {
    /// Download the spec file for `package` into `dest_dir`
    ///
    /// Returns the path of the written file.
    async fn fetch_spec(&self, package: &str, dest_dir: &Path) -> Result<PathBuf, SpecError>;
}

/// Client for downloading spec files from the packaging forge
#[derive(Clone)]
pub struct ForgeClient {
    client: reqwest::Client,
    base_url: String,
    branch: String,
}

impl ForgeClient {
    /// Create a client for the given forge base URL and branch
    pub fn new(base_url: impl Into<String>, branch: impl Into<String>) -> Result<Self, SpecError> {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .user_agent(DEFAULT_USER_AGENT)
            .build()
            .map_err(|e| SpecError::client_error(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            branch: branch.into(),
        })
    }

    /// URL of a package's raw spec file on the forge
    pub fn spec_url(&self, package: &str) -> String {
        format!(
            "{}/{}/raw/{}/{}.spec",
            self.base_url, package, self.branch, package
        )
    }
}

#[async_trait]
impl SpecFetcher for ForgeClient {
    /// Transient request errors are retried with exponential backoff; a
    /// missing spec (HTTP 404) is not.
    async fn fetch_spec(&self, package: &str, dest_dir: &Path) -> Result<PathBuf, SpecError> {
        let url = self.spec_url(package);
        let mut delay = BASE_DELAY_MS;
        let mut last_error = None;

        for attempt in 0..=MAX_RETRIES {
            match self.client.get(&url).send().await {
                Ok(response) => {
                    if response.status() == reqwest::StatusCode::NOT_FOUND {
                        return Err(SpecError::fetch_error(
                            package,
                            format!("{} returned 404", url),
                        ));
                    }
                    if !response.status().is_success() {
                        last_error = Some(SpecError::fetch_error(
                            package,
                            format!("{} returned HTTP {}", url, response.status()),
                        ));
                    } else {
                        let body = response.text().await.map_err(|e| {
                            SpecError::fetch_error(package, format!("read body: {}", e))
                        })?;
                        let dest = dest_dir.join(format!("{}.spec", package));
                        std::fs::write(&dest, body).map_err(|e| {
                            SpecError::fetch_error(
                                package,
                                format!("write {}: {}", dest.display(), e),
                            )
                        })?;
                        return Ok(dest);
                    }
                }
                Err(e) => {
                    last_error = Some(SpecError::fetch_error(package, e.to_string()));
                }
            }

            if attempt < MAX_RETRIES {
                tokio::time::sleep(Duration::from_millis(delay)).await;
                delay *= 2;
            }
        }

        Err(last_error
            .unwrap_or_else(|| SpecError::fetch_error(package, "request failed".to_string())))
    }
}
