//! Microsoft Graph API client
//!
//! Provides a typed HTTP client for the OneDrive endpoints CloudPush uses.
//! Handles authentication headers, path encoding and JSON deserialization.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use cloudpush_graph::client::GraphClient;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = GraphClient::new("access-token-here");
//! let saved = client
//!     .download_file("Documents/report.docx", Path::new("/tmp"))
//!     .await?;
//! println!("Saved to {}", saved.display());
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Deserialize;
use tracing::{debug, info, warn};
use url::Url;

use crate::GraphError;

/// Base URL for Microsoft Graph API v1.0
const GRAPH_BASE_URL: &str = "https://graph.microsoft.com/v1.0";

// ============================================================================
// Graph API response types
// ============================================================================

/// DriveItem fields needed to fetch a file's content
#[derive(Debug, Deserialize)]
struct DriveItemResponse {
    /// Item name
    name: String,
    /// Pre-authenticated, short-lived content URL (absent for folders)
    #[serde(rename = "@microsoft.graph.downloadUrl")]
    download_url: Option<String>,
}

// ============================================================================
// GraphClient
// ============================================================================

/// HTTP client for Microsoft Graph API calls
///
/// Wraps `reqwest::Client` with authentication headers and base URL
/// construction for the Microsoft Graph API.
pub struct GraphClient {
    /// The underlying HTTP client
    client: Client,
    /// Base URL for API requests
    base_url: String,
    /// Current OAuth2 access token
    access_token: String,
}

impl GraphClient {
    /// Creates a new GraphClient with the given access token
    ///
    /// # Arguments
    /// * `access_token` - A valid OAuth2 access token for Microsoft Graph
    pub fn new(access_token: impl Into<String>) -> Self {
        Self::with_base_url(access_token, GRAPH_BASE_URL)
    }

    /// Creates a new GraphClient with a custom base URL (useful for testing)
    ///
    /// # Arguments
    /// * `access_token` - A valid OAuth2 access token
    /// * `base_url` - Custom base URL for API requests
    pub fn with_base_url(access_token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            access_token: access_token.into(),
        }
    }

    /// Creates a bearer-authenticated request for an absolute Graph URL
    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .bearer_auth(&self.access_token)
    }

    /// Builds the `/me/drive/root:/{path}` URL for a drive-relative path
    ///
    /// Each path component is percent-encoded; leading, trailing and doubled
    /// slashes are ignored.
    pub fn item_url(&self, remote_path: &str) -> Result<Url, GraphError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| GraphError::InvalidResponse(format!("Invalid base URL: {e}")))?;

        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                GraphError::InvalidResponse(format!("Base URL cannot be a base: {}", self.base_url))
            })?;
            segments.pop_if_empty();
            segments.extend(["me", "drive", "root:"]);
            segments.extend(remote_path.split('/').filter(|c| !c.is_empty()));
        }

        Ok(url)
    }

    /// Downloads a file by its drive-relative path into `local_destination`
    ///
    /// 1. `GET /me/drive/root:/{path}` to resolve the item and its download URL
    /// 2. `GET` the pre-authenticated download URL
    /// 3. Writes the bytes to `local_destination/{item name}`
    ///
    /// # Returns
    /// The path of the written file
    ///
    /// # Errors
    /// - [`GraphError::NotFound`] (and other status variants) if the path does not resolve
    /// - [`GraphError::InvalidResponse`] if the item has no download URL (e.g. a folder)
    /// - [`GraphError::Io`] if the file cannot be written
    pub async fn download_file(
        &self,
        remote_path: &str,
        local_destination: &Path,
    ) -> Result<PathBuf, GraphError> {
        let url = self.item_url(remote_path)?;
        debug!(%url, "Resolving drive item");

        let response = self.request(Method::GET, url).send().await?;

        let status = response.status();
        info!(status = status.as_u16(), remote_path, "Status Code");

        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body = %body, "Drive item lookup failed");
            return Err(GraphError::from_status(status, body));
        }

        let item: DriveItemResponse = response
            .json()
            .await
            .map_err(|e| GraphError::InvalidResponse(format!("Failed to parse drive item: {e}")))?;

        let download_url = item.download_url.ok_or_else(|| {
            GraphError::InvalidResponse(format!("'{}' has no download URL", item.name))
        })?;
        debug!(download_url = %download_url, "Download URL");

        let file_name = Path::new(&item.name)
            .file_name()
            .ok_or_else(|| GraphError::InvalidResponse(format!("Invalid item name '{}'", item.name)))?
            .to_owned();

        let bytes = self
            .client
            .get(&download_url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        let target = local_destination.join(file_name);
        tokio::fs::write(&target, &bytes).await?;

        info!(
            path = %target.display(),
            bytes = bytes.len(),
            "Downloaded file"
        );
        Ok(target)
    }

    /// Uploads a local file into a OneDrive folder
    ///
    /// Not implemented for OneDrive yet; always returns
    /// [`GraphError::NotSupported`] so callers never mistake it for success.
    pub async fn upload_file(
        &self,
        onedrive_folder: &str,
        local_path: &Path,
    ) -> Result<(), GraphError> {
        warn!(
            folder = onedrive_folder,
            path = %local_path.display(),
            "OneDrive upload requested but not supported"
        );
        Err(GraphError::NotSupported("OneDrive upload".to_string()))
    }
}
