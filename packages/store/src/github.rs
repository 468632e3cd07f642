//! GitHub contents API client.
//!
//! The document is a file in a repository; `read` is a `GET
//! /repos/{owner}/{repo}/contents/{path}` returning base64 content plus
//! the blob sha, `write` is a `PUT` of the re-encoded document carrying
//! that sha as the compare-and-swap condition.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use mosaic_document::SiteDocument;
use serde::Deserialize;
use tracing::debug;

use crate::client::{DocumentStore, VersionToken};
use crate::credentials::Credentials;
use crate::errors::StoreError;

const DEFAULT_API_BASE: &str = "https://api.github.com";

pub struct GithubStore {
    client: reqwest::Client,
    api_base: String,
    creds: Credentials,
}

#[derive(Deserialize)]
struct ContentsResponse {
    content: String,
    sha: String,
}

#[derive(Deserialize)]
struct WriteResponse {
    content: WrittenBlob,
}

#[derive(Deserialize)]
struct WrittenBlob {
    sha: String,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}

impl GithubStore {
    pub fn new(creds: Credentials) -> Self {
        Self::with_api_base(creds, DEFAULT_API_BASE)
    }

    /// Point the client at a non-default API host (tests).
    pub fn with_api_base(creds: Credentials, api_base: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: api_base.into(),
            creds,
        }
    }

    fn contents_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.api_base, self.creds.owner, self.creds.repo, path
        )
    }

    fn auth_header(&self) -> String {
        format!("token {}", self.creds.token)
    }

    /// Map a non-success response to the error taxonomy, reading the
    /// API's `message` field verbatim when there is one.
    async fn error_for(path: &str, response: reqwest::Response) -> StoreError {
        let status = response.status().as_u16();
        let message = response
            .json::<ApiErrorBody>()
            .await
            .map(|body| body.message)
            .unwrap_or_else(|_| "no error message".to_string());

        match status {
            401 | 403 => StoreError::Auth,
            404 => StoreError::NotFound(path.to_string()),
            // The contents API reports a stale sha as 409, older
            // deployments as 422.
            409 | 422 => StoreError::Conflict(message),
            _ => StoreError::Api { status, message },
        }
    }
}

impl DocumentStore for GithubStore {
    async fn read(&self, path: &str) -> Result<(SiteDocument, VersionToken), StoreError> {
        let url = self.contents_url(path);
        debug!(%url, "reading document");

        let response = self
            .client
            .get(&url)
            .header("Authorization", self.auth_header())
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", "mosaic")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_for(path, response).await);
        }

        let body: ContentsResponse = response.json().await?;

        // GitHub wraps the base64 stream with newlines.
        let cleaned: String = body
            .content
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();
        let bytes = BASE64
            .decode(cleaned)
            .map_err(|e| StoreError::Decode(e.to_string()))?;
        let json =
            String::from_utf8(bytes).map_err(|e| StoreError::Decode(e.to_string()))?;

        let document = SiteDocument::from_json(&json)?;
        debug!(sha = %body.sha, "document loaded");
        Ok((document, VersionToken(body.sha)))
    }

    async fn write(
        &self,
        path: &str,
        document: &SiteDocument,
        token: &VersionToken,
    ) -> Result<VersionToken, StoreError> {
        let url = self.contents_url(path);
        let json = document.to_json()?;
        let encoded = BASE64.encode(json.as_bytes());
        let message = format!(
            "[mosaic] update {} at {}",
            path,
            chrono::Utc::now().to_rfc3339()
        );
        debug!(%url, sha = %token, "writing document");

        let response = self
            .client
            .put(&url)
            .header("Authorization", self.auth_header())
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", "mosaic")
            .json(&serde_json::json!({
                "message": message,
                "content": encoded,
                "sha": token.as_str(),
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_for(path, response).await);
        }

        let body: WriteResponse = response.json().await?;
        debug!(sha = %body.content.sha, "document written");
        Ok(VersionToken(body.content.sha))
    }
}
