//! HTTP client for the RegLens backend: analysis, document repository,
//! compliance tasks, and PDF export.

use std::path::{Path, PathBuf};
use std::time::Duration;

use reglens_core::{Analysis, AnalysisResponse, Change, TaskBoard, TaskListResponse};
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// Fallback backend address when `REGLENS_API_URL` is not set.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Document analysis is backend-side LLM work; everything else answers fast
/// enough to go without an explicit timeout.
const ANALYZE_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("{message}")]
    Server { status: u16, message: String },
    #[error("unexpected response payload: {0}")]
    Payload(#[from] serde_json::Error),
    #[error("failed to read {path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// HTTP client for the RegLens backend endpoints.
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

/// `/health` response body.
#[derive(Debug, Deserialize)]
pub struct Health {
    #[serde(default)]
    pub status: String,
}

/// `/documents/list` response body: a bare array of filenames, or an object
/// keyed by `documents` or `files`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DocumentListResponse {
    Bare(Vec<String>),
    Keyed {
        #[serde(default)]
        documents: Vec<String>,
        #[serde(default)]
        files: Vec<String>,
    },
}

impl DocumentListResponse {
    fn into_names(self) -> Vec<String> {
        match self {
            Self::Bare(names) => names,
            Self::Keyed { documents, files } => {
                if documents.is_empty() {
                    files
                } else {
                    documents
                }
            }
        }
    }
}

#[derive(Serialize)]
struct GenerateTasksRequest<'a> {
    changes: &'a [Change],
}

#[derive(Serialize)]
struct ApproveRequest<'a> {
    approved_by: &'a str,
}

impl ApiClient {
    /// Create a new client for the given backend base URL.
    ///
    /// `base_url` should be like `http://localhost:8000`; trailing slashes
    /// are stripped to prevent double-slash paths.
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Upload two revisions of a regulation and return the normalized
    /// analysis. The only call with an explicit timeout (120s).
    pub async fn analyze_files(&self, old: &Path, new: &Path) -> Result<Analysis, ApiError> {
        let url = format!("{}/analyze", self.base_url);
        info!(url = %url, old = %old.display(), new = %new.display(), "uploading revisions for analysis");

        let form = Form::new()
            .part("old", file_part(old).await?)
            .part("new", file_part(new).await?);
        let resp = self
            .client
            .post(&url)
            .multipart(form)
            .timeout(ANALYZE_TIMEOUT)
            .send()
            .await?;
        let resp = ensure_success(resp).await?;

        let payload: AnalysisResponse = decode(resp).await?;
        let analysis = Analysis::from(payload);
        info!(changes = analysis.changes.len(), "analysis complete");
        Ok(analysis)
    }

    /// Fetch the stored analysis for a previously uploaded document.
    pub async fn analyze_stored(&self, filename: &str) -> Result<Analysis, ApiError> {
        let url = format!("{}/analyze/{}", self.base_url, filename);
        info!(url = %url, "fetching stored analysis");

        let resp = self.client.get(&url).send().await?;
        let resp = ensure_success(resp).await?;

        let payload: AnalysisResponse = decode(resp).await?;
        Ok(Analysis::from(payload))
    }

    /// Upload a document into the repository.
    pub async fn upload_document(
        &self,
        file: &Path,
        title: &str,
        version: &str,
    ) -> Result<(), ApiError> {
        let url = format!("{}/documents/upload", self.base_url);
        info!(url = %url, file = %file.display(), title, version, "uploading document");

        let form = Form::new()
            .part("file", file_part(file).await?)
            .text("title", title.to_string())
            .text("version", version.to_string());
        let resp = self.client.post(&url).multipart(form).send().await?;
        ensure_success(resp).await?;
        Ok(())
    }

    /// List the filenames in the document repository.
    pub async fn list_documents(&self) -> Result<Vec<String>, ApiError> {
        let url = format!("{}/documents/list", self.base_url);
        info!(url = %url, "listing documents");

        let resp = self.client.get(&url).send().await?;
        let resp = ensure_success(resp).await?;

        let payload: DocumentListResponse = decode(resp).await?;
        Ok(payload.into_names())
    }

    /// Ask the backend to derive compliance tasks from detected changes.
    ///
    /// Callers re-fetch the task list afterwards; there is no optimistic
    /// local mutation.
    pub async fn generate_tasks(&self, changes: &[Change]) -> Result<TaskBoard, ApiError> {
        let url = format!("{}/tasks/generate", self.base_url);
        info!(url = %url, count = changes.len(), "generating tasks from changes");

        let resp = self
            .client
            .post(&url)
            .json(&GenerateTasksRequest { changes })
            .send()
            .await?;
        let resp = ensure_success(resp).await?;

        let payload: TaskListResponse = decode(resp).await?;
        let board = TaskBoard::from_raw(payload.into_raw());
        info!(count = board.len(), "generated tasks");
        Ok(board)
    }

    /// Fetch the current task list as a normalized board.
    pub async fn get_tasks(&self) -> Result<TaskBoard, ApiError> {
        let url = format!("{}/tasks", self.base_url);
        info!(url = %url, "fetching tasks");

        let resp = self.client.get(&url).send().await?;
        let resp = ensure_success(resp).await?;

        let payload: TaskListResponse = decode(resp).await?;
        Ok(TaskBoard::from_raw(payload.into_raw()))
    }

    /// Approve a task, optionally recording who approved it.
    pub async fn approve_task(&self, id: &str, approved_by: Option<&str>) -> Result<(), ApiError> {
        let url = format!("{}/tasks/{}/approve", self.base_url, id);
        info!(url = %url, id, "approving task");

        let mut req = self.client.post(&url);
        if let Some(name) = approved_by {
            req = req.json(&ApproveRequest { approved_by: name });
        }
        let resp = req.send().await?;
        ensure_success(resp).await?;
        Ok(())
    }

    /// Reject a task.
    pub async fn reject_task(&self, id: &str) -> Result<(), ApiError> {
        let url = format!("{}/tasks/{}/reject", self.base_url, id);
        info!(url = %url, id, "rejecting task");

        let resp = self.client.post(&url).send().await?;
        ensure_success(resp).await?;
        Ok(())
    }

    /// Download the task sign-off report as PDF bytes.
    ///
    /// A non-2xx response is an error; no bytes are returned for callers to
    /// write out.
    pub async fn export_tasks_pdf(&self, regulation_name: &str) -> Result<Vec<u8>, ApiError> {
        let url = format!("{}/tasks/export", self.base_url);
        info!(url = %url, regulation_name, "exporting task report");

        let resp = self
            .client
            .get(&url)
            .query(&[("regulation_name", regulation_name)])
            .send()
            .await?;
        let resp = ensure_success(resp).await?;

        let bytes = resp.bytes().await?;
        info!(bytes = bytes.len(), "report downloaded");
        Ok(bytes.to_vec())
    }

    /// Backend liveness probe.
    pub async fn check_health(&self) -> Result<Health, ApiError> {
        let url = format!("{}/health", self.base_url);
        let resp = self.client.get(&url).send().await?;
        let resp = ensure_success(resp).await?;
        decode(resp).await
    }
}

// ── Response plumbing ──

/// Map a non-2xx response to a server error carrying the body text, with a
/// generic fallback when the body is empty or unreadable.
fn server_error(status: u16, body: String) -> ApiError {
    let message = if body.trim().is_empty() {
        format!("Backend error (HTTP {status})")
    } else {
        body
    };
    ApiError::Server { status, message }
}

async fn ensure_success(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(server_error(status.as_u16(), body))
}

async fn decode<T: serde::de::DeserializeOwned>(resp: reqwest::Response) -> Result<T, ApiError> {
    let body = resp.text().await?;
    Ok(serde_json::from_str(&body)?)
}

async fn file_part(path: &Path) -> Result<Part, ApiError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| ApiError::File {
        path: path.to_path_buf(),
        source,
    })?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    Ok(Part::bytes(bytes).file_name(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_trims_trailing_slash() {
        let client = ApiClient::new("http://localhost:8000/".into());
        assert_eq!(client.base_url, "http://localhost:8000");

        let client = ApiClient::new("http://localhost:8000///".into());
        assert_eq!(client.base_url, "http://localhost:8000");
    }

    #[test]
    fn server_error_carries_body_text() {
        let err = server_error(422, "old file is empty".into());
        assert_eq!(err.to_string(), "old file is empty");
        match err {
            ApiError::Server { status, .. } => assert_eq!(status, 422),
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn server_error_falls_back_on_empty_body() {
        let err = server_error(502, String::new());
        assert_eq!(err.to_string(), "Backend error (HTTP 502)");

        let err = server_error(500, "  \n".into());
        assert_eq!(err.to_string(), "Backend error (HTTP 500)");
    }

    #[test]
    fn document_list_accepts_all_observed_shapes() {
        let bare: DocumentListResponse =
            serde_json::from_str(r#"["a.pdf", "b.pdf"]"#).unwrap();
        assert_eq!(bare.into_names(), vec!["a.pdf", "b.pdf"]);

        let documents: DocumentListResponse =
            serde_json::from_str(r#"{"documents": ["a.pdf"]}"#).unwrap();
        assert_eq!(documents.into_names(), vec!["a.pdf"]);

        let files: DocumentListResponse =
            serde_json::from_str(r#"{"files": ["b.pdf"]}"#).unwrap();
        assert_eq!(files.into_names(), vec!["b.pdf"]);

        let empty: DocumentListResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.into_names().is_empty());
    }

    #[test]
    fn generate_request_uses_wire_field_names() {
        let changes = vec![Change {
            section: "3.2".into(),
            change_type: "modified".into(),
            before: Some("X".into()),
            after: Some("Y".into()),
            text: None,
        }];
        let body = serde_json::to_value(GenerateTasksRequest { changes: &changes }).unwrap();
        assert_eq!(body["changes"][0]["type"], "modified");
        assert_eq!(body["changes"][0]["before"], "X");
    }

    #[test]
    fn approve_request_serializes_reviewer() {
        let body = serde_json::to_value(ApproveRequest {
            approved_by: "compliance-officer",
        })
        .unwrap();
        assert_eq!(body["approved_by"], "compliance-officer");
    }

    #[test]
    fn health_tolerates_missing_status() {
        let health: Health = serde_json::from_str("{}").unwrap();
        assert_eq!(health.status, "");

        let health: Health = serde_json::from_str(r#"{"status": "ok"}"#).unwrap();
        assert_eq!(health.status, "ok");
    }
}
