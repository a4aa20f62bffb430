use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{StatusCode, Url};
use roster_logging::{roster_debug, roster_warn};
use serde::de::DeserializeOwned;

use crate::scheduler::DEFAULT_POLL_INTERVAL;
use crate::{ClientError, Operation, StudentRecord, TaskStatus, UploadFile, UploadReceipt};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/api";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl ClientSettings {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

/// Request/response mapping for the import backend. No retries, no caching.
#[async_trait::async_trait]
pub trait JobClient: Send + Sync {
    async fn submit(&self, file: &UploadFile) -> Result<UploadReceipt, ClientError>;

    async fn fetch_status(&self, task_id: &str) -> Result<TaskStatus, ClientError>;

    async fn fetch_dataset(&self) -> Result<Vec<StudentRecord>, ClientError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestJobClient {
    client: reqwest::Client,
    base_url: Url,
}

impl ReqwestJobClient {
    pub fn new(settings: &ClientSettings) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ClientError::Unknown(err.to_string()))?;
        let base_url = Url::parse(&settings.base_url)
            .map_err(|err| ClientError::Unknown(format!("invalid base url: {err}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::Unknown(format!(
                "invalid base url: {}",
                settings.base_url
            )));
        }
        Ok(Self { client, base_url })
    }

    /// Appends percent-encoded path segments and a trailing `/` to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments).push("");
        }
        url
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        operation: Operation,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = request
            .send()
            .await
            .map_err(|err| normalize(operation, Failure::Request(err)))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| normalize(operation, Failure::Request(err)))?;
        roster_debug!("{} -> {} ({} bytes)", operation, status, body.len());

        if !status.is_success() {
            return Err(normalize(operation, Failure::Status { status, body: &body[..] }));
        }
        serde_json::from_slice(&body).map_err(|err| normalize(operation, Failure::Decode(err)))
    }
}

#[async_trait::async_trait]
impl JobClient for ReqwestJobClient {
    async fn submit(&self, file: &UploadFile) -> Result<UploadReceipt, ClientError> {
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.file_name.clone())
            .mime_str("text/csv")
            .map_err(|err| normalize(Operation::Submit, Failure::Request(err)))?;
        let form = Form::new().part("file", part);
        let request = self
            .client
            .post(self.endpoint(&["upload-students-csv"]))
            .multipart(form);
        self.execute(Operation::Submit, request).await
    }

    async fn fetch_status(&self, task_id: &str) -> Result<TaskStatus, ClientError> {
        let request = self.client.get(self.endpoint(&["task-status", task_id]));
        self.execute(Operation::FetchStatus, request).await
    }

    async fn fetch_dataset(&self) -> Result<Vec<StudentRecord>, ClientError> {
        let request = self.client.get(self.endpoint(&["students"]));
        self.execute(Operation::FetchDataset, request).await
    }
}

enum Failure<'a> {
    Request(reqwest::Error),
    Status { status: StatusCode, body: &'a [u8] },
    Decode(serde_json::Error),
}

/// The single place where raw failures become `ClientError`s.
fn normalize(operation: Operation, failure: Failure<'_>) -> ClientError {
    let fallback = operation.fallback_message().to_string();
    match failure {
        Failure::Request(err) => {
            roster_warn!("{} request failed: {}", operation, err);
            if err.is_builder() {
                ClientError::Unknown(fallback)
            } else {
                ClientError::Transport(fallback)
            }
        }
        Failure::Status { status, body } => {
            let message = backend_message(body).unwrap_or(fallback);
            roster_warn!("{} rejected with {}: {}", operation, status, message);
            if status.is_client_error() {
                ClientError::Validation(message)
            } else if status.is_server_error() {
                ClientError::Transport(message)
            } else {
                ClientError::Unknown(message)
            }
        }
        Failure::Decode(err) => {
            roster_warn!("{} returned an unexpected body: {}", operation, err);
            if err.is_data() {
                ClientError::Unknown(fallback)
            } else {
                ClientError::Transport(fallback)
            }
        }
    }
}

/// Extracts `detail`, then `error`, from a structured error body.
fn backend_message(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    ["detail", "error"].iter().find_map(|key| {
        value
            .get(key)
            .and_then(serde_json::Value::as_str)
            .filter(|message| !message.is_empty())
            .map(ToOwned::to_owned)
    })
}
