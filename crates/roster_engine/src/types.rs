use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type TaskId = String;

/// A file ready to be sent to the import endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for UploadFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadFile")
            .field("file_name", &self.file_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadReceipt {
    pub task_id: TaskId,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TaskStatus {
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub reg_no: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub department: String,
    pub level: String,
}

/// The three backend operations, used to pick fallback messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Submit,
    FetchStatus,
    FetchDataset,
}

impl Operation {
    /// User-facing message used when the backend gives no usable one.
    pub fn fallback_message(self) -> &'static str {
        match self {
            Operation::Submit => "Upload failed",
            Operation::FetchStatus => "Failed to fetch task status",
            Operation::FetchDataset => "Failed to fetch students",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Submit => write!(f, "submit"),
            Operation::FetchStatus => write!(f, "fetch status"),
            Operation::FetchDataset => write!(f, "fetch dataset"),
        }
    }
}

/// Normalized backend failure. The payload is the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Network unreachable, timeout, unreadable body or a server-side error.
    #[error("{0}")]
    Transport(String),
    /// The backend rejected the request.
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Unknown(String),
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to start engine runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("failed to build http client: {0}")]
    Client(#[from] ClientError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Submitted {
        generation: u64,
        result: Result<UploadReceipt, ClientError>,
    },
    PollTick {
        generation: u64,
        task_id: TaskId,
    },
    StatusFetched {
        generation: u64,
        task_id: TaskId,
        result: Result<TaskStatus, ClientError>,
    },
    DatasetFetched {
        request_id: u64,
        result: Result<Vec<StudentRecord>, ClientError>,
    },
}
