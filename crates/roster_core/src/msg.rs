use crate::{DatasetRow, Generation, JobId, JobStatus, RequestId, SelectedFile};

/// Successful response of the submit operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReceipt {
    pub job_id: JobId,
    pub status: JobStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// The view was mounted; triggers the initial dataset load.
    Started,
    /// User picked (or cleared) the file to upload.
    FileSelected(Option<SelectedFile>),
    /// User clicked Upload.
    SubmitClicked,
    /// Submit call finished.
    SubmitCompleted {
        generation: Generation,
        result: Result<SubmitReceipt, String>,
    },
    /// The polling timer fired.
    PollTick { generation: Generation },
    /// A status fetch finished.
    StatusFetched {
        generation: Generation,
        job_id: JobId,
        result: Result<JobStatus, String>,
    },
    /// A dataset fetch finished.
    DatasetFetched {
        request_id: RequestId,
        result: Result<Vec<DatasetRow>, String>,
    },
    /// The view is being torn down.
    Shutdown,
    /// Fallback for placeholder wiring.
    NoOp,
}
