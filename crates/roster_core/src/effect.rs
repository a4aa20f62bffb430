use crate::{Generation, JobId, RequestId, SelectedFile};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Upload the file to the import endpoint.
    SubmitFile {
        generation: Generation,
        file: SelectedFile,
    },
    /// Start the repeating status timer for `job_id`, replacing any live one.
    StartPolling {
        generation: Generation,
        job_id: JobId,
    },
    /// Fetch the current status of `job_id` once.
    FetchStatus {
        generation: Generation,
        job_id: JobId,
    },
    /// Cancel the live status timer, if any.
    StopPolling,
    /// Re-fetch the full dataset.
    RefreshDataset { request_id: RequestId },
}
