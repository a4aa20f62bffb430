use std::fmt;

/// Backend task identifier returned by a successful submission.
pub type JobId = String;

/// Monotonic submission counter used to recognise stale responses.
pub type Generation = u64;

/// Monotonic dataset refresh counter.
pub type RequestId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobStatus {
    /// No status has been observed yet.
    #[default]
    Unknown,
    Pending,
    Success,
    Failure,
}

impl JobStatus {
    /// Maps a backend status label. Anything that is not a terminal label is
    /// treated as still running.
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        if label.eq_ignore_ascii_case("SUCCESS") {
            JobStatus::Success
        } else if label.eq_ignore_ascii_case("FAILURE") {
            JobStatus::Failure
        } else if label.is_empty() {
            JobStatus::Unknown
        } else {
            JobStatus::Pending
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Success | JobStatus::Failure)
    }

    pub fn label(self) -> &'static str {
        match self {
            JobStatus::Unknown => "UNKNOWN",
            JobStatus::Pending => "PENDING",
            JobStatus::Success => "SUCCESS",
            JobStatus::Failure => "FAILURE",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The coordinator's current view of one import job.
///
/// `status` only carries meaning while `job_id` is present.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobSnapshot {
    pub job_id: Option<JobId>,
    pub status: JobStatus,
}

impl JobSnapshot {
    pub fn tracking(job_id: impl Into<JobId>, status: JobStatus) -> Self {
        Self {
            job_id: Some(job_id.into()),
            status,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.job_id.is_some() && self.status.is_terminal()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Submitting,
    Tracking,
    Terminal,
}

/// One student record of the dependent dataset. `reg_no` is unique.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DatasetRow {
    pub reg_no: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub department: String,
    pub level: String,
}

/// A file picked by the operator, held in memory until submitted.
#[derive(Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

impl fmt::Debug for SelectedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectedFile")
            .field("name", &self.name)
            .field("len", &self.bytes.len())
            .finish()
    }
}
