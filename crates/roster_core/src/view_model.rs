use crate::{DatasetRow, JobSnapshot, Phase};

/// Everything the view layer needs to render one frame.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub phase: Phase,
    pub snapshot: JobSnapshot,
    /// Name of the selected file.
    pub selected_file: Option<String>,
    pub upload_error: Option<String>,
    pub poll_warning: Option<String>,
    pub dataset: Vec<DatasetRow>,
    pub dataset_error: Option<String>,
    pub submission_in_flight: bool,
    pub dataset_loading: bool,
    pub can_submit: bool,
    pub snapshot_revision: u64,
    pub dirty: bool,
}
