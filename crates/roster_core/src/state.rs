use crate::view_model::AppViewModel;
use crate::{
    CoreConfig, DatasetRow, Generation, JobId, JobSnapshot, JobStatus, Phase, RefreshPolicy,
    RequestId, SelectedFile,
};

pub const NO_FILE_MESSAGE: &str = "Please select a file.";
pub const UPLOAD_IN_PROGRESS_MESSAGE: &str = "An upload is already in progress.";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    config: CoreConfig,
    started: bool,
    torn_down: bool,
    phase: Phase,
    selected_file: Option<SelectedFile>,
    generation: Generation,
    snapshot: JobSnapshot,
    snapshot_revision: u64,
    upload_error: Option<String>,
    consecutive_poll_failures: u32,
    poll_warning: Option<String>,
    dataset: DatasetState,
    dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct DatasetState {
    rows: Vec<DatasetRow>,
    error: Option<String>,
    next_request: RequestId,
    in_flight: usize,
    last_applied: Option<RequestId>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CoreConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn view(&self) -> AppViewModel {
        let submission_in_flight = self.submission_in_flight();
        AppViewModel {
            phase: self.phase,
            snapshot: self.snapshot.clone(),
            selected_file: self.selected_file.as_ref().map(|file| file.name.clone()),
            upload_error: self.upload_error.clone(),
            poll_warning: self.poll_warning.clone(),
            dataset: self.dataset.rows.clone(),
            dataset_error: self.dataset.error.clone(),
            submission_in_flight,
            dataset_loading: self.dataset.in_flight > 0,
            can_submit: self.selected_file.is_some() && !submission_in_flight && !self.torn_down,
            snapshot_revision: self.snapshot_revision,
            dirty: self.dirty,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn snapshot(&self) -> &JobSnapshot {
        &self.snapshot
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Number of snapshot changes published so far.
    pub fn snapshot_revision(&self) -> u64 {
        self.snapshot_revision
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn dataset_loading(&self) -> bool {
        self.dataset.in_flight > 0
    }

    /// Returns whether a render is due and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn submission_in_flight(&self) -> bool {
        matches!(self.phase, Phase::Submitting | Phase::Tracking)
    }

    pub(crate) fn mark_started(&mut self) -> bool {
        !std::mem::replace(&mut self.started, true)
    }

    pub(crate) fn tear_down(&mut self) {
        self.torn_down = true;
        self.generation += 1;
        self.mark_dirty();
    }

    pub(crate) fn set_selected_file(&mut self, file: Option<SelectedFile>) {
        self.selected_file = file;
        self.mark_dirty();
    }

    pub(crate) fn selected_file(&self) -> Option<&SelectedFile> {
        self.selected_file.as_ref()
    }

    pub(crate) fn set_upload_error(&mut self, message: impl Into<String>) {
        self.upload_error = Some(message.into());
        self.mark_dirty();
    }

    /// Moves to `Submitting` for a fresh generation and returns it.
    pub(crate) fn begin_submission(&mut self) -> Generation {
        self.generation += 1;
        self.phase = Phase::Submitting;
        self.upload_error = None;
        self.poll_warning = None;
        self.consecutive_poll_failures = 0;
        self.mark_dirty();
        self.generation
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        if self.phase == phase {
            return;
        }
        self.phase = phase;
        if !self.submission_in_flight()
            && self.upload_error.as_deref() == Some(UPLOAD_IN_PROGRESS_MESSAGE)
        {
            self.upload_error = None;
        }
        self.mark_dirty();
    }

    /// The job id currently polled, if the given generation is still current.
    pub(crate) fn tracked_job(&self, generation: Generation) -> Option<&JobId> {
        if self.torn_down || self.phase != Phase::Tracking || self.generation != generation {
            return None;
        }
        self.snapshot.job_id.as_ref()
    }

    /// Replaces the snapshot. Returns `true` when it actually changed.
    pub(crate) fn publish(&mut self, snapshot: JobSnapshot) -> bool {
        if self.snapshot == snapshot {
            return false;
        }
        self.snapshot = snapshot;
        self.snapshot_revision += 1;
        self.mark_dirty();
        true
    }

    pub(crate) fn publish_status(&mut self, status: JobStatus) -> bool {
        let next = JobSnapshot {
            job_id: self.snapshot.job_id.clone(),
            status,
        };
        self.publish(next)
    }

    pub(crate) fn wants_refresh_after_publish(&self) -> bool {
        match self.config.refresh_policy {
            RefreshPolicy::EveryChange => true,
            RefreshPolicy::TerminalOnly => self.snapshot.is_terminal(),
        }
    }

    pub(crate) fn reset_poll_failures(&mut self) {
        self.consecutive_poll_failures = 0;
        if self.poll_warning.take().is_some() {
            self.mark_dirty();
        }
    }

    /// Records one failed tick and returns the new consecutive count.
    pub(crate) fn record_poll_failure(&mut self) -> u32 {
        self.consecutive_poll_failures = self.consecutive_poll_failures.saturating_add(1);
        self.consecutive_poll_failures
    }

    pub(crate) fn set_poll_warning(&mut self, message: String) {
        self.poll_warning = Some(message);
        self.mark_dirty();
    }

    pub(crate) fn config(&self) -> &CoreConfig {
        &self.config
    }

    pub(crate) fn next_dataset_request(&mut self) -> RequestId {
        self.dataset.next_request += 1;
        self.dataset.in_flight += 1;
        self.mark_dirty();
        self.dataset.next_request
    }

    pub(crate) fn apply_dataset(
        &mut self,
        request_id: RequestId,
        result: Result<Vec<DatasetRow>, String>,
    ) {
        self.dataset.in_flight = self.dataset.in_flight.saturating_sub(1);
        self.mark_dirty();
        if self
            .dataset
            .last_applied
            .is_some_and(|applied| request_id < applied)
        {
            return;
        }
        self.dataset.last_applied = Some(request_id);
        match result {
            Ok(rows) => {
                self.dataset.rows = rows;
                self.dataset.error = None;
            }
            Err(message) => {
                self.dataset.error = Some(message);
            }
        }
    }
}
