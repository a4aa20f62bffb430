//! Roster core: pure upload/poll state machine and view-model helpers.
mod config;
mod effect;
mod msg;
mod snapshot;
mod state;
mod update;
mod view_model;

pub use config::{CoreConfig, PollFailurePolicy, RefreshPolicy};
pub use effect::Effect;
pub use msg::{Msg, SubmitReceipt};
pub use snapshot::{
    DatasetRow, Generation, JobId, JobSnapshot, JobStatus, Phase, RequestId, SelectedFile,
};
pub use state::{AppState, NO_FILE_MESSAGE, UPLOAD_IN_PROGRESS_MESSAGE};
pub use update::update;
pub use view_model::AppViewModel;
