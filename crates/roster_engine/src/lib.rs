//! Roster engine: backend client, status polling and effect execution.
mod client;
mod engine;
mod scheduler;
mod types;

pub use client::{ClientSettings, JobClient, ReqwestJobClient, DEFAULT_BASE_URL};
pub use engine::EngineHandle;
pub use scheduler::{
    PollHandle, PollingScheduler, DEFAULT_POLL_INTERVAL, MIN_POLL_INTERVAL,
};
pub use types::{
    ClientError, EngineError, EngineEvent, Operation, StudentRecord, TaskId, TaskStatus,
    UploadFile, UploadReceipt,
};
