use roster_core::{DatasetRow, Effect, JobStatus, Msg, SelectedFile, SubmitReceipt};
use roster_engine::{EngineEvent, EngineHandle, StudentRecord, UploadFile};
use roster_logging::{roster_debug, roster_info};

/// Executes core effects on the engine.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &EngineHandle {
        &self.engine
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SubmitFile { generation, file } => {
                    self.engine.submit(generation, upload_file(file));
                }
                Effect::StartPolling { generation, job_id } => {
                    roster_info!("StartPolling generation={} job_id={}", generation, job_id);
                    self.engine.start_polling(generation, job_id);
                }
                Effect::FetchStatus { generation, job_id } => {
                    self.engine.fetch_status(generation, job_id);
                }
                Effect::StopPolling => {
                    roster_info!("StopPolling");
                    self.engine.stop_polling();
                }
                Effect::RefreshDataset { request_id } => {
                    self.engine.refresh_dataset(request_id);
                }
            }
        }
    }
}

/// Translates an engine event into the message the core understands.
pub fn event_to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::Submitted { generation, result } => Msg::SubmitCompleted {
            generation,
            result: result
                .map(|receipt| SubmitReceipt {
                    status: JobStatus::from_label(&receipt.status),
                    job_id: receipt.task_id,
                })
                .map_err(|err| err.to_string()),
        },
        EngineEvent::PollTick {
            generation,
            task_id,
        } => {
            roster_debug!("PollTick generation={} task_id={}", generation, task_id);
            Msg::PollTick { generation }
        }
        EngineEvent::StatusFetched {
            generation,
            task_id,
            result,
        } => Msg::StatusFetched {
            generation,
            job_id: task_id,
            result: result
                .map(|status| JobStatus::from_label(&status.status))
                .map_err(|err| err.to_string()),
        },
        EngineEvent::DatasetFetched { request_id, result } => Msg::DatasetFetched {
            request_id,
            result: result
                .map(|records| records.into_iter().map(dataset_row).collect())
                .map_err(|err| err.to_string()),
        },
    }
}

fn upload_file(file: SelectedFile) -> UploadFile {
    UploadFile {
        file_name: file.name,
        bytes: file.bytes,
    }
}

fn dataset_row(record: StudentRecord) -> DatasetRow {
    DatasetRow {
        reg_no: record.reg_no,
        first_name: record.first_name,
        last_name: record.last_name,
        email: record.email,
        department: record.department,
        level: record.level,
    }
}
