use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use roster_logging::{roster_debug, roster_info};

use crate::client::{ClientSettings, JobClient, ReqwestJobClient};
use crate::scheduler::PollingScheduler;
use crate::{EngineError, EngineEvent, TaskId, UploadFile};

enum EngineCommand {
    Submit { generation: u64, file: UploadFile },
    StartPolling { generation: u64, task_id: TaskId },
    StopPolling,
    FetchStatus { generation: u64, task_id: TaskId },
    RefreshDataset { request_id: u64 },
}

/// Background executor for backend calls and the poll timer.
///
/// Commands are handled on a dedicated thread that owns a tokio runtime and
/// the only [`PollingScheduler`]. Results come back as [`EngineEvent`]s.
/// Dropping the handle stops that thread and cancels the timer.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: ClientSettings) -> Result<Self, EngineError> {
        let client = ReqwestJobClient::new(&settings)?;
        Self::with_client(Arc::new(client), settings.poll_interval)
    }

    pub fn with_client(
        client: Arc<dyn JobClient>,
        poll_interval: Duration,
    ) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Runtime::new()?;

        thread::spawn(move || {
            let mut scheduler = PollingScheduler::new(poll_interval, runtime.handle().clone());
            while let Ok(command) = cmd_rx.recv() {
                handle_command(&runtime, &mut scheduler, &client, &event_tx, command);
            }
            scheduler.stop();
            roster_info!("Engine stopped");
        });

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn submit(&self, generation: u64, file: UploadFile) {
        self.send(EngineCommand::Submit { generation, file });
    }

    pub fn start_polling(&self, generation: u64, task_id: impl Into<TaskId>) {
        self.send(EngineCommand::StartPolling {
            generation,
            task_id: task_id.into(),
        });
    }

    pub fn stop_polling(&self) {
        self.send(EngineCommand::StopPolling);
    }

    pub fn fetch_status(&self, generation: u64, task_id: impl Into<TaskId>) {
        self.send(EngineCommand::FetchStatus {
            generation,
            task_id: task_id.into(),
        });
    }

    pub fn refresh_dataset(&self, request_id: u64) {
        self.send(EngineCommand::RefreshDataset { request_id });
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    fn send(&self, command: EngineCommand) {
        let _ = self.cmd_tx.send(command);
    }
}

fn handle_command(
    runtime: &tokio::runtime::Runtime,
    scheduler: &mut PollingScheduler,
    client: &Arc<dyn JobClient>,
    event_tx: &mpsc::Sender<EngineEvent>,
    command: EngineCommand,
) {
    match command {
        EngineCommand::StartPolling {
            generation,
            task_id,
        } => {
            let tick_tx = event_tx.clone();
            let tick_task = task_id.clone();
            scheduler.start(task_id, move || {
                let _ = tick_tx.send(EngineEvent::PollTick {
                    generation,
                    task_id: tick_task.clone(),
                });
            });
        }
        EngineCommand::StopPolling => scheduler.stop(),
        EngineCommand::Submit { generation, file } => {
            roster_info!("Submitting {} ({} bytes)", file.file_name, file.bytes.len());
            let client = client.clone();
            let event_tx = event_tx.clone();
            runtime.spawn(async move {
                let result = client.submit(&file).await;
                let _ = event_tx.send(EngineEvent::Submitted { generation, result });
            });
        }
        EngineCommand::FetchStatus {
            generation,
            task_id,
        } => {
            roster_debug!("Fetching status of task {}", task_id);
            let client = client.clone();
            let event_tx = event_tx.clone();
            runtime.spawn(async move {
                let result = client.fetch_status(&task_id).await;
                let _ = event_tx.send(EngineEvent::StatusFetched {
                    generation,
                    task_id,
                    result,
                });
            });
        }
        EngineCommand::RefreshDataset { request_id } => {
            roster_debug!("Refreshing dataset (request {})", request_id);
            let client = client.clone();
            let event_tx = event_tx.clone();
            runtime.spawn(async move {
                let result = client.fetch_dataset().await;
                let _ = event_tx.send(EngineEvent::DatasetFetched { request_id, result });
            });
        }
    }
}
