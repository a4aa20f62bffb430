use crate::{
    AppState, Effect, Generation, JobId, JobSnapshot, JobStatus, Msg, Phase, SubmitReceipt,
    NO_FILE_MESSAGE, UPLOAD_IN_PROGRESS_MESSAGE,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    if state.is_torn_down() {
        return (state, Vec::new());
    }

    let effects = match msg {
        Msg::Started => {
            if state.mark_started() {
                vec![refresh_dataset(&mut state)]
            } else {
                Vec::new()
            }
        }
        Msg::FileSelected(file) => {
            state.set_selected_file(file);
            Vec::new()
        }
        Msg::SubmitClicked => submit(&mut state),
        Msg::SubmitCompleted { generation, result } => {
            if state.phase() != Phase::Submitting || state.generation() != generation {
                return (state, Vec::new());
            }
            match result {
                Ok(receipt) => submission_accepted(&mut state, generation, receipt),
                Err(message) => {
                    state.set_phase(Phase::Idle);
                    state.set_upload_error(message);
                    publish(&mut state, JobSnapshot::default())
                }
            }
        }
        Msg::PollTick { generation } => match state.tracked_job(generation) {
            Some(job_id) => vec![Effect::FetchStatus {
                generation,
                job_id: job_id.clone(),
            }],
            None => Vec::new(),
        },
        Msg::StatusFetched {
            generation,
            job_id,
            result,
        } => {
            if !is_current(&state, generation, &job_id) {
                return (state, Vec::new());
            }
            match result {
                // A blank label carries no status; count it as a failed tick.
                Ok(JobStatus::Unknown) | Err(_) => poll_failed(&mut state),
                Ok(status) => status_observed(&mut state, status),
            }
        }
        Msg::DatasetFetched { request_id, result } => {
            state.apply_dataset(request_id, result);
            Vec::new()
        }
        Msg::Shutdown => {
            let was_tracking = state.phase() == Phase::Tracking;
            state.tear_down();
            if was_tracking {
                vec![Effect::StopPolling]
            } else {
                Vec::new()
            }
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn submit(state: &mut AppState) -> Vec<Effect> {
    let Some(file) = state.selected_file().cloned() else {
        state.set_upload_error(NO_FILE_MESSAGE);
        return Vec::new();
    };
    if state.submission_in_flight() {
        state.set_upload_error(UPLOAD_IN_PROGRESS_MESSAGE);
        return Vec::new();
    }
    let generation = state.begin_submission();
    vec![Effect::SubmitFile { generation, file }]
}

fn submission_accepted(
    state: &mut AppState,
    generation: Generation,
    receipt: SubmitReceipt,
) -> Vec<Effect> {
    let SubmitReceipt { job_id, status } = receipt;
    let mut effects = Vec::with_capacity(2);
    if status.is_terminal() {
        state.set_phase(Phase::Terminal);
    } else {
        state.set_phase(Phase::Tracking);
        effects.push(Effect::StartPolling {
            generation,
            job_id: job_id.clone(),
        });
    }
    effects.extend(publish(state, JobSnapshot::tracking(job_id, status)));
    effects
}

fn status_observed(state: &mut AppState, status: JobStatus) -> Vec<Effect> {
    state.reset_poll_failures();
    let mut effects = Vec::new();
    if status.is_terminal() {
        state.set_phase(Phase::Terminal);
        effects.push(Effect::StopPolling);
    }
    if state.publish_status(status) && state.wants_refresh_after_publish() {
        effects.push(refresh_dataset(state));
    }
    effects
}

fn poll_failed(state: &mut AppState) -> Vec<Effect> {
    let failures = state.record_poll_failure();
    let policy = state.config().poll_failures;

    if policy.fail_after.is_some_and(|limit| failures >= limit) {
        state.set_poll_warning(format!(
            "Lost contact with the import job after {failures} failed status checks; marked as failed."
        ));
        state.set_phase(Phase::Terminal);
        let mut effects = vec![Effect::StopPolling];
        if state.publish_status(JobStatus::Failure) && state.wants_refresh_after_publish() {
            effects.push(refresh_dataset(state));
        }
        return effects;
    }

    if policy.warn_after.is_some_and(|limit| failures >= limit) {
        state.set_poll_warning(format!(
            "Status check failed {failures} times in a row; still retrying."
        ));
    }
    Vec::new()
}

fn publish(state: &mut AppState, snapshot: JobSnapshot) -> Vec<Effect> {
    if state.publish(snapshot) && state.wants_refresh_after_publish() {
        vec![refresh_dataset(state)]
    } else {
        Vec::new()
    }
}

fn refresh_dataset(state: &mut AppState) -> Effect {
    Effect::RefreshDataset {
        request_id: state.next_dataset_request(),
    }
}

fn is_current(state: &AppState, generation: Generation, job_id: &JobId) -> bool {
    state.tracked_job(generation) == Some(job_id)
}
