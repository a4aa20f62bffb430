/// When the dependent dataset is re-fetched after a snapshot change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshPolicy {
    /// Refresh on every published snapshot change.
    #[default]
    EveryChange,
    /// Refresh only when the published snapshot is terminal.
    TerminalOnly,
}

/// Handling of consecutive status-fetch failures while tracking a job.
///
/// With both thresholds unset a failed tick is skipped silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PollFailurePolicy {
    /// Expose a warning after this many consecutive failures.
    pub warn_after: Option<u32>,
    /// Fail the job locally after this many consecutive failures.
    pub fail_after: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CoreConfig {
    pub refresh_policy: RefreshPolicy,
    pub poll_failures: PollFailurePolicy,
}
