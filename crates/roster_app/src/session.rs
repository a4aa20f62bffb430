use std::time::Duration;

use roster_core::{update, AppState, AppViewModel, CoreConfig, Msg, Phase};
use roster_engine::{EngineError, EngineHandle};

use crate::config::AppConfig;
use crate::effects::{event_to_msg, EffectRunner};

/// Single writer of the core state: every message goes through `dispatch`.
pub struct Session {
    state: AppState,
    runner: EffectRunner,
}

impl Session {
    pub fn new(config: &AppConfig) -> Result<Self, EngineError> {
        let engine = EngineHandle::new(config.client_settings())?;
        Ok(Self::with_engine(engine, config.core_config()))
    }

    pub fn with_engine(engine: EngineHandle, config: CoreConfig) -> Self {
        Self {
            state: AppState::with_config(config),
            runner: EffectRunner::new(engine),
        }
    }

    /// Applies one message, runs its effects and returns the view if a render is due.
    pub fn dispatch(&mut self, msg: Msg) -> Option<AppViewModel> {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let view = state.consume_dirty().then(|| state.view());
        self.state = state;
        self.runner.enqueue(effects);
        view
    }

    /// Waits up to `timeout` for the next engine event and dispatches it.
    pub fn pump(&mut self, timeout: Duration) -> Option<AppViewModel> {
        let event = self.runner.engine().recv_timeout(timeout)?;
        self.dispatch(event_to_msg(event))
    }

    pub fn view(&self) -> AppViewModel {
        self.state.view()
    }

    /// True once the job reached an outcome and no dataset refresh is pending.
    pub fn is_settled(&self) -> bool {
        matches!(self.state.phase(), Phase::Idle | Phase::Terminal) && !self.state.dataset_loading()
    }

    pub fn shutdown(mut self) {
        self.dispatch(Msg::Shutdown);
    }
}
