//! Session state shared by the brand and logo controllers.

use std::sync::Arc;

use serde::Serialize;
use shared::{
    domain::{BrandIdentity, LogoStatus},
    error::UserFacingError,
};
use tokio::sync::{broadcast, Mutex, MutexGuard};

/// Labels of the progress tracker, in order.
pub const PROGRESS_STEPS: [&str; 7] = ["Plan", "Brand", "Logo", "Colors", "Fonts", "Voice", "Kit"];

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "phase", content = "value", rename_all = "snake_case")]
pub enum GenerationPhase {
    #[default]
    Idle,
    Loading,
    Ready(BrandIdentity),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    PhaseChanged(GenerationPhase),
    LogoStatusChanged { index: usize, status: LogoStatus },
    Error(UserFacingError),
    Reset,
}

#[derive(Debug, Default)]
pub(crate) struct SessionState {
    pub(crate) plan: String,
    pub(crate) phase: GenerationPhase,
    /// Validation or identity failure.
    pub(crate) error: Option<UserFacingError>,
    /// Last logo failure; never clears the identity.
    pub(crate) logo_notice: Option<UserFacingError>,
    /// Bumped by every submit and reset. Responses tagged with an older value
    /// are dropped.
    pub(crate) epoch: u64,
}

impl SessionState {
    pub(crate) fn identity_mut(&mut self) -> Option<&mut BrandIdentity> {
        match &mut self.phase {
            GenerationPhase::Ready(identity) => Some(identity),
            _ => None,
        }
    }
}

/// Point-in-time copy of the session for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub plan: String,
    pub phase: GenerationPhase,
    pub error: Option<UserFacingError>,
    pub logo_notice: Option<UserFacingError>,
}

impl SessionSnapshot {
    pub fn identity(&self) -> Option<&BrandIdentity> {
        match &self.phase {
            GenerationPhase::Ready(identity) => Some(identity),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, GenerationPhase::Loading)
    }

    /// Index into `PROGRESS_STEPS`; equal to its length once the kit is ready.
    pub fn progress_index(&self) -> usize {
        if self.error.is_some() {
            return 0;
        }
        match self.phase {
            GenerationPhase::Loading => 1,
            GenerationPhase::Ready(_) => PROGRESS_STEPS.len(),
            GenerationPhase::Idle | GenerationPhase::Failed(_) => 0,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Session {
    state: Arc<Mutex<SessionState>>,
    events: broadcast::Sender<SessionEvent>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(256);
        Self {
            state: Arc::new(Mutex::new(SessionState::default())),
            events,
        }
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.lock().await;
        SessionSnapshot {
            plan: state.plan.clone(),
            phase: state.phase.clone(),
            error: state.error.clone(),
            logo_notice: state.logo_notice.clone(),
        }
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub(crate) async fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().await
    }

    pub(crate) fn try_lock(&self) -> Option<MutexGuard<'_, SessionState>> {
        self.state.try_lock().ok()
    }

    pub(crate) fn emit(&self, event: SessionEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
