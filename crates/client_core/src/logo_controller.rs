use std::sync::Arc;

use futures::future::join_all;
use shared::{
    domain::LogoStatus,
    error::{ErrorCode, ImageGenerationError, UserFacingError, LOGO_NOTICE_MESSAGE},
};
use thiserror::Error;
use tokio::runtime::Handle;
use tracing::{info, warn};

use crate::{
    session::{Session, SessionEvent, SessionState},
    ImageRequestService,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LogoError {
    #[error("no brand identity is ready")]
    NoIdentity,
    #[error("logo index {index} is out of range for {len} concepts")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("logo {0} is already generating")]
    AlreadyGenerating(usize),
    #[error("logo {0} has already been generated")]
    AlreadyGenerated(usize),
    #[error(transparent)]
    ImageGeneration(#[from] ImageGenerationError),
    #[error("logo request {0} was superseded before it resolved")]
    Superseded(usize),
}

/// A claimed concept: already `Generating`, waiting for its image request.
///
/// Carries the index and session epoch captured when it was claimed so the
/// result lands on the same concept of the same identity. Dropping a ticket
/// before `render` records an outcome marks the concept `Errored`, so a
/// cancelled or abandoned request can be retried.
#[derive(Debug)]
pub struct LogoTicket {
    index: usize,
    epoch: u64,
    description: String,
    session: Session,
    armed: bool,
}

impl LogoTicket {
    pub fn index(&self) -> usize {
        self.index
    }
}

impl Drop for LogoTicket {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let (index, epoch) = (self.index, self.epoch);
        if let Some(mut state) = self.session.try_lock() {
            abandon(&self.session, &mut state, index, epoch);
            return;
        }
        // Lock is busy; finish on the runtime if there is one.
        match Handle::try_current() {
            Ok(handle) => {
                let session = self.session.clone();
                handle.spawn(async move {
                    let mut state = session.lock().await;
                    abandon(&session, &mut state, index, epoch);
                });
            }
            Err(_) => warn!(index, epoch, "logo: ticket dropped outside a runtime"),
        }
    }
}

/// Releases a concept whose ticket was dropped while still `Generating`.
fn abandon(session: &Session, state: &mut SessionState, index: usize, epoch: u64) {
    if state.epoch != epoch {
        return;
    }
    let Some(concept) = state
        .identity_mut()
        .and_then(|identity| identity.logo_concepts.get_mut(index))
    else {
        return;
    };
    if !concept.is_generating() {
        return;
    }
    concept.status = LogoStatus::Errored;
    session.emit(SessionEvent::LogoStatusChanged {
        index,
        status: LogoStatus::Errored,
    });
    warn!(index, epoch, "logo: request abandoned before it resolved");
}

/// Drives per-concept image requests over the ready identity of a session.
pub struct LogoGenerationController {
    session: Session,
    image_service: Arc<dyn ImageRequestService>,
}

impl LogoGenerationController {
    pub fn new(session: Session, image_service: Arc<dyn ImageRequestService>) -> Self {
        Self {
            session,
            image_service,
        }
    }

    pub async fn generate_logo(&self, index: usize) -> Result<String, LogoError> {
        let ticket = self.claim(index).await?;
        self.render(ticket).await
    }

    /// Moves concept `index` to `Generating` without issuing the request.
    ///
    /// Concepts that are generating or done are refused; errored concepts may
    /// be claimed again.
    pub async fn claim(&self, index: usize) -> Result<LogoTicket, LogoError> {
        let mut state = self.session.lock().await;
        let epoch = state.epoch;
        let identity = state.identity_mut().ok_or(LogoError::NoIdentity)?;
        let len = identity.logo_concepts.len();
        let concept = identity
            .logo_concepts
            .get_mut(index)
            .ok_or(LogoError::IndexOutOfRange { index, len })?;

        match concept.status {
            LogoStatus::Generating => return Err(LogoError::AlreadyGenerating(index)),
            LogoStatus::Done { .. } => return Err(LogoError::AlreadyGenerated(index)),
            LogoStatus::NotStarted | LogoStatus::Errored => {}
        }
        concept.status = LogoStatus::Generating;
        let ticket = LogoTicket {
            index,
            epoch,
            description: concept.description.clone(),
            session: self.session.clone(),
            armed: true,
        };
        self.session.emit(SessionEvent::LogoStatusChanged {
            index,
            status: LogoStatus::Generating,
        });
        info!(index, epoch, style = %concept.style, "logo: generation started");
        Ok(ticket)
    }

    /// Issues the image request for a claimed concept and records the outcome.
    pub async fn render(&self, mut ticket: LogoTicket) -> Result<String, LogoError> {
        let outcome = self.image_service.generate_image(&ticket.description).await;

        let mut state = self.session.lock().await;
        // Nothing below awaits, so the outcome is always recorded from here.
        ticket.armed = false;
        let index = ticket.index;
        if state.epoch != ticket.epoch {
            info!(
                index,
                epoch = ticket.epoch,
                current_epoch = state.epoch,
                "logo: discarding image for superseded identity"
            );
            return Err(LogoError::Superseded(index));
        }
        // Same epoch means the identity the ticket was claimed on is still live.
        let Some(concept) = state
            .identity_mut()
            .and_then(|identity| identity.logo_concepts.get_mut(index))
        else {
            return Err(LogoError::Superseded(index));
        };

        match outcome {
            Ok(image_url) => {
                concept.status = LogoStatus::Done {
                    image_url: image_url.clone(),
                };
                self.session.emit(SessionEvent::LogoStatusChanged {
                    index,
                    status: concept.status.clone(),
                });
                info!(index, "logo: generation finished");
                Ok(image_url)
            }
            Err(err) => {
                concept.status = LogoStatus::Errored;
                self.session.emit(SessionEvent::LogoStatusChanged {
                    index,
                    status: LogoStatus::Errored,
                });
                let notice = UserFacingError::new(ErrorCode::ImageGeneration, LOGO_NOTICE_MESSAGE);
                state.logo_notice = Some(notice.clone());
                self.session.emit(SessionEvent::Error(notice));
                warn!(index, detail = %err.detail, "logo: generation failed");
                Err(err.into())
            }
        }
    }

    /// Claims every concept that is not started or errored, then renders them
    /// concurrently. Outcomes are returned in index order.
    pub async fn generate_all(&self) -> Result<Vec<(usize, Result<String, LogoError>)>, LogoError> {
        let len = {
            let mut state = self.session.lock().await;
            state
                .identity_mut()
                .ok_or(LogoError::NoIdentity)?
                .logo_concepts
                .len()
        };

        let mut tickets = Vec::with_capacity(len);
        for index in 0..len {
            match self.claim(index).await {
                Ok(ticket) => tickets.push(ticket),
                Err(LogoError::AlreadyGenerating(_) | LogoError::AlreadyGenerated(_)) => {}
                Err(err) => return Err(err),
            }
        }

        let renders = tickets.into_iter().map(|ticket| async move {
            let index = ticket.index;
            (index, self.render(ticket).await)
        });
        Ok(join_all(renders).await)
    }
}

#[cfg(test)]
#[path = "tests/logo_controller_tests.rs"]
mod tests;
