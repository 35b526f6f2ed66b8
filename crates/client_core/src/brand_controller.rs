use std::sync::Arc;

use shared::{
    domain::{BrandIdentity, BusinessPlan, LogoStatus},
    error::{GenerationError, UserFacingError, ValidationError},
};
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    session::{GenerationPhase, Session, SessionEvent},
    IdentityRequestService,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("an identity request is already in flight")]
    AlreadyInFlight,
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error("identity request was superseded before it resolved")]
    Superseded,
}

/// Owns the single in-flight identity request and the top-level
/// loading/error/result state of a session.
pub struct BrandGenerationController {
    session: Session,
    identity_service: Arc<dyn IdentityRequestService>,
}

impl BrandGenerationController {
    pub fn new(session: Session, identity_service: Arc<dyn IdentityRequestService>) -> Self {
        Self {
            session,
            identity_service,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Requests a new identity for `plan`.
    ///
    /// While a request is loading every further submit is rejected, blank or
    /// not. Otherwise blank plans only set the validation error. A response
    /// that arrives after a reset is dropped and reported as `Superseded`.
    pub async fn submit(&self, plan: &str) -> Result<BrandIdentity, SubmitError> {
        let (epoch, plan) = {
            let mut state = self.session.lock().await;
            if matches!(state.phase, GenerationPhase::Loading) {
                warn!(epoch = state.epoch, "brand: submit while loading rejected");
                return Err(SubmitError::AlreadyInFlight);
            }
            let plan = match BusinessPlan::parse(plan) {
                Ok(plan) => plan,
                Err(err) => {
                    let notice = UserFacingError::from(err.clone());
                    state.error = Some(notice.clone());
                    self.session.emit(SessionEvent::Error(notice));
                    warn!("brand: rejected blank business plan");
                    return Err(err.into());
                }
            };
            state.epoch += 1;
            state.plan = plan.as_str().to_string();
            state.phase = GenerationPhase::Loading;
            state.error = None;
            state.logo_notice = None;
            (state.epoch, plan)
        };
        self.session
            .emit(SessionEvent::PhaseChanged(GenerationPhase::Loading));
        info!(
            epoch,
            plan_chars = plan.as_str().chars().count(),
            "brand: identity request issued"
        );

        let outcome = self
            .identity_service
            .generate_identity(&plan)
            .await
            .and_then(|identity| {
                identity.validate()?;
                Ok(identity)
            })
            .map(fresh_concepts);

        let mut state = self.session.lock().await;
        if state.epoch != epoch {
            info!(
                epoch,
                current_epoch = state.epoch,
                "brand: discarding identity response for superseded request"
            );
            return Err(SubmitError::Superseded);
        }

        match outcome {
            Ok(identity) => {
                info!(epoch, brand_name = %identity.brand_name, "brand: identity ready");
                state.phase = GenerationPhase::Ready(identity.clone());
                state.error = None;
                self.session
                    .emit(SessionEvent::PhaseChanged(state.phase.clone()));
                Ok(identity)
            }
            Err(err) => {
                warn!(epoch, detail = %err.detail, "brand: identity request failed");
                let notice = UserFacingError::from(&err);
                state.phase = GenerationPhase::Failed(notice.message.clone());
                state.error = Some(notice.clone());
                self.session
                    .emit(SessionEvent::PhaseChanged(state.phase.clone()));
                self.session.emit(SessionEvent::Error(notice));
                Err(err.into())
            }
        }
    }

    /// Back to `Idle` from any phase. In-flight identity and logo responses
    /// become stale.
    pub async fn reset(&self) {
        let mut state = self.session.lock().await;
        state.epoch += 1;
        state.plan.clear();
        state.phase = GenerationPhase::Idle;
        state.error = None;
        state.logo_notice = None;
        info!(epoch = state.epoch, "brand: session reset");
        self.session.emit(SessionEvent::Reset);
    }
}

fn fresh_concepts(mut identity: BrandIdentity) -> BrandIdentity {
    for concept in &mut identity.logo_concepts {
        concept.status = LogoStatus::NotStarted;
    }
    identity
}

#[cfg(test)]
#[path = "tests/brand_controller_tests.rs"]
mod tests;
