use std::sync::Arc;

use async_trait::async_trait;
use shared::{
    domain::{BrandIdentity, BusinessPlan},
    error::{GenerationError, ImageGenerationError},
};

mod brand_controller;
pub mod config;
pub mod export;
pub mod gemini;
mod logo_controller;
mod session;

pub use brand_controller::{BrandGenerationController, SubmitError};
pub use gemini::{GeminiClient, GeminiError};
pub use logo_controller::{LogoError, LogoGenerationController, LogoTicket};
pub use session::{
    GenerationPhase, Session, SessionEvent, SessionSnapshot, PROGRESS_STEPS,
};

/// Turns a business plan into a validated brand identity.
#[async_trait]
pub trait IdentityRequestService: Send + Sync {
    async fn generate_identity(
        &self,
        plan: &BusinessPlan,
    ) -> Result<BrandIdentity, GenerationError>;
}

/// Renders one logo concept description into an embeddable image reference
/// (a `data:` URI or URL).
#[async_trait]
pub trait ImageRequestService: Send + Sync {
    async fn generate_image(&self, description: &str) -> Result<String, ImageGenerationError>;
}

/// Full rendering prompt for a logo concept description.
pub fn logo_prompt(description: &str) -> String {
    format!(
        "A clean, modern, vector-style logo of {description}. The logo should be on a plain \
         white background, high resolution, suitable for a corporate brand identity."
    )
}

/// Both controllers wired to one session.
pub struct BrandStudio {
    brand: BrandGenerationController,
    logos: LogoGenerationController,
}

impl BrandStudio {
    pub fn new(
        identity_service: Arc<dyn IdentityRequestService>,
        image_service: Arc<dyn ImageRequestService>,
    ) -> Self {
        let session = Session::new();
        Self {
            brand: BrandGenerationController::new(session.clone(), identity_service),
            logos: LogoGenerationController::new(session, image_service),
        }
    }

    /// Studio backed by one `GeminiClient` for both text and images.
    pub fn with_gemini(client: GeminiClient) -> Self {
        let client = Arc::new(client);
        Self::new(client.clone(), client)
    }

    pub fn brand(&self) -> &BrandGenerationController {
        &self.brand
    }

    pub fn logos(&self) -> &LogoGenerationController {
        &self.logos
    }

    pub fn session(&self) -> &Session {
        self.brand.session()
    }
}

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
