//! Stub collaborators and fixtures shared by the unit tests.

use std::{
    collections::{HashMap, VecDeque},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use async_trait::async_trait;
use shared::{
    domain::{
        BrandIdentity, BusinessPlan, ColorInfo, ColorPalette, FontInfo, LogoConcept, LogoStatus,
        Typography, VoiceInfo,
    },
    error::{GenerationError, ImageGenerationError},
};
use tokio::sync::{mpsc, oneshot, Mutex};

use crate::{IdentityRequestService, ImageRequestService, Session};

pub(crate) const VERDETECH_PLAN: &str =
    "VerdeTech, sustainable electronics refurbished and resold with a lifetime repair pledge.";
pub(crate) const PNG_REFERENCE: &str = "data:image/png;base64,AAAA";

pub(crate) type IdentityReply = Result<BrandIdentity, GenerationError>;
pub(crate) type ImageReply = Result<String, ImageGenerationError>;

fn color(hex: &str, name: &str) -> ColorInfo {
    ColorInfo {
        hex: hex.to_string(),
        name: name.to_string(),
        reason: format!("{name} reads as trustworthy"),
    }
}

fn voice(adjective: &str) -> VoiceInfo {
    VoiceInfo {
        adjective: adjective.to_string(),
        reason: format!("{adjective} suits a repair-first brand"),
    }
}

pub(crate) fn verdetech_identity() -> BrandIdentity {
    BrandIdentity {
        brand_name: "VerdeTech".to_string(),
        tagline: "Electronics that last".to_string(),
        logo_concepts: vec![
            LogoConcept::new("Minimalist", "a leaf whose veins form a circuit board"),
            LogoConcept::new("Abstract", "two green arcs closing into a loop"),
            LogoConcept::new("Modern Emblem", "a shield around a wrench and sprout"),
        ],
        color_palette: ColorPalette {
            primary: color("#2E7D32", "Forest Green"),
            secondary: color("#ECEFF1", "Cloud"),
            accent: color("#FFB300", "Amber"),
        },
        typography: Typography {
            heading: FontInfo {
                font: "Montserrat".to_string(),
                reason: "geometric and confident".to_string(),
            },
            body: FontInfo {
                font: "Open Sans".to_string(),
                reason: "neutral and legible".to_string(),
            },
        },
        brand_voice: vec![voice("Hopeful"), voice("Practical"), voice("Transparent")],
    }
}

/// Identity service that answers immediately or waits on queued gates.
pub(crate) struct StubIdentityService {
    calls: AtomicUsize,
    immediate: Option<IdentityReply>,
    gates: Mutex<VecDeque<oneshot::Receiver<IdentityReply>>>,
}

impl StubIdentityService {
    pub(crate) fn ok(identity: BrandIdentity) -> Self {
        Self::answering(Ok(identity))
    }

    pub(crate) fn failing(detail: &str) -> Self {
        Self::answering(Err(GenerationError::new(detail)))
    }

    pub(crate) fn answering(reply: IdentityReply) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            immediate: Some(reply),
            gates: Mutex::new(VecDeque::new()),
        }
    }

    /// Every call waits for the next sender returned by `push_gate`.
    pub(crate) fn gated() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            immediate: None,
            gates: Mutex::new(VecDeque::new()),
        }
    }

    pub(crate) async fn push_gate(&self) -> oneshot::Sender<IdentityReply> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().await.push_back(rx);
        tx
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityRequestService for StubIdentityService {
    async fn generate_identity(&self, _plan: &BusinessPlan) -> IdentityReply {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(reply) = &self.immediate {
            return reply.clone();
        }
        let gate = self.gates.lock().await.pop_front();
        match gate {
            Some(rx) => rx
                .await
                .unwrap_or_else(|_| Err(GenerationError::new("gate dropped"))),
            None => Err(GenerationError::new("no gate queued")),
        }
    }
}

/// Image service keyed by description. Gated descriptions wait for their
/// sender; the rest answer with `fallback`. Each call is announced on the
/// `started` channel before it waits.
pub(crate) struct StubImageService {
    requests: Mutex<Vec<String>>,
    gates: Mutex<HashMap<String, oneshot::Receiver<ImageReply>>>,
    fallback: ImageReply,
    started: mpsc::UnboundedSender<String>,
}

impl StubImageService {
    pub(crate) fn new(fallback: ImageReply) -> (Arc<Self>, mpsc::UnboundedReceiver<String>) {
        let (started, started_rx) = mpsc::unbounded_channel();
        let service = Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            gates: Mutex::new(HashMap::new()),
            fallback,
            started,
        });
        (service, started_rx)
    }

    pub(crate) async fn gate(&self, description: &str) -> oneshot::Sender<ImageReply> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().await.insert(description.to_string(), rx);
        tx
    }

    pub(crate) async fn requests(&self) -> Vec<String> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl ImageRequestService for StubImageService {
    async fn generate_image(&self, description: &str) -> ImageReply {
        self.requests.lock().await.push(description.to_string());
        let _ = self.started.send(description.to_string());
        let gate = self.gates.lock().await.remove(description);
        match gate {
            Some(rx) => rx
                .await
                .unwrap_or_else(|_| Err(ImageGenerationError::new("gate dropped"))),
            None => self.fallback.clone(),
        }
    }
}

pub(crate) async fn logo_statuses(session: &Session) -> Vec<LogoStatus> {
    session
        .snapshot()
        .await
        .identity()
        .map(|identity| {
            identity
                .logo_concepts
                .iter()
                .map(|concept| concept.status.clone())
                .collect()
        })
        .unwrap_or_default()
}

pub(crate) fn done(url: &str) -> LogoStatus {
    LogoStatus::Done {
        image_url: url.to_string(),
    }
}
