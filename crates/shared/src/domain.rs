use serde::{Deserialize, Serialize};

use crate::error::{SchemaViolation, ValidationError};

pub const LOGO_CONCEPT_COUNT: usize = 3;
pub const BRAND_VOICE_COUNT: usize = 3;

/// Free-text business plan, guaranteed non-blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessPlan(String);

impl BusinessPlan {
    pub fn parse(raw: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(ValidationError);
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Render state of a single logo concept.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LogoStatus {
    #[default]
    NotStarted,
    Generating,
    Done {
        image_url: String,
    },
    Errored,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoConcept {
    pub style: String,
    pub description: String,
    /// Reported in snapshots; never read back from model output.
    #[serde(skip_deserializing)]
    pub status: LogoStatus,
}

impl LogoConcept {
    pub fn new(style: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            style: style.into(),
            description: description.into(),
            status: LogoStatus::NotStarted,
        }
    }

    pub fn image_url(&self) -> Option<&str> {
        match &self.status {
            LogoStatus::Done { image_url } => Some(image_url),
            _ => None,
        }
    }

    pub fn is_generating(&self) -> bool {
        matches!(self.status, LogoStatus::Generating)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorInfo {
    pub hex: String,
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorPalette {
    pub primary: ColorInfo,
    pub secondary: ColorInfo,
    pub accent: ColorInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontInfo {
    pub font: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Typography {
    pub heading: FontInfo,
    pub body: FontInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceInfo {
    pub adjective: String,
    pub reason: String,
}

/// The full structured answer of the text model.
///
/// Field names follow the camelCase response schema so the model output can be
/// decoded directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandIdentity {
    pub brand_name: String,
    pub tagline: String,
    pub logo_concepts: Vec<LogoConcept>,
    pub color_palette: ColorPalette,
    pub typography: Typography,
    pub brand_voice: Vec<VoiceInfo>,
}

impl BrandIdentity {
    /// Checks the invariants serde cannot express: fixed list sizes, non-empty
    /// name and well-formed hex colors.
    pub fn validate(&self) -> Result<(), SchemaViolation> {
        if self.brand_name.trim().is_empty() {
            return Err(SchemaViolation::EmptyField("brandName"));
        }
        if self.logo_concepts.len() != LOGO_CONCEPT_COUNT {
            return Err(SchemaViolation::Cardinality {
                field: "logoConcepts",
                expected: LOGO_CONCEPT_COUNT,
                actual: self.logo_concepts.len(),
            });
        }
        if self
            .logo_concepts
            .iter()
            .any(|concept| concept.description.trim().is_empty())
        {
            return Err(SchemaViolation::EmptyField("logoConcepts.description"));
        }
        if self.brand_voice.len() != BRAND_VOICE_COUNT {
            return Err(SchemaViolation::Cardinality {
                field: "brandVoice",
                expected: BRAND_VOICE_COUNT,
                actual: self.brand_voice.len(),
            });
        }
        for (field, color) in [
            ("colorPalette.primary.hex", &self.color_palette.primary),
            ("colorPalette.secondary.hex", &self.color_palette.secondary),
            ("colorPalette.accent.hex", &self.color_palette.accent),
        ] {
            if !is_hex_color(&color.hex) {
                return Err(SchemaViolation::InvalidHex {
                    field,
                    value: color.hex.clone(),
                });
            }
        }
        Ok(())
    }
}

/// `#RGB` or `#RRGGBB`, either case.
pub fn is_hex_color(value: &str) -> bool {
    let Some(digits) = value.strip_prefix('#') else {
        return false;
    };
    matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
