//! Wire types for the generative language API (`generateContent` for text,
//! `predict` for images) and the response schema sent with identity requests.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

impl GenerateContentRequest {
    /// Single-turn prompt constrained to JSON matching `response_schema`.
    pub fn structured(prompt: impl Into<String>, response_schema: Value) -> Self {
        Self {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(prompt.into()),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_mime_type: String,
    pub response_schema: Value,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// Concatenated, trimmed text of the first candidate. `None` when the
    /// model returned no text at all.
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();
        let trimmed = text.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictRequest {
    pub instances: Vec<ImageInstance>,
    pub parameters: ImageParameters,
}

impl PredictRequest {
    pub fn single_square_png(prompt: impl Into<String>) -> Self {
        Self {
            instances: vec![ImageInstance {
                prompt: prompt.into(),
            }],
            parameters: ImageParameters {
                sample_count: 1,
                aspect_ratio: "1:1".to_string(),
                output_options: OutputOptions {
                    mime_type: "image/png".to_string(),
                },
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageInstance {
    pub prompt: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageParameters {
    pub sample_count: u32,
    pub aspect_ratio: String,
    pub output_options: OutputOptions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputOptions {
    pub mime_type: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PredictResponse {
    #[serde(default)]
    pub predictions: Vec<Prediction>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    #[serde(default)]
    pub bytes_base64_encoded: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
}

/// Error envelope returned with non-2xx statuses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamErrorBody {
    pub error: UpstreamErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamErrorDetail {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: Option<String>,
}

fn string_field(description: &str) -> Value {
    json!({ "type": "STRING", "description": description })
}

fn color_field(role: &str, reason: &str) -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "hex": string_field(&format!("Hex code for the {role} color.")),
            "name": string_field("Name of the color."),
            "reason": string_field(reason),
        },
        "required": ["hex", "name", "reason"]
    })
}

fn font_field(font: &str, reason: &str) -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "font": string_field(font),
            "reason": string_field(reason),
        },
        "required": ["font", "reason"]
    })
}

/// Response schema for a brand identity. Every field is required so the
/// model cannot return a partial identity.
pub fn brand_identity_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "brandName": string_field("A creative and relevant name for the business."),
            "tagline": string_field("A short, memorable slogan."),
            "logoConcepts": {
                "type": "ARRAY",
                "description": "A list of three distinct logo concepts.",
                "minItems": 3,
                "maxItems": 3,
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "style": string_field("The style of the logo (e.g., Minimalist, Abstract, Emblem)."),
                        "description": string_field("A detailed visual description of the logo concept: shapes, elements, and how they relate to the business. Used as an image generation prompt."),
                    },
                    "required": ["style", "description"]
                }
            },
            "colorPalette": {
                "type": "OBJECT",
                "properties": {
                    "primary": color_field("primary", "Reason for choosing this color based on color psychology."),
                    "secondary": color_field("secondary", "Reason for choosing this color."),
                    "accent": color_field("accent", "Reason for choosing this color."),
                },
                "required": ["primary", "secondary", "accent"]
            },
            "typography": {
                "type": "OBJECT",
                "properties": {
                    "heading": font_field(
                        "Font name for headings (e.g., Poppins, Montserrat).",
                        "Reason for choosing this modern, bold sans-serif font."
                    ),
                    "body": font_field(
                        "Font name for body text (e.g., Open Sans, Lato).",
                        "Reason for choosing this readable sans-serif font."
                    ),
                },
                "required": ["heading", "body"]
            },
            "brandVoice": {
                "type": "ARRAY",
                "description": "A list of three adjectives describing the brand's voice.",
                "minItems": 3,
                "maxItems": 3,
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "adjective": string_field("An adjective that fits the brand voice."),
                        "reason": string_field("Why this adjective fits the brand voice."),
                    },
                    "required": ["adjective", "reason"]
                }
            }
        },
        "required": ["brandName", "tagline", "logoConcepts", "colorPalette", "typography", "brandVoice"]
    })
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
