//! Brand kit export: markdown guidelines and logo image files.

use std::path::{Path, PathBuf};

use anyhow::Context;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use shared::domain::BrandIdentity;
use thiserror::Error;
use tracing::info;

pub const GUIDELINES_FILE_NAME: &str = "brand_guidelines.md";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("only base64 data URIs can be exported")]
    UnsupportedReference,
    #[error("image payload is not valid base64: {0}")]
    InvalidPayload(#[from] base64::DecodeError),
}

pub fn guidelines_markdown(identity: &BrandIdentity) -> String {
    let palette = &identity.color_palette;
    let mut md = format!("# {} - Brand Guidelines\n\n", identity.brand_name);
    md.push_str(&format!("**Tagline:** {}\n\n", identity.tagline));

    md.push_str("## Color Palette\n");
    for (role, color) in [
        ("Primary", &palette.primary),
        ("Secondary", &palette.secondary),
        ("Accent", &palette.accent),
    ] {
        md.push_str(&format!("* **{role} ({}):** {}\n", color.name, color.hex));
    }

    md.push_str("\n## Typography\n");
    md.push_str(&format!(
        "* **Heading Font:** {}\n",
        identity.typography.heading.font
    ));
    md.push_str(&format!("* **Body Font:** {}\n", identity.typography.body.font));

    md.push_str("\n## Brand Voice\n");
    for voice in &identity.brand_voice {
        md.push_str(&format!("* **{}:** {}\n", voice.adjective, voice.reason));
    }

    md.push_str("\n## Logo Concepts\n");
    for concept in &identity.logo_concepts {
        md.push_str(&format!("* **{}:** {}\n", concept.style, concept.description));
    }
    md
}

/// `"Modern Emblem"` -> `"modern_emblem_logo.png"`.
pub fn logo_file_name(style: &str) -> String {
    let stem: String = style
        .to_lowercase()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();
    format!("{stem}_logo.png")
}

pub fn decode_image_reference(reference: &str) -> Result<Vec<u8>, ExportError> {
    let payload = reference
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(";base64,"))
        .map(|(_, payload)| payload)
        .ok_or(ExportError::UnsupportedReference)?;
    Ok(STANDARD.decode(payload.trim())?)
}

/// Writes the guidelines and every generated logo into `dir`. Concepts
/// without an image are skipped.
pub async fn write_brand_kit(identity: &BrandIdentity, dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("failed to create {}", dir.display()))?;

    let mut written = Vec::new();
    let guidelines = dir.join(GUIDELINES_FILE_NAME);
    tokio::fs::write(&guidelines, guidelines_markdown(identity))
        .await
        .with_context(|| format!("failed to write {}", guidelines.display()))?;
    written.push(guidelines);

    for concept in &identity.logo_concepts {
        let Some(reference) = concept.image_url() else {
            continue;
        };
        let bytes = decode_image_reference(reference)
            .with_context(|| format!("cannot export logo {:?}", concept.style))?;
        let path = dir.join(logo_file_name(&concept.style));
        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("failed to write {}", path.display()))?;
        written.push(path);
    }

    info!(dir = %dir.display(), files = written.len(), "export: brand kit written");
    Ok(written)
}

#[cfg(test)]
#[path = "tests/export_tests.rs"]
mod tests;
