use std::{fs, io, path::Path};

use anyhow::{bail, Context};
use serde::Deserialize;

pub const DEFAULT_SETTINGS_FILE: &str = "blueprint.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_key: Option<String>,
    pub api_base_url: String,
    pub text_model: String,
    pub image_model: String,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base_url: "https://generativelanguage.googleapis.com/v1beta".into(),
            text_model: "gemini-2.5-flash".into(),
            image_model: "imagen-3.0-generate-002".into(),
            request_timeout_secs: 120,
        }
    }
}

impl Settings {
    pub fn require_api_key(&self) -> anyhow::Result<&str> {
        match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => bail!("API_KEY environment variable not set"),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    api_key: Option<String>,
    api_base_url: Option<String>,
    text_model: Option<String>,
    image_model: Option<String>,
    request_timeout_secs: Option<u64>,
}

/// Defaults, then `path` if it exists, then process environment.
pub fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    let file_contents = match fs::read_to_string(path) {
        Ok(raw) => Some(raw),
        Err(err) if err.kind() == io::ErrorKind::NotFound => None,
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read {}", path.display()));
        }
    };
    resolve_settings(file_contents.as_deref(), |key| std::env::var(key).ok())
        .with_context(|| format!("invalid settings in {}", path.display()))
}

pub(crate) fn resolve_settings(
    file_contents: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    if let Some(raw) = file_contents {
        let file_cfg: FileSettings = toml::from_str(raw)?;
        if let Some(v) = file_cfg.api_key {
            settings.api_key = Some(v);
        }
        if let Some(v) = file_cfg.api_base_url {
            settings.api_base_url = v;
        }
        if let Some(v) = file_cfg.text_model {
            settings.text_model = v;
        }
        if let Some(v) = file_cfg.image_model {
            settings.image_model = v;
        }
        if let Some(v) = file_cfg.request_timeout_secs {
            settings.request_timeout_secs = v;
        }
    }

    if let Some(v) = env("GEMINI_API_KEY") {
        settings.api_key = Some(v);
    }
    if let Some(v) = env("API_KEY") {
        settings.api_key = Some(v);
    }

    if let Some(v) = env("APP__API_BASE_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = env("APP__TEXT_MODEL") {
        settings.text_model = v;
    }
    if let Some(v) = env("APP__IMAGE_MODEL") {
        settings.image_model = v;
    }
    if let Some(v) = env("APP__REQUEST_TIMEOUT_SECS") {
        settings.request_timeout_secs = v
            .parse()
            .with_context(|| format!("APP__REQUEST_TIMEOUT_SECS is not a number: {v:?}"))?;
    }

    if settings.request_timeout_secs == 0 {
        bail!("request timeout must be at least one second");
    }

    Ok(settings)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
