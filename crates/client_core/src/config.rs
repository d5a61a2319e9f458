//! Client settings: defaults, then `deck.toml`, then environment overrides.

use std::{collections::HashMap, fs, path::Path, time::Duration};

use anyhow::Context;
use url::Url;

use crate::error::{ClientError, ClientResult};

pub const SETTINGS_FILE: &str = "deck.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub backend_url: String,
    pub token: Option<String>,
    pub request_timeout_secs: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            backend_url: "http://127.0.0.1:8000".into(),
            token: None,
            request_timeout_secs: 30,
        }
    }
}

impl ClientSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

/// Defaults, then `deck.toml` in the working directory, then the environment.
pub fn load_settings() -> ClientSettings {
    let mut settings = ClientSettings::default();

    match read_settings_file(Path::new(SETTINGS_FILE)) {
        Ok(Some(file_cfg)) => apply_file_settings(&mut settings, &file_cfg),
        Ok(None) => {}
        Err(err) => tracing::warn!(error = %err, "ignoring unreadable settings file"),
    }

    apply_env_settings(&mut settings, |key| std::env::var(key).ok());
    settings
}

pub fn read_settings_file(path: &Path) -> anyhow::Result<Option<HashMap<String, toml::Value>>> {
    if !path.exists() {
        return Ok(None);
    }

    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read settings file '{}'", path.display()))?;
    let parsed = toml::from_str::<HashMap<String, toml::Value>>(&raw)
        .with_context(|| format!("failed to parse settings file '{}'", path.display()))?;
    Ok(Some(parsed))
}

pub fn apply_file_settings(settings: &mut ClientSettings, file_cfg: &HashMap<String, toml::Value>) {
    if let Some(v) = file_cfg.get("backend_url").and_then(toml::Value::as_str) {
        settings.backend_url = v.to_string();
    }
    if let Some(v) = file_cfg.get("token").and_then(toml::Value::as_str) {
        settings.token = Some(v.to_string());
    }
    if let Some(v) = file_cfg
        .get("request_timeout_secs")
        .and_then(toml::Value::as_integer)
    {
        if let Ok(secs) = u64::try_from(v) {
            settings.request_timeout_secs = secs;
        }
    }
}

pub fn apply_env_settings(settings: &mut ClientSettings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("DECK_BACKEND_URL") {
        settings.backend_url = v;
    }
    if let Some(v) = lookup("APP__BACKEND_URL") {
        settings.backend_url = v;
    }

    if let Some(v) = lookup("DECK_TOKEN") {
        settings.token = Some(v);
    }
    if let Some(v) = lookup("APP__TOKEN") {
        settings.token = Some(v);
    }

    if let Some(v) = lookup("APP__REQUEST_TIMEOUT_SECS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.request_timeout_secs = parsed;
        }
    }

    if settings
        .token
        .as_deref()
        .is_some_and(|token| token.trim().is_empty())
    {
        settings.token = None;
    }
}

pub fn normalize_backend_url(raw: &str) -> ClientResult<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Ok(ClientSettings::default().backend_url);
    }

    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    };

    let parsed = Url::parse(&candidate)
        .map_err(|err| ClientError::Config(format!("invalid backend url '{raw}': {err}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ClientError::Config(format!(
            "unsupported backend url scheme '{}'",
            parsed.scheme()
        )));
    }

    Ok(candidate)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
