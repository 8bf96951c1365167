use crate::error::SettingsError;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};
use tracing::{info, warn};

lazy_static! {
    static ref WEBHOOK_URL: Regex =
        Regex::new(r"^https://hooks\.zapier\.com/hooks/catch/[A-Za-z0-9/_-]+/?$").unwrap();
}

/// User preferences that outlive a single request.
pub trait SettingsRepository: Send + Sync {
    fn webhook_url(&self) -> Option<String>;
    fn set_webhook_url(&self, url: String) -> Result<(), SettingsError>;
}

pub fn validate_webhook_url(url: &str) -> Result<(), SettingsError> {
    if WEBHOOK_URL.is_match(url) {
        Ok(())
    } else {
        Err(SettingsError::InvalidWebhookUrl(url.into()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub webhook_url: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct LocalSettings {
    settings: Arc<Mutex<Settings>>,
}

impl LocalSettings {
    pub fn new(webhook_url: Option<String>) -> Self {
        Self {
            settings: Arc::new(Mutex::new(Settings { webhook_url })),
        }
    }
}

impl SettingsRepository for LocalSettings {
    fn webhook_url(&self) -> Option<String> {
        self.settings.lock().unwrap().webhook_url.clone()
    }

    fn set_webhook_url(&self, url: String) -> Result<(), SettingsError> {
        validate_webhook_url(&url)?;
        self.settings.lock().unwrap().webhook_url = Some(url);
        Ok(())
    }
}

/// Settings stored as JSON, rewritten on every change.
#[derive(Debug)]
pub struct FileSettings {
    path: PathBuf,
    settings: Mutex<Settings>,
}

impl FileSettings {
    /// Loads `path`, or creates it with `fallback_url` if it doesn't exist yet.
    pub fn open(path: impl AsRef<Path>, fallback_url: Option<String>) -> Result<Self, SettingsError> {
        let path = path.as_ref().to_path_buf();

        let settings = if path.exists() {
            let settings: Settings = serde_json::from_str(&fs::read_to_string(&path)?)?;
            info!(path = %path.display(), "Loaded settings");
            settings
        } else {
            warn!(path = %path.display(), "No settings file found, creating a new one");
            let settings = Settings {
                webhook_url: fallback_url,
            };
            Self::write(&path, &settings)?;
            settings
        };

        Ok(Self {
            path,
            settings: Mutex::new(settings),
        })
    }

    fn write(path: &Path, settings: &Settings) -> Result<(), SettingsError> {
        fs::write(path, serde_json::to_string_pretty(settings)?)?;
        Ok(())
    }
}

impl SettingsRepository for FileSettings {
    fn webhook_url(&self) -> Option<String> {
        self.settings.lock().unwrap().webhook_url.clone()
    }

    fn set_webhook_url(&self, url: String) -> Result<(), SettingsError> {
        validate_webhook_url(&url)?;

        let mut settings = self.settings.lock().unwrap();
        let updated = Settings {
            webhook_url: Some(url),
        };
        Self::write(&self.path, &updated)?;
        *settings = updated;
        Ok(())
    }
}
