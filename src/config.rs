use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = ".ticket-form.yaml";
const CONFIG_ENV: &str = "TICKET_FORM_CONFIG";

/// Event printed on every ticket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventInfo {
    pub name: String,
    pub date: String,
    pub location: String,
}

impl Default for EventInfo {
    fn default() -> Self {
        Self {
            name: "Coding Conf".to_string(),
            date: "Jan 31, 2025".to_string(),
            location: "Austin, TX".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub event: EventInfo,
}

impl Config {
    /// Load configuration from the discovered file, or defaults if there is none.
    pub fn load() -> Result<Self> {
        match Self::find_config_file() {
            Some(path) => Self::load_from(&path),
            None => {
                tracing::debug!("no {} found, using defaults", CONFIG_FILE);
                Ok(Self::default())
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = Self::parse(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        tracing::debug!(path = %path.display(), event = %config.event.name, "loaded config");
        Ok(config)
    }

    fn parse(content: &str) -> Result<Self> {
        // An empty file is a valid, all-defaults config.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Find the config file: env var first, then current and parent directories.
    fn find_config_file() -> Option<PathBuf> {
        // An explicit path is used as given; a missing file fails in `load_from`.
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }

        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILE);
            if candidate.is_file() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }
}
