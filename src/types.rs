use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::EventInfo;

/// Text inputs of the entry form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    FullName,
    Email,
    Username,
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Field::FullName => write!(f, "full name"),
            Field::Email => write!(f, "email"),
            Field::Username => write!(f, "username"),
        }
    }
}

/// Which top-level view is visible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Entry,
    Ticket,
}

/// Avatar upload pane: the empty dropzone or the preview of an accepted file
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AvatarPane {
    #[default]
    Empty,
    Preview(AvatarRef),
}

/// Info line under the dropzone
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvatarStatus {
    Info(String),
    Warning(String),
}

impl AvatarStatus {
    pub fn message(&self) -> &str {
        match self {
            AvatarStatus::Info(m) | AvatarStatus::Warning(m) => m,
        }
    }

    pub fn is_warning(&self) -> bool {
        matches!(self, AvatarStatus::Warning(_))
    }
}

/// A file handed to the form through the picker or a drop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarFile {
    pub name: String,
    pub size: u64,
    pub data: Vec<u8>,
}

impl AvatarFile {
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            size: data.len() as u64,
            data,
        }
    }

    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        use anyhow::Context;

        let data = std::fs::read(path)
            .with_context(|| format!("Failed to read avatar {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(name, data))
    }
}

/// Displayable handle for an accepted avatar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvatarRef {
    pub url: String,
    pub file_name: String,
    pub sha256: String,
}

/// Everything the user has entered so far
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub full_name: String,
    pub email: String,
    pub username: String,
    pub avatar: Option<AvatarRef>,
}

/// A generated ticket. Built once on a successful submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub number: u32,
    pub full_name: String,
    pub email: String,
    pub username: String,
    pub avatar: AvatarRef,
    pub event: EventInfo,
    pub issued: DateTime<Utc>,
}

impl Ticket {
    /// Ticket number as printed on the card, e.g. "#609545"
    pub fn number_label(&self) -> String {
        format!("#{}", self.number)
    }

    pub fn headline(&self) -> String {
        format!("Congrats, {}! Your ticket is ready.", self.full_name)
    }

    pub fn subtitle(&self) -> String {
        format!(
            "We've emailed your ticket to {} and will send updates in the run up to the event.",
            self.email
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_ticket() -> Ticket {
        Ticket {
            number: 609545,
            full_name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            username: "@jane".to_string(),
            avatar: AvatarRef {
                url: "blob:ticket-form/abc".to_string(),
                file_name: "jane.png".to_string(),
                sha256: "00".to_string(),
            },
            event: EventInfo::default(),
            issued: Utc::now(),
        }
    }

    #[test]
    fn number_label_is_hash_prefixed() {
        assert_eq!(sample_ticket().number_label(), "#609545");
    }

    #[test]
    fn hero_text_mentions_name_and_email() {
        let ticket = sample_ticket();
        assert_eq!(ticket.headline(), "Congrats, Jane Doe! Your ticket is ready.");
        assert!(ticket.subtitle().contains("jane@example.com"));
    }

    #[test]
    fn avatar_file_size_tracks_data() {
        let file = AvatarFile::new("a.png", vec![0; 42]);
        assert_eq!(file.size, 42);
        assert_eq!(file.name, "a.png");
    }

    #[test]
    fn avatar_file_from_missing_path_fails() {
        let err = AvatarFile::from_path(Path::new("/nonexistent/avatar.png")).unwrap_err();
        assert!(err.to_string().contains("Failed to read avatar"));
    }
}
