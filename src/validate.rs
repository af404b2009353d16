//! Field rules for the entry form.
//!
//! Every rule returns `Result<(), ValidationError>`; the `Display` of the error
//! is the exact message shown next to the offending input.

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

use crate::types::AvatarFile;

/// Largest accepted avatar, in bytes (500 KiB).
pub const MAX_AVATAR_BYTES: u64 = 500 * 1024;

/// Neutral hint shown under the dropzone when the avatar is fine.
pub const AVATAR_HINT: &str = "Upload your photo (JPG or PNG, max size: 500KB).";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Full Name is required")]
    FullNameRequired,
    #[error("Email is required")]
    EmailRequired,
    #[error("Please enter a valid email address.")]
    EmailInvalid,
    #[error("Username is required")]
    UsernameRequired,
    #[error("Avatar is required")]
    AvatarRequired,
    #[error("File too large. Please upload a photo under 500KB.")]
    AvatarTooLarge,
}

pub fn full_name(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::FullNameRequired);
    }
    Ok(())
}

pub fn email(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::EmailRequired);
    }
    if !is_valid_email(value) {
        return Err(ValidationError::EmailInvalid);
    }
    Ok(())
}

pub fn username(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::UsernameRequired);
    }
    Ok(())
}

pub fn avatar(file: Option<&AvatarFile>) -> Result<(), ValidationError> {
    match file {
        None => Err(ValidationError::AvatarRequired),
        Some(f) if f.size > MAX_AVATAR_BYTES => Err(ValidationError::AvatarTooLarge),
        Some(_) => Ok(()),
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        let pattern = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Checks `value` against `^[^\s@]+@[^\s@]+\.[^\s@]+$`.
///
/// `\s` is the Unicode `White_Space` class. Unlike a browser's `\s`, it
/// contains U+0085 (NEXT LINE) and does not contain U+FEFF (BYTE ORDER MARK),
/// so those two characters are treated the other way round.
pub fn is_valid_email(value: &str) -> bool {
    email_regex().is_match(value)
}

/// Prefix the handle with `@` unless it already starts with one.
pub fn normalize_username(value: &str) -> String {
    if value.starts_with('@') {
        value.to_string()
    } else {
        format!("@{}", value)
    }
}
