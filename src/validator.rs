// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact form validator.
//!
//! Implements the form's validation rules:
//! - Honeypot check (any content marks the submission as a bot)
//! - Name presence, length and character set
//! - Email presence, shape and length
//! - Message presence and length
//! - Suspicious content scan across all visible fields
//!
//! Every field rule runs; the result lists all failures at once.

use crate::config::ValidationConfig;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// General error reported when the honeypot field is filled.
pub const SPAM_DETECTED: &str = "Spam detected";

/// General error reported when the suspicious content scan matches.
pub const SUSPICIOUS_CONTENT: &str = "Message contains suspicious content";

static NAME_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\p{L}\s'-]+$").expect("Invalid regex: name pattern"));

static EMAIL_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid regex: email pattern"));

/// Patterns that mark a submission as likely spam or data leakage.
static SUSPICIOUS_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // Spam vocabulary
        r"(?i)\b(viagra|cialis|casino|lottery|jackpot|bitcoin|forex|payday loan|free money|click here|buy now|make money fast|seo services)\b",
        // Embedded links
        r"(?i)(https?://|www\.)\S+",
        // Card-number-like digit groups
        r"\b(?:\d{4}[ -]?){3}\d{4}\b",
    ]
    .into_iter()
    .map(|p| Regex::new(p).expect("Invalid regex: suspicious content pattern"))
    .collect()
});

/// Raw contact form values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormData {
    pub name: String,
    pub email: String,
    pub message: String,
    /// Hidden from humans; must stay empty.
    #[serde(alias = "website")]
    pub honeypot: String,
}

/// An editable form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Name,
    Email,
    Message,
    Honeypot,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Message => "message",
            Self::Honeypot => "honeypot",
        }
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Self::Name),
            "email" => Ok(Self::Email),
            "message" => Ok(Self::Message),
            "honeypot" | "website" => Ok(Self::Honeypot),
            other => Err(format!("unknown form field: {other}")),
        }
    }
}

impl FormData {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Message => &self.message,
            Field::Honeypot => &self.honeypot,
        }
    }

    pub fn set(&mut self, field: Field, value: String) {
        match field {
            Field::Name => self.name = value,
            Field::Email => self.email = value,
            Field::Message => self.message = value,
            Field::Honeypot => self.honeypot = value,
        }
    }

    /// Return a copy with every field passed through the sanitizer.
    pub fn sanitized(&self) -> Self {
        Self {
            name: crate::sanitizer::sanitize(&self.name),
            email: crate::sanitizer::sanitize(&self.email),
            message: crate::sanitizer::sanitize(&self.message),
            honeypot: crate::sanitizer::sanitize(&self.honeypot),
        }
    }
}

/// Key of an entry in [`FormErrors`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKey {
    Name,
    Email,
    Message,
    General,
}

impl fmt::Display for ErrorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Message => "message",
            Self::General => "general",
        };
        f.write_str(s)
    }
}

impl From<Field> for ErrorKey {
    fn from(field: Field) -> Self {
        match field {
            Field::Name => Self::Name,
            Field::Email => Self::Email,
            Field::Message => Self::Message,
            Field::Honeypot => Self::General,
        }
    }
}

/// Field → error message. An absent key means the field is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<ErrorKey, String>);

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, key: ErrorKey) -> Option<&str> {
        self.0.get(&key).map(String::as_str)
    }

    pub fn general(&self) -> Option<&str> {
        self.get(ErrorKey::General)
    }

    pub fn insert(&mut self, key: ErrorKey, message: impl Into<String>) {
        self.0.insert(key, message.into());
    }

    pub fn set_general(&mut self, message: impl Into<String>) {
        self.insert(ErrorKey::General, message);
    }

    pub fn remove(&mut self, key: ErrorKey) -> Option<String> {
        self.0.remove(&key)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn keys(&self) -> impl Iterator<Item = ErrorKey> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ErrorKey, &str)> + '_ {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

/// Contact form validator.
#[derive(Debug, Clone, Default)]
pub struct FormValidator {
    config: ValidationConfig,
}

impl FormValidator {
    /// Create a new validator with the given bounds.
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Validate a complete form. An empty result means the form is valid.
    pub fn validate(&self, data: &FormData) -> FormErrors {
        let mut errors = FormErrors::default();

        if !data.honeypot.is_empty() {
            debug!("Honeypot filled");
            errors.set_general(SPAM_DETECTED);
            return errors;
        }

        if let Some(msg) = self.check_name(&data.name) {
            errors.insert(ErrorKey::Name, msg);
        }
        if let Some(msg) = self.check_email(&data.email) {
            errors.insert(ErrorKey::Email, msg);
        }
        if let Some(msg) = self.check_message(&data.message) {
            errors.insert(ErrorKey::Message, msg);
        }

        let combined = format!("{} {} {}", data.name, data.email, data.message);
        if is_suspicious(&combined) {
            debug!("Suspicious content matched");
            errors.set_general(SUSPICIOUS_CONTENT);
        }

        if !errors.is_empty() {
            debug!(fields = ?errors.keys().collect::<Vec<_>>(), "Form invalid");
        }
        errors
    }

    /// Validate the name field.
    pub fn check_name(&self, name: &str) -> Option<String> {
        let name = name.trim();
        let len = name.chars().count();
        if name.is_empty() {
            Some("Name is required".to_string())
        } else if len < self.config.name_min_len {
            Some(format!("Name must be at least {} characters", self.config.name_min_len))
        } else if len > self.config.name_max_len {
            Some(format!("Name must be no more than {} characters", self.config.name_max_len))
        } else if !NAME_CHARS.is_match(name) {
            Some("Name can only contain letters, spaces, hyphens, and apostrophes".to_string())
        } else {
            None
        }
    }

    /// Validate the email field.
    pub fn check_email(&self, email: &str) -> Option<String> {
        let email = email.trim();
        if email.is_empty() {
            Some("Email is required".to_string())
        } else if !EMAIL_SHAPE.is_match(email) {
            Some("Please enter a valid email address".to_string())
        } else if email.chars().count() > self.config.email_max_len {
            Some("Email address is too long".to_string())
        } else {
            None
        }
    }

    /// Validate the message field.
    pub fn check_message(&self, message: &str) -> Option<String> {
        let message = message.trim();
        let len = message.chars().count();
        if message.is_empty() {
            Some("Message is required".to_string())
        } else if len < self.config.message_min_len {
            Some(format!("Message must be at least {} characters", self.config.message_min_len))
        } else if len > self.config.message_max_len {
            Some(format!(
                "Message must be no more than {} characters",
                self.config.message_max_len
            ))
        } else {
            None
        }
    }
}

/// Check text against the suspicious content patterns.
pub fn is_suspicious(text: &str) -> bool {
    SUSPICIOUS_PATTERNS.iter().any(|p| p.is_match(text))
}
