// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Error types for the contact pipeline.

use crate::delivery::DeliveryError;
use crate::validator::{FormErrors, SPAM_DETECTED};
use std::time::Duration;
use thiserror::Error;

/// Why a submission did not reach, or did not get through, the delivery service.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("form has {} invalid field(s)", .0.len())]
    Invalid(FormErrors),

    #[error("honeypot field was filled in")]
    BotDetected,

    #[error("rate limited, retry in {}s", .retry_after.as_secs())]
    RateLimited { retry_after: Duration },

    #[error("delivery failed: {0}")]
    Delivery(#[from] DeliveryError),

    #[error("a submission is already in flight")]
    InProgress,

    #[error("message already sent")]
    AlreadySent,
}

impl SubmitError {
    /// Short machine-readable code for API responses and metric labels.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Invalid(_) => "INVALID",
            Self::BotDetected => "SPAM",
            Self::RateLimited { .. } => "RATE_LIMITED",
            Self::Delivery(_) => "DELIVERY_FAILED",
            Self::InProgress => "IN_PROGRESS",
            Self::AlreadySent => "ALREADY_SENT",
        }
    }

    /// The message shown to the user in the form's general error slot.
    pub fn general_message(&self) -> Option<String> {
        match self {
            Self::Invalid(errors) => errors.general().map(str::to_string),
            Self::BotDetected => Some(SPAM_DETECTED.to_string()),
            Self::RateLimited { retry_after } => Some(rate_limit_message(*retry_after)),
            Self::Delivery(err) => Some(err.user_message()),
            Self::InProgress | Self::AlreadySent => None,
        }
    }

    /// Render this rejection as the error map shown next to the form.
    pub fn to_form_errors(&self) -> FormErrors {
        match self {
            Self::Invalid(errors) => errors.clone(),
            other => {
                let mut errors = FormErrors::default();
                if let Some(message) = other.general_message() {
                    errors.set_general(message);
                }
                errors
            }
        }
    }
}

/// Human-readable wait estimate, rounded up to whole minutes (or seconds
/// when under a minute).
pub fn rate_limit_message(retry_after: Duration) -> String {
    let secs = retry_after.as_millis().div_ceil(1000) as u64;
    let wait = if secs >= 60 {
        let minutes = secs.div_ceil(60);
        format!("{} minute{}", minutes, if minutes == 1 { "" } else { "s" })
    } else {
        let secs = secs.max(1);
        format!("{} second{}", secs, if secs == 1 { "" } else { "s" })
    };
    format!("Too many submissions. Please wait {} before trying again.", wait)
}

/// Configuration errors raised at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required setting: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("Invalid URL for {key}: {url}")]
    InvalidUrl { key: &'static str, url: String },
}
