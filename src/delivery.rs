// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Email delivery collaborator.
//!
//! The contact pipeline only knows the [`DeliveryClient`] trait; the
//! production implementation posts to the EmailJS REST API.

use crate::config::DeliveryConfig;
use crate::error::ConfigError;
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Message shown when the delivery service gave no usable error text.
pub const DELIVERY_FALLBACK: &str = "Failed to send message. Please try again later.";

/// Message shown when the delivery call exceeded its time budget.
pub const DELIVERY_TIMEOUT: &str = "The request timed out. Please try again.";

/// Longest service error text passed through to the user.
const MAX_SERVICE_MESSAGE_LEN: usize = 200;

/// Template parameters sent with every message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailPayload {
    pub from_name: String,
    pub from_email: String,
    pub message: String,
    pub to_name: String,
}

/// Delivery failures.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("delivery service rejected the message ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("no response within {0:?}")]
    Timeout(Duration),
}

impl DeliveryError {
    /// Text suitable for the form's general error slot.
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected { message, .. } => service_text(message)
                .unwrap_or(DELIVERY_FALLBACK)
                .to_string(),
            Self::Timeout(_) => DELIVERY_TIMEOUT.to_string(),
            Self::Transport(_) => DELIVERY_FALLBACK.to_string(),
        }
    }
}

/// Service error text, when it is a short single line without markup.
fn service_text(message: &str) -> Option<&str> {
    let text = message.trim();
    let plain = !text.is_empty()
        && text.chars().count() <= MAX_SERVICE_MESSAGE_LEN
        && !text.contains(['<', '>', '\n', '\r']);
    plain.then_some(text)
}

/// Sends a validated, sanitized message to its recipient.
#[async_trait]
pub trait DeliveryClient: Send + Sync {
    async fn send(&self, payload: &EmailPayload) -> Result<(), DeliveryError>;
}

/// Request body accepted by the EmailJS `email/send` endpoint.
#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: &'a EmailPayload,
}

/// EmailJS REST client.
pub struct EmailJsClient {
    endpoint: String,
    service_id: String,
    template_id: String,
    public_key: String,
    client: reqwest::Client,
}

impl EmailJsClient {
    /// Create a client; fails when an identifier is missing.
    pub fn new(config: &DeliveryConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            endpoint: config.endpoint.clone(),
            service_id: config.service_id.clone(),
            template_id: config.template_id.clone(),
            public_key: config.public_key.clone(),
            client: reqwest::Client::new(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl DeliveryClient for EmailJsClient {
    async fn send(&self, payload: &EmailPayload) -> Result<(), DeliveryError> {
        let body = SendRequest {
            service_id: &self.service_id,
            template_id: &self.template_id,
            user_id: &self.public_key,
            template_params: payload,
        };

        let response = self.client.post(&self.endpoint).json(&body).send().await?;
        let status = response.status();

        if status.is_success() {
            debug!(status = status.as_u16(), "Delivery accepted");
            Ok(())
        } else {
            let message = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body_len = message.len(), "Delivery rejected");
            Err(DeliveryError::Rejected {
                status: status.as_u16(),
                message,
            })
        }
    }
}

/// Run a delivery call with an upper time bound.
pub async fn send_with_timeout<D: DeliveryClient + ?Sized>(
    client: &D,
    payload: &EmailPayload,
    timeout: Duration,
) -> Result<(), DeliveryError> {
    match tokio::time::timeout(timeout, client.send(payload)).await {
        Ok(result) => result,
        Err(_) => Err(DeliveryError::Timeout(timeout)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> EmailPayload {
        EmailPayload {
            from_name: "Bob".into(),
            from_email: "bob@x.com".into(),
            message: "Hello there!".into(),
            to_name: "Portfolio Owner".into(),
        }
    }

    struct Stalled;

    #[async_trait]
    impl DeliveryClient for Stalled {
        async fn send(&self, _payload: &EmailPayload) -> Result<(), DeliveryError> {
            std::future::pending().await
        }
    }

    #[test]
    fn test_user_message_prefers_service_text() {
        let err = DeliveryError::Rejected {
            status: 400,
            message: "The Public Key is invalid".into(),
        };
        assert_eq!(err.user_message(), "The Public Key is invalid");

        let err = DeliveryError::Rejected {
            status: 502,
            message: "  ".into(),
        };
        assert_eq!(err.user_message(), DELIVERY_FALLBACK);
    }

    #[test]
    fn test_user_message_hides_error_pages() {
        let err = DeliveryError::Rejected {
            status: 503,
            message: "<!DOCTYPE html>\n<html><body><h1>503 Service Unavailable</h1></body></html>".into(),
        };
        assert_eq!(err.user_message(), DELIVERY_FALLBACK);

        let err = DeliveryError::Rejected {
            status: 500,
            message: "x".repeat(MAX_SERVICE_MESSAGE_LEN + 1),
        };
        assert_eq!(err.user_message(), DELIVERY_FALLBACK);

        let err = DeliveryError::Rejected {
            status: 500,
            message: "trace line one\ntrace line two".into(),
        };
        assert_eq!(err.user_message(), DELIVERY_FALLBACK);
    }

    #[test]
    fn test_request_body_shape() {
        let payload = payload();
        let body = SendRequest {
            service_id: "service_1",
            template_id: "template_1",
            user_id: "pk_1",
            template_params: &payload,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["service_id"], "service_1");
        assert_eq!(json["user_id"], "pk_1");
        assert_eq!(json["template_params"]["from_email"], "bob@x.com");
        assert_eq!(json["template_params"]["to_name"], "Portfolio Owner");
    }

    #[test]
    fn test_client_requires_identifiers() {
        assert!(EmailJsClient::new(&DeliveryConfig::default()).is_err());

        let config = DeliveryConfig {
            service_id: "s".into(),
            template_id: "t".into(),
            public_key: "k".into(),
            ..Default::default()
        };
        let client = EmailJsClient::new(&config).unwrap();
        assert_eq!(client.endpoint(), "https://api.emailjs.com/api/v1.0/email/send");
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_bounds_stalled_delivery() {
        let result = send_with_timeout(&Stalled, &payload(), Duration::from_secs(15)).await;
        let err = result.unwrap_err();
        assert!(matches!(err, DeliveryError::Timeout(_)));
        assert_eq!(err.user_message(), DELIVERY_TIMEOUT);
    }
}
