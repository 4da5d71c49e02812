// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the portfolio contact service.
//!
//! Defaults reproduce the behaviour of the contact form as shipped:
//! three submissions per minute, a five minute cooldown once tripped and
//! a five second pause before the form clears after a successful send.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// Configuration for the portfolio contact service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address (default: 0.0.0.0:8080)
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Submission rate limiting
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Field validation bounds
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Form lifecycle timings
    #[serde(default)]
    pub form: FormConfig,

    /// Email delivery collaborator
    #[serde(default)]
    pub delivery: DeliveryConfig,

    /// Metrics configuration
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Sliding-window rate limiting for contact submissions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Submissions allowed inside one window (default: 3)
    #[serde(default = "default_max_submissions")]
    pub max_submissions: usize,

    /// Counting window in milliseconds (default: 60000)
    #[serde(default = "default_window_ms")]
    pub window_ms: u64,

    /// Wait imposed once the limit trips, measured from the oldest
    /// submission still in the window (default: 300000)
    #[serde(default = "default_cooldown_ms")]
    pub cooldown_ms: u64,

    /// How often a mounted form recomputes its limit state (default: 1000)
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

/// Length bounds applied by the form validator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    #[serde(default = "default_name_min")]
    pub name_min_len: usize,

    #[serde(default = "default_name_max")]
    pub name_max_len: usize,

    #[serde(default = "default_email_max")]
    pub email_max_len: usize,

    #[serde(default = "default_message_min")]
    pub message_min_len: usize,

    #[serde(default = "default_message_max")]
    pub message_max_len: usize,
}

/// Timings for the submission state machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormConfig {
    /// Delay before a successfully sent form clears itself (default: 5000)
    #[serde(default = "default_reset_delay_ms")]
    pub reset_delay_ms: u64,

    /// Upper bound on a single delivery call (default: 15000)
    #[serde(default = "default_delivery_timeout_ms")]
    pub delivery_timeout_ms: u64,
}

/// Identifiers for the transactional email service.
///
/// The identifiers are opaque; only their presence is checked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryConfig {
    #[serde(default = "default_delivery_endpoint")]
    pub endpoint: String,

    #[serde(default)]
    pub service_id: String,

    #[serde(default)]
    pub template_id: String,

    #[serde(default)]
    pub public_key: String,

    /// Recipient display name placed in every payload
    #[serde(default = "default_to_name")]
    pub to_name: String,
}

/// Metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Enable Prometheus metrics endpoint (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Metrics endpoint path (default: /metrics)
    #[serde(default = "default_metrics_path")]
    pub path: String,
}

// Default value functions
fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_max_submissions() -> usize {
    3
}

fn default_window_ms() -> u64 {
    60_000
}

fn default_cooldown_ms() -> u64 {
    300_000
}

fn default_poll_interval_ms() -> u64 {
    1_000
}

fn default_name_min() -> usize {
    2
}

fn default_name_max() -> usize {
    50
}

fn default_email_max() -> usize {
    254 // RFC 5321 path limit
}

fn default_message_min() -> usize {
    10
}

fn default_message_max() -> usize {
    1000
}

fn default_reset_delay_ms() -> u64 {
    5_000
}

fn default_delivery_timeout_ms() -> u64 {
    15_000
}

fn default_delivery_endpoint() -> String {
    "https://api.emailjs.com/api/v1.0/email/send".to_string()
}

fn default_to_name() -> String {
    "Portfolio Owner".to_string()
}

fn default_true() -> bool {
    true
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            rate_limit: RateLimitConfig::default(),
            validation: ValidationConfig::default(),
            form: FormConfig::default(),
            delivery: DeliveryConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_submissions: default_max_submissions(),
            window_ms: default_window_ms(),
            cooldown_ms: default_cooldown_ms(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            name_min_len: default_name_min(),
            name_max_len: default_name_max(),
            email_max_len: default_email_max(),
            message_min_len: default_message_min(),
            message_max_len: default_message_max(),
        }
    }
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            reset_delay_ms: default_reset_delay_ms(),
            delivery_timeout_ms: default_delivery_timeout_ms(),
        }
    }
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            endpoint: default_delivery_endpoint(),
            service_id: String::new(),
            template_id: String::new(),
            public_key: String::new(),
            to_name: default_to_name(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            path: default_metrics_path(),
        }
    }
}

impl RateLimitConfig {
    /// Get the polling interval for mounted forms
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

impl FormConfig {
    pub fn delivery_timeout(&self) -> Duration {
        Duration::from_millis(self.delivery_timeout_ms)
    }
}

impl DeliveryConfig {
    /// Check that every identifier is present and the endpoint is a URL.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("EMAILJS_SERVICE_ID", &self.service_id),
            ("EMAILJS_TEMPLATE_ID", &self.template_id),
            ("EMAILJS_PUBLIC_KEY", &self.public_key),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Missing(key));
            }
        }

        let endpoint = url::Url::parse(&self.endpoint).map_err(|_| ConfigError::InvalidUrl {
            key: "EMAILJS_ENDPOINT",
            url: self.endpoint.clone(),
        })?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl {
                key: "EMAILJS_ENDPOINT",
                url: self.endpoint.clone(),
            });
        }

        Ok(())
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let rate_limit = RateLimitConfig {
            max_submissions: parse_or(&lookup, "RATE_MAX_SUBMISSIONS", defaults.rate_limit.max_submissions)?,
            window_ms: parse_or(&lookup, "RATE_WINDOW_MS", defaults.rate_limit.window_ms)?,
            cooldown_ms: parse_or(&lookup, "RATE_COOLDOWN_MS", defaults.rate_limit.cooldown_ms)?,
            poll_interval_ms: parse_or(&lookup, "RATE_POLL_INTERVAL_MS", defaults.rate_limit.poll_interval_ms)?,
        };

        let form = FormConfig {
            reset_delay_ms: parse_or(&lookup, "FORM_RESET_DELAY_MS", defaults.form.reset_delay_ms)?,
            delivery_timeout_ms: parse_or(&lookup, "DELIVERY_TIMEOUT_MS", defaults.form.delivery_timeout_ms)?,
        };

        let delivery = DeliveryConfig {
            endpoint: lookup("EMAILJS_ENDPOINT").unwrap_or(defaults.delivery.endpoint),
            service_id: lookup("EMAILJS_SERVICE_ID").unwrap_or_default(),
            template_id: lookup("EMAILJS_TEMPLATE_ID").unwrap_or_default(),
            public_key: lookup("EMAILJS_PUBLIC_KEY").unwrap_or_default(),
            to_name: lookup("CONTACT_TO_NAME").unwrap_or(defaults.delivery.to_name),
        };

        let metrics = MetricsConfig {
            enabled: parse_or(&lookup, "METRICS_ENABLED", defaults.metrics.enabled)?,
            ..defaults.metrics
        };

        Ok(Config {
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            rate_limit,
            validation: defaults.validation,
            form,
            delivery,
            metrics,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue { key, value: raw }),
        None => Ok(default),
    }
}
