// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Server-side contact submission pipeline.
//!
//! Runs the same chain as the in-page form, keyed by client:
//! sanitize → rate limit check → validate → record → deliver.
//! Nothing from the browser is trusted, so every field is sanitized again.

use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::delivery::{send_with_timeout, DeliveryClient, EmailPayload};
use crate::error::SubmitError;
use crate::limiter::{RateLimitResult, RateLimiter};
use crate::metrics::{Metrics, OUTCOME_SENT};
use crate::validator::{FormData, FormValidator};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub struct ContactPipeline<C: Clock = SystemClock> {
    limiter: RateLimiter<C>,
    validator: FormValidator,
    delivery: Arc<dyn DeliveryClient>,
    metrics: Arc<Metrics>,
    to_name: String,
    timeout: Duration,
}

impl ContactPipeline<SystemClock> {
    pub fn new(config: &Config, delivery: Arc<dyn DeliveryClient>, metrics: Arc<Metrics>) -> Self {
        Self::with_clock(config, delivery, metrics, SystemClock)
    }
}

impl<C: Clock> ContactPipeline<C> {
    pub fn with_clock(
        config: &Config,
        delivery: Arc<dyn DeliveryClient>,
        metrics: Arc<Metrics>,
        clock: C,
    ) -> Self {
        Self {
            limiter: RateLimiter::with_clock(config.rate_limit.clone(), clock),
            validator: FormValidator::new(config.validation.clone()),
            delivery,
            metrics,
            to_name: config.delivery.to_name.clone(),
            timeout: config.form.delivery_timeout(),
        }
    }

    pub fn limiter(&self) -> &RateLimiter<C> {
        &self.limiter
    }

    /// Submit a form on behalf of `client`.
    pub async fn submit(&self, client: &str, raw: &FormData) -> Result<(), SubmitError> {
        let result = self.run(client, raw).await;
        match &result {
            Ok(()) => self.metrics.record_submission(OUTCOME_SENT),
            Err(e) => self.metrics.record_submission(e.code()),
        }
        result
    }

    async fn run(&self, client: &str, raw: &FormData) -> Result<(), SubmitError> {
        let data = raw.sanitized();

        if let RateLimitResult::Limited { retry_after } = self.limiter.check(client).await {
            info!(client, retry_after_secs = retry_after.as_secs(), "Submission rate limited");
            return Err(SubmitError::RateLimited { retry_after });
        }

        let errors = self.validator.validate(&data);
        if !data.honeypot.is_empty() {
            warn!(client, "Honeypot filled, dropping submission");
            return Err(SubmitError::BotDetected);
        }
        if !errors.is_empty() {
            info!(client, fields = ?errors.keys().collect::<Vec<_>>(), "Validation failed");
            return Err(SubmitError::Invalid(errors));
        }

        if let RateLimitResult::Limited { retry_after } = self.limiter.try_record(client).await {
            return Err(SubmitError::RateLimited { retry_after });
        }

        let payload = EmailPayload {
            from_name: data.name,
            from_email: data.email,
            message: data.message,
            to_name: self.to_name.clone(),
        };

        let started = Instant::now();
        let outcome = send_with_timeout(self.delivery.as_ref(), &payload, self.timeout).await;
        self.metrics
            .observe_delivery(outcome.is_ok(), started.elapsed().as_secs_f64());

        match outcome {
            Ok(()) => {
                debug!(client, "Contact message delivered");
                Ok(())
            }
            Err(e) => {
                warn!(client, error = %e, "Contact message delivery failed");
                Err(SubmitError::Delivery(e))
            }
        }
    }
}
