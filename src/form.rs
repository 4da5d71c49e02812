// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact form state machine.
//!
//! ```text
//! Idle --submit--> Submitting --ok--> Succeeded --reset delay--> Idle
//!                       \--err--> Idle (general error set, data kept)
//! ```
//!
//! A submission only reaches the delivery client when the form is idle, the
//! rate limiter allows it, the honeypot is empty and the validator reports
//! no errors. Timers are deadlines checked by [`ContactForm::tick`]; the
//! [`session`](crate::session) module drives the tick while a form is
//! mounted.

use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::delivery::{send_with_timeout, DeliveryClient, DeliveryError, EmailPayload};
use crate::error::SubmitError;
use crate::limiter::{RateLimitResult, SubmissionLog};
use crate::sanitizer::sanitize;
use crate::validator::{ErrorKey, Field, FormData, FormErrors, FormValidator};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Submission phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Submitting,
    Succeeded,
}

/// Everything the surrounding UI needs to render the form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormView {
    pub data: FormData,
    pub errors: FormErrors,
    pub is_submitting: bool,
    pub submitted: bool,
    pub is_rate_limited: bool,
    /// Remaining cooldown in milliseconds
    pub time_to_reset_ms: u64,
}

impl FormView {
    pub fn time_to_reset(&self) -> Duration {
        Duration::from_millis(self.time_to_reset_ms)
    }
}

/// One contact form instance and its submission history.
pub struct ContactForm<C: Clock = SystemClock> {
    data: FormData,
    errors: FormErrors,
    phase: Phase,
    log: SubmissionLog,
    rate: RateLimitResult,
    reset_at: Option<u64>,
    validator: FormValidator,
    config: Config,
    clock: C,
}

impl ContactForm<SystemClock> {
    pub fn new(config: Config) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> ContactForm<C> {
    pub fn with_clock(config: Config, clock: C) -> Self {
        Self {
            data: FormData::default(),
            errors: FormErrors::default(),
            phase: Phase::Idle,
            log: SubmissionLog::new(),
            rate: RateLimitResult::Allowed {
                remaining: config.rate_limit.max_submissions,
            },
            reset_at: None,
            validator: FormValidator::new(config.validation.clone()),
            config,
            clock,
        }
    }

    pub fn data(&self) -> &FormData {
        &self.data
    }

    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Store a sanitized keystroke. Editing a field clears its error.
    pub fn on_field_change(&mut self, field: Field, raw: &str) {
        let value = sanitize(raw);
        self.data.set(field, value);
        if field != Field::Honeypot {
            self.errors.remove(ErrorKey::from(field));
        }
    }

    /// Recompute the rate limit state and fire the post-success reset once
    /// its deadline passes.
    pub fn tick(&mut self) {
        let now = self.clock.now_ms();
        self.rate = self.log.check(now, &self.config.rate_limit);

        if let Some(at) = self.reset_at {
            if now >= at {
                debug!("Resetting form after successful send");
                self.data = FormData::default();
                self.phase = Phase::Idle;
                self.reset_at = None;
            }
        }
    }

    /// Try to move from idle to submitting.
    ///
    /// On success the submission is recorded, errors are cleared and the
    /// payload to deliver is returned. On rejection the reason is also
    /// written into the form's errors.
    pub fn begin_submit(&mut self) -> Result<EmailPayload, SubmitError> {
        match self.phase {
            Phase::Submitting => return Err(SubmitError::InProgress),
            Phase::Succeeded => return Err(SubmitError::AlreadySent),
            Phase::Idle => {}
        }

        let now = self.clock.now_ms();
        self.rate = self.log.check(now, &self.config.rate_limit);
        if let RateLimitResult::Limited { retry_after } = self.rate {
            let err = SubmitError::RateLimited { retry_after };
            self.errors = err.to_form_errors();
            warn!(retry_after_ms = retry_after.as_millis() as u64, "Submission blocked by rate limit");
            return Err(err);
        }

        let errors = self.validator.validate(&self.data);
        if !errors.is_empty() {
            let err = if self.data.honeypot.is_empty() {
                SubmitError::Invalid(errors)
            } else {
                SubmitError::BotDetected
            };
            self.errors = err.to_form_errors();
            info!(code = err.code(), "Submission rejected");
            return Err(err);
        }

        self.log.record(now, &self.config.rate_limit);
        self.rate = self.log.check(now, &self.config.rate_limit);
        self.errors.clear();
        self.phase = Phase::Submitting;

        Ok(EmailPayload {
            from_name: self.data.name.clone(),
            from_email: self.data.email.clone(),
            message: self.data.message.clone(),
            to_name: self.config.delivery.to_name.clone(),
        })
    }

    /// Apply the delivery outcome for the submission in flight.
    pub fn finish_submit(&mut self, outcome: Result<(), DeliveryError>) -> Result<(), SubmitError> {
        if self.phase != Phase::Submitting {
            debug!(phase = ?self.phase, "Ignoring delivery outcome outside a submission");
            return Ok(());
        }

        match outcome {
            Ok(()) => {
                info!("Contact message sent");
                self.phase = Phase::Succeeded;
                self.reset_at = Some(self.clock.now_ms() + self.config.form.reset_delay_ms);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Contact message delivery failed");
                let err = SubmitError::Delivery(e);
                self.errors = err.to_form_errors();
                self.phase = Phase::Idle;
                Err(err)
            }
        }
    }

    /// Run a whole submission against `client`.
    pub async fn submit<D: DeliveryClient + ?Sized>(&mut self, client: &D) -> Result<(), SubmitError> {
        let payload = self.begin_submit()?;
        let outcome = send_with_timeout(client, &payload, self.config.form.delivery_timeout()).await;
        self.finish_submit(outcome)
    }

    /// Snapshot for rendering.
    pub fn view(&self) -> FormView {
        FormView {
            data: self.data.clone(),
            errors: self.errors.clone(),
            is_submitting: self.phase == Phase::Submitting,
            submitted: self.phase == Phase::Succeeded,
            is_rate_limited: self.rate.is_limited(),
            time_to_reset_ms: self.rate.retry_after().as_millis() as u64,
        }
    }
}
