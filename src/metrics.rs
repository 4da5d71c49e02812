// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Prometheus metrics for contact submissions.

use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};

/// Outcome label for submissions the delivery service accepted.
pub const OUTCOME_SENT: &str = "sent";

pub struct Metrics {
    registry: Registry,
    submissions: IntCounterVec,
    delivery_seconds: HistogramVec,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let submissions = IntCounterVec::new(
            Opts::new("contact_submissions_total", "Contact form submissions by outcome"),
            &["outcome"],
        )?;
        let delivery_seconds = HistogramVec::new(
            HistogramOpts::new(
                "contact_delivery_duration_seconds",
                "Time spent waiting on the email delivery service",
            )
            .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 15.0]),
            &["result"],
        )?;

        registry.register(Box::new(submissions.clone()))?;
        registry.register(Box::new(delivery_seconds.clone()))?;

        Ok(Self {
            registry,
            submissions,
            delivery_seconds,
        })
    }

    /// Count one submission. `outcome` is [`OUTCOME_SENT`] or a rejection code.
    pub fn record_submission(&self, outcome: &str) {
        self.submissions.with_label_values(&[outcome]).inc();
    }

    pub fn observe_delivery(&self, ok: bool, seconds: f64) {
        let result = if ok { "ok" } else { "error" };
        self.delivery_seconds.with_label_values(&[result]).observe(seconds);
    }

    pub fn submissions(&self, outcome: &str) -> u64 {
        self.submissions.with_label_values(&[outcome]).get()
    }

    /// Render all metrics in the Prometheus text format.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buf)?;
        String::from_utf8(buf).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
