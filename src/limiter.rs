// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Sliding-window submission rate limiter.
//!
//! A [`SubmissionLog`] records submission timestamps. The entry that brings
//! the in-window count up to the limit starts a cooldown lasting until the
//! oldest in-window entry plus the cooldown period, so the block does not
//! lift early when the window rolls over. Checking drops entries older than
//! the window and never moves the cooldown.
//!
//! [`RateLimiter`] keeps one log per client for the HTTP service.

use crate::clock::{Clock, SystemClock};
use crate::config::RateLimitConfig;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Result of a rate limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitResult {
    /// Submission is allowed
    Allowed {
        /// Submissions left in the current window
        remaining: usize,
    },
    /// Submission is rate limited
    Limited {
        /// Time until the cooldown expires
        retry_after: Duration,
    },
}

impl RateLimitResult {
    pub fn is_limited(&self) -> bool {
        matches!(self, Self::Limited { .. })
    }

    /// Time until the block lifts; zero when allowed.
    pub fn retry_after(&self) -> Duration {
        match self {
            Self::Allowed { .. } => Duration::ZERO,
            Self::Limited { retry_after } => *retry_after,
        }
    }
}

/// Ordered submission timestamps (ms since epoch) for one form or client.
#[derive(Debug, Clone, Default)]
pub struct SubmissionLog {
    entries: Vec<u64>,
    cooldown_until: Option<u64>,
}

impl SubmissionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a log by recording existing timestamps, oldest first.
    pub fn from_entries(entries: impl IntoIterator<Item = u64>, config: &RateLimitConfig) -> Self {
        let mut log = Self::new();
        for t in entries {
            log.record(t, config);
        }
        log
    }

    /// Append a submission at `now_ms`.
    ///
    /// The entry that fills the window starts the cooldown, measured from
    /// the oldest entry still inside the window.
    pub fn record(&mut self, now_ms: u64, config: &RateLimitConfig) {
        self.entries.push(now_ms);

        let mut in_window = self
            .entries
            .iter()
            .copied()
            .filter(|&t| now_ms.saturating_sub(t) < config.window_ms);
        let Some(oldest) = in_window.next() else {
            return;
        };
        if 1 + in_window.count() >= config.max_submissions {
            let until = oldest.saturating_add(config.cooldown_ms);
            if until > now_ms && self.cooldown_until.map_or(true, |current| until > current) {
                self.cooldown_until = Some(until);
            }
        }
    }

    pub fn entries(&self) -> &[u64] {
        &self.entries
    }

    /// Forget entries that fell out of the window and an expired cooldown.
    pub fn prune(&mut self, now_ms: u64, config: &RateLimitConfig) {
        self.entries
            .retain(|&t| now_ms.saturating_sub(t) < config.window_ms);
        if self.cooldown_until.is_some_and(|until| now_ms >= until) {
            self.cooldown_until = None;
        }
    }

    /// Check whether another submission may go out at `now_ms`.
    ///
    /// The answer depends only on the recorded entries and `now_ms`; checking
    /// never changes when the block lifts.
    pub fn check(&mut self, now_ms: u64, config: &RateLimitConfig) -> RateLimitResult {
        self.prune(now_ms, config);

        if let Some(until) = self.cooldown_until {
            return RateLimitResult::Limited {
                retry_after: Duration::from_millis(until - now_ms),
            };
        }

        // Cooldown shorter than the window: wait for the oldest entry to age out.
        if self.entries.len() >= config.max_submissions {
            let until = self
                .entries
                .first()
                .map_or(now_ms, |&oldest| oldest.saturating_add(config.window_ms));
            return RateLimitResult::Limited {
                retry_after: Duration::from_millis(until.saturating_sub(now_ms)),
            };
        }

        RateLimitResult::Allowed {
            remaining: config.max_submissions - self.entries.len(),
        }
    }

    /// True when nothing in the log can affect a future check.
    pub fn is_idle(&self, now_ms: u64, config: &RateLimitConfig) -> bool {
        let in_window = self
            .entries
            .iter()
            .any(|&t| now_ms.saturating_sub(t) < config.window_ms);
        let cooling = self.cooldown_until.is_some_and(|until| now_ms < until);
        !in_window && !cooling
    }
}

/// Thread-safe per-client rate limiter.
pub struct RateLimiter<C: Clock = SystemClock> {
    /// Configuration
    config: RateLimitConfig,
    /// Per-client submission logs
    clients: Arc<RwLock<HashMap<String, SubmissionLog>>>,
    clock: C,
}

impl RateLimiter<SystemClock> {
    /// Create a new rate limiter on the system clock.
    pub fn new(config: RateLimitConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> RateLimiter<C> {
    pub fn with_clock(config: RateLimitConfig, clock: C) -> Self {
        Self {
            config,
            clients: Arc::new(RwLock::new(HashMap::new())),
            clock,
        }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Check a client without recording a submission.
    pub async fn check(&self, client: &str) -> RateLimitResult {
        let now = self.clock.now_ms();
        let mut clients = self.clients.write().await;
        let result = match clients.get_mut(client) {
            Some(log) => log.check(now, &self.config),
            None => RateLimitResult::Allowed {
                remaining: self.config.max_submissions,
            },
        };
        if let RateLimitResult::Limited { retry_after } = result {
            debug!(client, ?retry_after, "Client rate limited");
        }
        result
    }

    /// Check a client and, if allowed, record the submission in one step.
    pub async fn try_record(&self, client: &str) -> RateLimitResult {
        let now = self.clock.now_ms();
        let mut clients = self.clients.write().await;
        let log = clients.entry(client.to_string()).or_default();

        match log.check(now, &self.config) {
            RateLimitResult::Allowed { remaining } => {
                log.record(now, &self.config);
                RateLimitResult::Allowed {
                    remaining: remaining - 1,
                }
            }
            limited @ RateLimitResult::Limited { retry_after } => {
                warn!(client, retry_after_ms = retry_after.as_millis() as u64, "Submission limit reached");
                limited
            }
        }
    }

    /// Number of clients currently tracked.
    pub async fn tracked_clients(&self) -> usize {
        self.clients.read().await.len()
    }

    /// Clean up idle logs (should be called periodically).
    pub async fn cleanup(&self) {
        let now = self.clock.now_ms();
        let mut clients = self.clients.write().await;
        let before = clients.len();
        clients.retain(|_, log| !log.is_idle(now, &self.config));
        let removed = before - clients.len();
        if removed > 0 {
            debug!(removed, "Pruned idle submission logs");
        }
    }
}
