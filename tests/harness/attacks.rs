// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Abuse patterns for security testing.

use std::time::Duration;

/// What each simulated submission carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    /// Well-formed human submission
    Valid,
    /// Honeypot filled in
    Bot,
    /// Spam vocabulary, links or card numbers
    Spam,
    /// Markup and script injection attempts in otherwise valid fields
    ScriptInjection,
    /// Missing required fields
    Empty,
}

/// Attack pattern configuration.
#[derive(Debug, Clone)]
pub struct AttackConfig {
    /// Total number of submissions to send
    pub total_submissions: usize,
    /// Simulated submission rate across all clients
    pub submissions_per_minute: f64,
    /// Number of unique clients to simulate
    pub unique_clients: usize,
    /// Payload sent by every submission
    pub payload: PayloadKind,
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self {
            total_submissions: 30,
            submissions_per_minute: 6.0,
            unique_clients: 1,
            payload: PayloadKind::Valid,
        }
    }
}

/// Predefined attack patterns.
impl AttackConfig {
    /// One client hammering the form.
    pub fn single_client_flood() -> Self {
        Self {
            total_submissions: 100,
            submissions_per_minute: 600.0,
            ..Default::default()
        }
    }

    /// Many clients, each staying under its own limit.
    pub fn distributed_flood() -> Self {
        Self {
            total_submissions: 200,
            submissions_per_minute: 600.0,
            unique_clients: 100,
            ..Default::default()
        }
    }

    /// Form-filling bots that populate every input.
    pub fn honeypot_bots() -> Self {
        Self {
            total_submissions: 50,
            submissions_per_minute: 60.0,
            unique_clients: 25,
            payload: PayloadKind::Bot,
        }
    }

    /// Link and keyword spam.
    pub fn spam_campaign() -> Self {
        Self {
            total_submissions: 50,
            submissions_per_minute: 30.0,
            unique_clients: 50,
            payload: PayloadKind::Spam,
        }
    }

    /// Markup smuggled into the fields.
    pub fn script_injection() -> Self {
        Self {
            total_submissions: 20,
            submissions_per_minute: 10.0,
            unique_clients: 20,
            payload: PayloadKind::ScriptInjection,
        }
    }

    /// Blank submissions.
    pub fn empty_submissions() -> Self {
        Self {
            total_submissions: 40,
            submissions_per_minute: 120.0,
            unique_clients: 2,
            payload: PayloadKind::Empty,
        }
    }

    /// Patient human: one message every ten minutes.
    pub fn slow_drip() -> Self {
        Self {
            total_submissions: 10,
            submissions_per_minute: 0.1,
            ..Default::default()
        }
    }

    /// Simulated time between consecutive submissions.
    pub fn spacing(&self) -> Duration {
        Duration::from_secs_f64(60.0 / self.submissions_per_minute)
    }
}
