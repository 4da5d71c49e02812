// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Portfolio Contact
//!
//! Serves the portfolio pages and guards the contact form:
//!
//! - Input sanitization on every field change
//! - Field validation with a honeypot bot check
//! - Suspicious content scan (spam vocabulary, links, card numbers)
//! - Sliding-window rate limiting with a latched cooldown
//! - Delivery through a transactional email service, bounded by a timeout

pub mod clock;
pub mod config;
pub mod delivery;
pub mod error;
pub mod form;
pub mod handlers;
pub mod limiter;
pub mod metrics;
pub mod pipeline;
pub mod sanitizer;
pub mod session;
pub mod site;
pub mod validator;

pub use config::Config;
pub use delivery::{DeliveryClient, DeliveryError, EmailJsClient, EmailPayload};
pub use error::SubmitError;
pub use form::{ContactForm, FormView, Phase};
pub use limiter::{RateLimitResult, RateLimiter, SubmissionLog};
pub use pipeline::ContactPipeline;
pub use sanitizer::sanitize;
pub use session::FormSession;
pub use validator::{Field, FormData, FormErrors, FormValidator};
