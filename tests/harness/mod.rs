// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Test harness for contact form abuse simulation.
//!
//! Replays bot, spam, script injection and flood patterns against the
//! submission pipeline on a simulated clock and tallies the outcomes.

pub mod attacks;
pub mod generators;
pub mod metrics;
