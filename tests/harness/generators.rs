// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Test data generators for abuse simulation.

use super::attacks::PayloadKind;
use portfolio_contact::validator::FormData;
use std::net::{IpAddr, Ipv4Addr};

/// Generate a pool of client addresses for testing.
pub fn generate_clients(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            // Use 10.x.x.x private range
            let a = ((i >> 16) & 0xFF) as u8;
            let b = ((i >> 8) & 0xFF) as u8;
            let c = (i & 0xFF) as u8;
            IpAddr::V4(Ipv4Addr::new(10, a, b, c)).to_string()
        })
        .collect()
}

/// Build the `index`th submission of the given kind.
pub fn generate_form(kind: PayloadKind, index: usize) -> FormData {
    match kind {
        PayloadKind::Valid => FormData {
            name: format!("Visitor {}", letters(index)),
            email: format!("visitor{}@example.org", index),
            message: format!("Hello! I enjoyed project number {} on your site.", index % 7),
            honeypot: String::new(),
        },
        PayloadKind::Bot => FormData {
            honeypot: format!("http://bot-{}.example.net", index),
            ..generate_form(PayloadKind::Valid, index)
        },
        PayloadKind::Spam => {
            let bodies = spam_bodies();
            FormData {
                message: bodies[index % bodies.len()].to_string(),
                ..generate_form(PayloadKind::Valid, index)
            }
        }
        PayloadKind::ScriptInjection => {
            let payloads = injection_payloads();
            FormData {
                message: format!("Nice work {}", payloads[index % payloads.len()]),
                ..generate_form(PayloadKind::Valid, index)
            }
        }
        PayloadKind::Empty => FormData::default(),
    }
}

/// Spam bodies that each trip the suspicious content scan.
pub fn spam_bodies() -> Vec<&'static str> {
    vec![
        "Best online casino bonus, sign up today",
        "You are the lottery winner, reply now",
        "Cheap pills at https://pharma.example.com/deal",
        "Visit www.cheap-links.example for traffic",
        "Please confirm card 4111 1111 1111 1111 expiry",
        "We offer SEO services for your website",
        "Make money fast with our bitcoin program",
    ]
}

/// Markup and script injection attempts.
pub fn injection_payloads() -> Vec<&'static str> {
    vec![
        "<script>alert(1)</script>",
        "<img src=x onerror=alert(1)>",
        "javascript:alert(document.cookie)",
        "JaVaScRiPt:void(0)",
        "<svg/onload=alert(1)>",
        "java<script:alert(1)",
        "<a href=\"javascript:x\" onmouseover = y>hi</a>",
    ]
}

/// Two-letter suffix so generated names stay letters-only.
fn letters(index: usize) -> String {
    let a = (b'a' + (index % 26) as u8) as char;
    let b = (b'a' + ((index / 26) % 26) as u8) as char;
    format!("{a}{b}")
}
