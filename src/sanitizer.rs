// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Input sanitizer applied to every field change.
//!
//! Removes markup brackets, `javascript:` schemes and inline event handler
//! tokens (`onclick=` and friends), then trims surrounding whitespace.
//! Removal can splice a new token together (`java<script:`), so the passes
//! repeat until the text stops changing. The result is a fixed point:
//! sanitizing it again returns it unchanged.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static ANGLE_BRACKETS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[<>]").expect("Invalid regex: angle bracket pattern"));

static SCRIPT_SCHEME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)javascript:").expect("Invalid regex: script scheme pattern"));

static EVENT_HANDLER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)on\w+\s*=").expect("Invalid regex: event handler pattern"));

/// Sanitize a raw field value.
pub fn sanitize(raw: &str) -> String {
    let mut current = raw.to_string();
    loop {
        let next = sanitize_once(&current);
        if next == current {
            break;
        }
        current = next;
    }

    if current.len() != raw.len() {
        debug!(removed = raw.len() - current.len(), "Sanitizer stripped input");
    }
    current
}

fn sanitize_once(input: &str) -> String {
    let stripped = ANGLE_BRACKETS.replace_all(input, "");
    let stripped = SCRIPT_SCHEME.replace_all(&stripped, "");
    let stripped = EVENT_HANDLER.replace_all(&stripped, "");
    stripped.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_clean(output: &str) {
        assert!(!output.contains('<'), "{output:?} contains '<'");
        assert!(!output.contains('>'), "{output:?} contains '>'");
        assert!(!output.to_lowercase().contains("javascript:"), "{output:?} contains scheme");
        assert!(!EVENT_HANDLER.is_match(output), "{output:?} contains handler token");
    }

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(sanitize("Hello there!"), "Hello there!");
        assert_eq!(sanitize("O'Brien-Smith"), "O'Brien-Smith");
    }

    #[test]
    fn test_trims_whitespace() {
        assert_eq!(sanitize("  Bob \n"), "Bob");
    }

    #[test]
    fn test_strips_script_tags() {
        let out = sanitize("<script>alert(1)</script>");
        assert_eq!(out, "scriptalert(1)/script");
        assert_clean(&out);
    }

    #[test]
    fn test_strips_scheme_case_insensitive() {
        assert_eq!(sanitize("JavaScript:alert(1)"), "alert(1)");
        assert_eq!(sanitize("see jAvAsCrIpT:void(0) here"), "see void(0) here");
    }

    #[test]
    fn test_strips_event_handlers() {
        assert_eq!(sanitize("img onerror=steal()"), "img steal()");
        assert_eq!(sanitize("x ONCLICK = y"), "x  y");
    }

    #[test]
    fn test_spliced_tokens_removed() {
        let samples = [
            "java<script:alert(1)",
            "javajavascript:script:alert(1)",
            "oonclick=nclick=go",
            "on<load>=x",
            " <  > ",
        ];
        for sample in samples {
            assert_clean(&sanitize(sample));
        }
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "<b>hi</b>",
            "javajavascript:script:",
            "  onmouseover=x  ",
            "plain message with enough text",
            "a < b and c > d",
            "",
        ];
        for sample in samples {
            let once = sanitize(sample);
            assert_eq!(sanitize(&once), once, "not a fixed point for {sample:?}");
        }
    }
}
