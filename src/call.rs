//! call.rs — Inbound call record and phone-number helpers.
//!
//! Numbers arrive in E.164-ish form (`+12145551234`), bare 10/11-digit form,
//! or as carrier sentinels (`anonymous`, `private`, empty). Nothing here
//! validates strictly; helpers degrade to "no answer" instead of failing.

use serde::{Deserialize, Serialize};

/// One inbound call as reported by the carrier webhook.
/// Built once per request and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallEvent {
    pub from: String,
    pub to: String,
    pub call_sid: String,
    pub caller_name: String,
    pub city: String,
    pub state: String,
    pub country: String,
}

impl CallEvent {
    /// Minimal constructor for tests and callers that only have the two numbers.
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            call_sid: String::new(),
            caller_name: String::new(),
            city: String::new(),
            state: String::new(),
            country: String::new(),
        }
    }

    pub fn with_caller_name(mut self, name: impl Into<String>) -> Self {
        self.caller_name = name.into();
        self
    }
}

/// Keep digits and a leading-style `+`, drop everything else.
pub fn normalize_number(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect()
}

/// Digits only.
#[inline]
pub fn digits(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Extract the 3-digit US area code.
///
/// 11 digits with a leading `1` → digits 2..4; exactly 10 digits → the first
/// three; anything else has no well-defined area code and yields `None`.
pub fn area_code(raw: &str) -> Option<String> {
    let d = digits(raw);
    if d.len() == 11 && d.starts_with('1') {
        Some(d[1..4].to_string())
    } else if d.len() == 10 {
        Some(d[..3].to_string())
    } else {
        None
    }
}

/// Carrier sentinels and too-short caller ids count as anonymous.
/// The length check is on the raw string, matching what the carrier sends.
pub fn is_anonymous(raw: &str) -> bool {
    raw.is_empty() || raw == "anonymous" || raw == "private" || raw.len() < 10
}

/// Short, stable hash of a caller number for logs and debug output.
/// Raw numbers never leave the process through the observability channel.
pub fn anon_hash(number: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(number.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}
