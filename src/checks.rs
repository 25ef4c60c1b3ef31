//! checks.rs — Caller-metadata spam checks as an ordered evaluator list.
//!
//! Each check is a pure `fn(&CallEvent, &SpamPolicy, now_hour) -> Option<SpamSignal>`.
//! `run_checks` walks `CHECK_ORDER` and returns the first trigger; later
//! checks are never evaluated for that call. The order is part of the
//! contract: actions differ (a hangup is cheaper to the caller than a spoken
//! notice), and the cheap map lookups sit in front of the string scans.
//!
//! Invariant: nothing here fails. A malformed number means the number-shaped
//! checks simply do not trigger.

use crate::call::{self, CallEvent};
use crate::config::SpamPolicy;
use crate::verdict::{SignalSource, SpamSignal};

pub type CheckFn = fn(&CallEvent, &SpamPolicy, u32) -> Option<SpamSignal>;

/// Fixed priority order. First trigger wins.
pub const CHECK_ORDER: &[CheckFn] = &[
    check_blocklist,
    check_area_code,
    check_anonymous,
    check_business_hours,
    check_suspicious_pattern,
    check_whitelist,
];

/// Evaluate the heuristic checks in priority order.
pub fn run_checks(event: &CallEvent, policy: &SpamPolicy, now_hour: u32) -> Option<SpamSignal> {
    CHECK_ORDER
        .iter()
        .find_map(|check| check(event, policy, now_hour))
}

/// 1. Exact match against the blocked-numbers list.
fn check_blocklist(event: &CallEvent, policy: &SpamPolicy, _now_hour: u32) -> Option<SpamSignal> {
    if policy.blocked_numbers.iter().any(|n| n == &event.from) {
        return Some(SpamSignal::triggered(
            SignalSource::Blocklist,
            "Number in blocklist",
        ));
    }
    None
}

/// 2. Blocked US area codes. Numbers without a well-formed area code fall
/// through untouched.
fn check_area_code(event: &CallEvent, policy: &SpamPolicy, _now_hour: u32) -> Option<SpamSignal> {
    let area = call::area_code(&event.from)?;
    if policy.blocked_area_codes.iter().any(|c| c == &area) {
        return Some(SpamSignal::triggered(
            SignalSource::AreaCode,
            format!("Blocked area code: {area}"),
        ));
    }
    None
}

/// 3. Carrier sentinels (`anonymous`, `private`), empty or sub-10-char ids.
fn check_anonymous(event: &CallEvent, _policy: &SpamPolicy, _now_hour: u32) -> Option<SpamSignal> {
    if call::is_anonymous(&event.from) {
        return Some(SpamSignal::triggered(
            SignalSource::Anonymous,
            "Anonymous or invalid number",
        ));
    }
    None
}

/// 4. Outside the `[start, end)` window with off-hours blocking on.
/// Outside the window without `off_hours_block` falls through.
fn check_business_hours(
    _event: &CallEvent,
    policy: &SpamPolicy,
    now_hour: u32,
) -> Option<SpamSignal> {
    let bh = &policy.business_hours;
    if !bh.enabled {
        return None;
    }
    let outside = now_hour < bh.start_hour || now_hour >= bh.end_hour;
    if outside && bh.off_hours_block {
        return Some(SpamSignal::triggered(
            SignalSource::BusinessHours,
            format!(
                "Call outside business hours ({}-{}, now {})",
                bh.start_hour, bh.end_hour, now_hour
            ),
        ));
    }
    None
}

/// 5. Number-shape and display-name heuristics.
fn check_suspicious_pattern(
    event: &CallEvent,
    policy: &SpamPolicy,
    _now_hour: u32,
) -> Option<SpamSignal> {
    let d = call::digits(&event.from);

    if has_digit_run(&d, 10) {
        return Some(SpamSignal::triggered(
            SignalSource::Pattern,
            "Suspicious pattern: repeated digit run",
        ));
    }

    if d.contains("1234567") || d.contains("0123456") {
        return Some(SpamSignal::triggered(
            SignalSource::Pattern,
            "Suspicious pattern: sequential digits",
        ));
    }

    let name = event.caller_name.to_ascii_uppercase();
    for pat in &policy.spam_name_patterns {
        let pat = pat.trim();
        if !pat.is_empty() && name.contains(&pat.to_ascii_uppercase()) {
            return Some(SpamSignal::triggered(
                SignalSource::Pattern,
                format!("Suspicious caller name (matched '{pat}')"),
            ));
        }
    }

    None
}

/// 6. Allow-list enforcement; only active when a list is configured AND
/// `whitelist_only` is set.
fn check_whitelist(event: &CallEvent, policy: &SpamPolicy, _now_hour: u32) -> Option<SpamSignal> {
    if policy.allowed_numbers.is_empty() || !policy.whitelist_only {
        return None;
    }
    if !policy.allowed_numbers.iter().any(|n| n == &event.from) {
        return Some(SpamSignal::triggered(
            SignalSource::Whitelist,
            "Number not in whitelist",
        ));
    }
    None
}

/// True if `s` contains `min_run` or more identical consecutive chars.
fn has_digit_run(s: &str, min_run: usize) -> bool {
    let mut run = 0usize;
    let mut prev: Option<char> = None;
    for c in s.chars() {
        if Some(c) == prev {
            run += 1;
        } else {
            run = 1;
            prev = Some(c);
        }
        if run >= min_run {
            return true;
        }
    }
    false
}
