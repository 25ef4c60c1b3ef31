//! # Signal Aggregator
//! Pure, testable logic that maps `(event, add-ons, policy, hour)` → `Verdict`.
//! No I/O, no clock reads: the caller injects the current hour, so the same
//! inputs always produce the same verdict.
//!
//! Policy: the ordered heuristic checks decide first (first trigger wins);
//! only a call that survives them is scored against the third-party
//! reputation providers. Reaching the block threshold condemns the call;
//! landing exactly one provider short challenges the caller instead, when
//! screening mode is on.

use crate::call::CallEvent;
use crate::checks;
use crate::config::SpamPolicy;
use crate::reputation::{self, ReputationBundle};
use crate::verdict::Verdict;

/// Same logic as the `/voice` handler but purely functional for testing.
pub fn evaluate(
    event: &CallEvent,
    addons: &ReputationBundle,
    policy: &SpamPolicy,
    now_hour: u32,
) -> Verdict {
    // 1) Ordered heuristic checks; the first trigger decides the call.
    if let Some(sig) = checks::run_checks(event, policy, now_hour) {
        return Verdict::spam(sig.source.heuristic_action(), sig.detail);
    }

    // 2) Additive reputation scoring across whatever providers reported.
    let triggered = reputation::evaluate(addons, &policy.providers);
    let count = triggered.len() as u32;

    if count >= policy.block_threshold {
        let detail = triggered
            .iter()
            .map(|s| s.detail.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        return Verdict::spam(
            policy.block_action.as_call_action(),
            format!(
                "Flagged by {count} provider(s), threshold {}: {detail}",
                policy.block_threshold
            ),
        );
    }

    // One short of the threshold: challenge rather than condemn. Needs at
    // least one actual trigger, so a threshold of 1 never screens clean calls.
    if policy.screen_when_near_threshold && count > 0 && count + 1 == policy.block_threshold {
        let detail = triggered
            .iter()
            .map(|s| s.detail.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        return Verdict::screen(format!(
            "{count} provider(s) flagged, below threshold {}: {detail}",
            policy.block_threshold
        ));
    }

    Verdict::forward("No spam indicators")
}
