// tests/reputation_scoring.rs
//
// Additive multi-provider scoring through the public evaluate(), driven by
// real-shaped AddOns envelopes rather than pre-built bundles.

use call_screener::config::SpamPolicy;
use call_screener::engine::evaluate;
use call_screener::reputation::ReputationBundle;
use call_screener::verdict::CallAction;
use call_screener::CallEvent;

const DAY_HOUR: u32 = 12;

fn clean_event() -> CallEvent {
    CallEvent::new("+19725551234", "+12145500953").with_caller_name("Jane Doe")
}

#[test]
fn nomorobo_plus_marchex_reach_the_default_threshold() {
    let addons = ReputationBundle::from_raw(
        r#"{
            "results": {
                "nomorobo_spamscore": { "result": { "score": 0.9 } },
                "marchex_cleancall": { "result": { "result": { "recommendation": "BLOCK" } } }
            }
        }"#,
    );
    let v = evaluate(&clean_event(), &addons, &SpamPolicy::default(), DAY_HOUR);
    assert!(v.is_spam);
    assert_eq!(v.action, CallAction::Hangup);
}

#[test]
fn single_signal_below_threshold_never_blocks_outright() {
    let addons = ReputationBundle::from_raw(
        r#"{"results": {"nomorobo_spamscore": {"result": {"score": 0.9}}}}"#,
    );

    // Default deployment: screen.
    let v = evaluate(&clean_event(), &addons, &SpamPolicy::default(), DAY_HOUR);
    assert!(!v.is_spam);
    assert_eq!(v.action, CallAction::Screen);

    // Screening off: pass through.
    let mut policy = SpamPolicy::default();
    policy.screen_when_near_threshold = false;
    let v = evaluate(&clean_event(), &addons, &policy, DAY_HOUR);
    assert_eq!(v.action, CallAction::Forward);
}

#[test]
fn five_providers_can_all_contribute() {
    let addons = ReputationBundle::from_raw(
        r#"{
            "results": {
                "nomorobo_spamscore": { "result": { "score": 1 } },
                "marchex_cleancall": { "result": { "result": { "recommendation": "BLOCK" } } },
                "whitepages_pro_phone_rep": { "result": { "results": [ { "phone_checks": { "reputation_level": 4 } } ] } },
                "truecnam_truespam": { "result": { "result": { "spam_score": 99 } } },
                "icehook_scout": { "result": { "result": { "recommendation": "BLOCK" } } }
            }
        }"#,
    );
    let mut policy = SpamPolicy::default();
    policy.block_threshold = 5;
    let v = evaluate(&clean_event(), &addons, &policy, DAY_HOUR);
    assert!(v.is_spam);
    assert!(v.reason.contains("5 provider(s)"), "reason: {}", v.reason);
}

#[test]
fn absent_and_malformed_providers_contribute_zero() {
    // One real flag drowned in malformed neighbors: still just one flag.
    let addons = ReputationBundle::from_raw(
        r#"{
            "results": {
                "nomorobo_spamscore": { "result": { "score": "broken" } },
                "marchex_cleancall": 17,
                "truecnam_truespam": { "result": { "result": { "spam_score": 99 } } }
            }
        }"#,
    );
    let v = evaluate(&clean_event(), &addons, &SpamPolicy::default(), DAY_HOUR);
    assert!(!v.is_spam);
    assert_eq!(v.action, CallAction::Screen);
    assert!(v.reason.contains("Truecnam"));
}

#[test]
fn cutoffs_are_configurable_per_provider() {
    let addons = ReputationBundle::from_raw(
        r#"{"results": {"nomorobo_spamscore": {"result": {"score": 0.6}}}}"#,
    );

    // Default cutoff 0.5: the 0.6 score flags.
    let v = evaluate(&clean_event(), &addons, &SpamPolicy::default(), DAY_HOUR);
    assert_eq!(v.action, CallAction::Screen);

    // Stricter cutoff 0.8: it no longer does.
    let mut policy = SpamPolicy::default();
    policy.providers.nomorobo_score = 0.8;
    let v = evaluate(&clean_event(), &addons, &policy, DAY_HOUR);
    assert_eq!(v.action, CallAction::Forward);
}

#[test]
fn no_addons_field_forwards() {
    let v = evaluate(
        &clean_event(),
        &ReputationBundle::from_raw(""),
        &SpamPolicy::default(),
        DAY_HOUR,
    );
    assert_eq!(v.action, CallAction::Forward);
    assert!(!v.is_spam);
}
