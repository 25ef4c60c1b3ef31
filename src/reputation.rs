//! reputation.rs — Third-party reputation results and additive scoring.
//!
//! The carrier attaches add-on results as one JSON envelope per call:
//! `{"results": {"<provider>": {"result": ...}}}`. Providers fail, time out,
//! or are simply not subscribed, so every field is optional. Extraction uses
//! JSON pointers over a parsed `Value`: a missing or wrongly-typed field is
//! `None`, never an error, and one provider's garbage cannot poison another's
//! result.
//!
//! No single provider is reliable enough alone. Each one contributes 0 or 1
//! under its own cutoff and the call is only condemned when the total reaches
//! the configured threshold.

use serde_json::Value;

use crate::config::ProviderCutoffs;
use crate::verdict::{SignalSource, SpamSignal};

/// Per-provider results pulled out of the add-on envelope. Absent providers
/// stay `None` and contribute nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReputationBundle {
    /// Nomorobo spam score (their scale: 0.0 or 1.0).
    pub nomorobo_score: Option<f64>,
    /// Marchex Clean Call recommendation (`"PASS"` / `"BLOCK"`).
    pub marchex_recommendation: Option<String>,
    /// Whitepages Pro phone reputation level (1–4).
    pub whitepages_level: Option<i64>,
    /// Truecnam spam score (0–100).
    pub truecnam_score: Option<i64>,
    /// Icehook Scout recommendation.
    pub icehook_recommendation: Option<String>,
}

impl ReputationBundle {
    /// Parse the raw `AddOns` form field. Junk input yields an empty bundle.
    pub fn from_raw(raw: &str) -> Self {
        match serde_json::from_str::<Value>(raw) {
            Ok(v) => Self::from_value(&v),
            Err(_) => Self::default(),
        }
    }

    /// Extract provider fields from a parsed envelope.
    pub fn from_value(v: &Value) -> Self {
        Self {
            nomorobo_score: v
                .pointer("/results/nomorobo_spamscore/result/score")
                .and_then(Value::as_f64),
            marchex_recommendation: v
                .pointer("/results/marchex_cleancall/result/result/recommendation")
                .and_then(Value::as_str)
                .map(str::to_string),
            whitepages_level: v
                .pointer("/results/whitepages_pro_phone_rep/result/results/0/phone_checks/reputation_level")
                .and_then(Value::as_i64),
            truecnam_score: v
                .pointer("/results/truecnam_truespam/result/result/spam_score")
                .and_then(Value::as_i64),
            icehook_recommendation: v
                .pointer("/results/icehook_scout/result/result/recommendation")
                .and_then(Value::as_str)
                .map(str::to_string),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Evaluate every available provider against its cutoff.
/// Returns the triggered signals, one per flagging provider.
pub fn evaluate(bundle: &ReputationBundle, cutoffs: &ProviderCutoffs) -> Vec<SpamSignal> {
    let mut triggered = Vec::new();

    if let Some(score) = bundle.nomorobo_score {
        if score > cutoffs.nomorobo_score {
            triggered.push(SpamSignal::triggered(
                SignalSource::Nomorobo,
                format!("Nomorobo: score {score}"),
            ));
        }
    }

    if let Some(rec) = &bundle.marchex_recommendation {
        if rec == "BLOCK" {
            triggered.push(SpamSignal::triggered(
                SignalSource::Marchex,
                "Marchex: recommends BLOCK",
            ));
        }
    }

    if let Some(level) = bundle.whitepages_level {
        if level >= cutoffs.whitepages_min_level {
            triggered.push(SpamSignal::triggered(
                SignalSource::Whitepages,
                format!("Whitepages: reputation level {level}"),
            ));
        }
    }

    if let Some(score) = bundle.truecnam_score {
        if score > cutoffs.truecnam_spam_score {
            triggered.push(SpamSignal::triggered(
                SignalSource::Truecnam,
                format!("Truecnam: score {score}"),
            ));
        }
    }

    if let Some(rec) = &bundle.icehook_recommendation {
        if rec == "BLOCK" {
            triggered.push(SpamSignal::triggered(
                SignalSource::Icehook,
                "Icehook: recommends BLOCK",
            ));
        }
    }

    triggered
}
