//! verdict.rs — Decision output types: actions, signals, and the Verdict.
//!
//! Every call ends in exactly one `Verdict`. The reason string is mandatory —
//! it is what the audit log shows when someone asks why a call was blocked.

use serde::{Deserialize, Serialize};

/// What the telephony layer should do with the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallAction {
    /// Connect the caller to the resolved destination.
    Forward,
    /// Challenge the caller to press a digit before connecting.
    Screen,
    /// Drop the call without a word.
    Hangup,
    /// Ask for a message, then hang up.
    Voicemail,
    /// Speak the blocked notice, then hang up.
    BlockedMessage,
}

/// Which evaluator produced a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalSource {
    Nomorobo,
    Marchex,
    Whitepages,
    Truecnam,
    Icehook,
    Pattern,
    Blocklist,
    AreaCode,
    BusinessHours,
    Whitelist,
    Anonymous,
}

impl SignalSource {
    /// Action taken when this heuristic source fires on its own.
    /// Hangup is the cheapest exit, the spoken notice the most explicit;
    /// reputation sources have no fixed action (the policy decides).
    pub fn heuristic_action(self) -> CallAction {
        match self {
            SignalSource::Blocklist => CallAction::BlockedMessage,
            SignalSource::AreaCode => CallAction::Hangup,
            SignalSource::Anonymous => CallAction::Voicemail,
            SignalSource::BusinessHours => CallAction::Voicemail,
            SignalSource::Pattern => CallAction::BlockedMessage,
            SignalSource::Whitelist => CallAction::BlockedMessage,
            _ => CallAction::BlockedMessage,
        }
    }
}

/// One evaluated spam indicator. Transient: produced during aggregation,
/// folded into the Verdict reason, then dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpamSignal {
    pub source: SignalSource,
    pub triggered: bool,
    /// Contribution toward the additive block threshold (0 or 1 today).
    pub weight: i32,
    /// Human-readable detail, e.g. `"Truecnam: score 88"`.
    pub detail: String,
}

impl SpamSignal {
    pub fn triggered(source: SignalSource, detail: impl Into<String>) -> Self {
        Self {
            source,
            triggered: true,
            weight: 1,
            detail: detail.into(),
        }
    }
}

/// Terminal output of the aggregator for one call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub is_spam: bool,
    pub reason: String,
    pub action: CallAction,
}

impl Verdict {
    /// Clean call, pass it through.
    pub fn forward(reason: impl Into<String>) -> Self {
        Self {
            is_spam: false,
            reason: reason.into(),
            action: CallAction::Forward,
        }
    }

    /// Spam call with the action the triggering check demands.
    pub fn spam(action: CallAction, reason: impl Into<String>) -> Self {
        Self {
            is_spam: true,
            reason: reason.into(),
            action,
        }
    }

    /// Suspicious but not condemned: challenge the caller.
    /// Not flagged as spam — a human pressing the digit gets connected.
    pub fn screen(reason: impl Into<String>) -> Self {
        Self {
            is_spam: false,
            reason: reason.into(),
            action: CallAction::Screen,
        }
    }
}
