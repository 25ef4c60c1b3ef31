//! history.rs — simple in-memory log of recent decisions for the debug endpoints.
//!
//! Not persistence: bounded, process-lifetime only. Caller numbers are stored
//! as short hashes; the raw number never enters this structure.

use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use crate::call::{anon_hash, CallEvent};
use crate::verdict::{CallAction, Verdict};

#[derive(Debug, Clone, Serialize)]
pub struct DecisionRecord {
    pub ts_unix: u64,
    /// Hashed caller id (see `call::anon_hash`).
    pub caller: String,
    /// The dialed (owned) number, as received.
    pub to: String,
    pub is_spam: bool,
    pub action: CallAction,
    pub reason: String,
}

#[derive(Debug)]
pub struct DecisionLog {
    inner: Mutex<Vec<DecisionRecord>>,
    cap: usize,
}

impl DecisionLog {
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            inner: Mutex::new(Vec::with_capacity(cap.min(10_000))),
            cap: cap.min(10_000),
        }
    }

    pub fn push(&self, event: &CallEvent, verdict: &Verdict) {
        let entry = DecisionRecord {
            ts_unix: now_unix(),
            caller: anon_hash(&event.from),
            to: event.to.clone(),
            is_spam: verdict.is_spam,
            action: verdict.action,
            reason: verdict.reason.clone(),
        };

        let mut v = self.inner.lock().expect("history mutex poisoned");
        v.push(entry);
        if v.len() > self.cap {
            let excess = v.len() - self.cap;
            v.drain(0..excess);
        }
    }

    pub fn snapshot_last_n(&self, n: usize) -> Vec<DecisionRecord> {
        let v = self.inner.lock().expect("history mutex poisoned");
        let len = v.len();
        let start = len.saturating_sub(n);
        v[start..].to_vec()
    }
}

fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(log: &DecisionLog, from: &str) {
        log.push(
            &CallEvent::new(from, "+12145500953"),
            &Verdict::forward("ok"),
        );
    }

    #[test]
    fn keeps_only_the_last_cap_entries() {
        let log = DecisionLog::with_capacity(3);
        for i in 0..5 {
            record(&log, &format!("+1972555000{i}"));
        }
        let snap = log.snapshot_last_n(10);
        assert_eq!(snap.len(), 3);
        // Oldest two were drained; the newest is last.
        assert_eq!(snap[2].caller, anon_hash("+19725550004"));
    }

    #[test]
    fn caller_is_hashed() {
        let log = DecisionLog::with_capacity(8);
        record(&log, "+19725551234");
        let snap = log.snapshot_last_n(1);
        assert_ne!(snap[0].caller, "+19725551234");
        assert_eq!(snap[0].caller.len(), 12);
    }
}
