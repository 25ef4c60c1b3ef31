use axum::{routing::get, Router};
use metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::verdict::CallAction;

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Initialize the Prometheus recorder. Call once at boot.
    pub fn init() -> Self {
        let builder = PrometheusBuilder::new();

        let handle = builder
            .install_recorder()
            .expect("prometheus: install recorder");

        Self { handle }
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}

/// Count one decided call by outcome. Safe to call with no recorder installed
/// (a no-op recorder applies), which keeps the core tests free of metrics setup.
pub fn record_action(action: CallAction) {
    match action {
        CallAction::Forward => counter!("calls_forwarded_total").increment(1),
        CallAction::Screen => counter!("calls_screened_total").increment(1),
        CallAction::Hangup | CallAction::BlockedMessage => {
            counter!("calls_blocked_total").increment(1)
        }
        CallAction::Voicemail => counter!("calls_voicemail_total").increment(1),
    }
}
