use std::collections::HashMap;
use std::sync::Arc;

use chrono::Timelike;
use shuttle_axum::axum::{
    extract::{Form, Query, State},
    http::header,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::call::{anon_hash, CallEvent};
use crate::config::ScreenerConfig;
use crate::engine;
use crate::history::{DecisionLog, DecisionRecord};
use crate::metrics;
use crate::reputation::ReputationBundle;
use crate::response::{VoiceResponse, SCREEN_ACTION_PATH};
use crate::routing::RoutingTable;
use crate::verdict::CallAction;

#[derive(Clone)]
pub struct AppState {
    config: Arc<ScreenerConfig>,
    table: Arc<RoutingTable>,
    history: Arc<DecisionLog>,
}

impl AppState {
    /// Build the shared state from a validated config. The routing table is
    /// constructed here, once; a bad table aborts startup.
    pub fn from_config(config: ScreenerConfig) -> anyhow::Result<Self> {
        let table = RoutingTable::from_config(&config.routing)?;
        Ok(Self {
            config: Arc::new(config),
            table: Arc::new(table),
            history: Arc::new(DecisionLog::with_capacity(2000)),
        })
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/voice", post(voice))
        .route(SCREEN_ACTION_PATH, post(voice_screen))
        .route("/debug/history", get(debug_history))
        .route("/debug/last-decision", get(debug_last_decision))
        .route("/debug/route", get(debug_route))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// Carrier webhook form. Every field defaults to empty — a sparse request is
/// still a decidable call, never a 4xx.
#[derive(serde::Deserialize)]
struct VoiceForm {
    #[serde(default, rename = "From")]
    from: String,
    #[serde(default, rename = "To")]
    to: String,
    #[serde(default, rename = "CallSid")]
    call_sid: String,
    #[serde(default, rename = "CallerName")]
    caller_name: String,
    #[serde(default, rename = "FromCity")]
    city: String,
    #[serde(default, rename = "FromState")]
    state: String,
    #[serde(default, rename = "FromCountry")]
    country: String,
    /// JSON envelope with third-party add-on results, as a string field.
    #[serde(default, rename = "AddOns")]
    add_ons: String,
}

async fn voice(State(state): State<AppState>, Form(form): Form<VoiceForm>) -> impl IntoResponse {
    let event = CallEvent {
        from: form.from,
        to: form.to,
        call_sid: form.call_sid,
        caller_name: form.caller_name,
        city: form.city,
        state: form.state,
        country: form.country,
    };
    let addons = ReputationBundle::from_raw(&form.add_ons);

    // The only time-dependent input; injected here so the core stays pure.
    let now_hour = chrono::Local::now().hour();

    let verdict = engine::evaluate(&event, &addons, &state.config.policy, now_hour);

    let destination = if verdict.action == CallAction::Forward {
        state.table.resolve(&event.to).to_string()
    } else {
        String::new()
    };

    // Decision audit line. Caller id is hashed; the raw number stays out of logs.
    info!(
        target: "screener",
        caller = %anon_hash(&event.from),
        to = %event.to,
        call_sid = %event.call_sid,
        is_spam = verdict.is_spam,
        action = ?verdict.action,
        reason = %verdict.reason,
        destination = %destination,
        "call decided"
    );
    metrics::record_action(verdict.action);
    state.history.push(&event, &verdict);

    let resp = VoiceResponse::for_verdict(&verdict, &state.config.policy.screening, &destination);
    xml_response(resp)
}

#[derive(serde::Deserialize)]
struct ScreenForm {
    #[serde(default, rename = "Digits")]
    digits: String,
    #[serde(default, rename = "To")]
    to: String,
    #[serde(default, rename = "From")]
    from: String,
}

/// Digit-capture callback. The carrier only posts here after the Gather verb
/// finished; a real key press carries digits, anything else is a hangup.
async fn voice_screen(
    State(state): State<AppState>,
    Form(form): Form<ScreenForm>,
) -> impl IntoResponse {
    let pressed = !form.digits.trim().is_empty()
        && form.digits.trim().chars().all(|c| c.is_ascii_digit());

    let resp = if pressed {
        let destination = state.table.resolve(&form.to).to_string();
        info!(
            target: "screener",
            caller = %anon_hash(&form.from),
            to = %form.to,
            destination = %destination,
            "screening passed"
        );
        VoiceResponse::new().redirect(destination)
    } else {
        info!(
            target: "screener",
            caller = %anon_hash(&form.from),
            "screening failed, hanging up"
        );
        VoiceResponse::new().hangup()
    };
    xml_response(resp)
}

fn xml_response(resp: VoiceResponse) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/xml")], resp.to_xml())
}

#[derive(serde::Serialize)]
struct HealthOut {
    status: &'static str,
    service: &'static str,
    exact_routes: usize,
    groups: Vec<String>,
    default_url: String,
    timestamp: String,
}

async fn health(State(state): State<AppState>) -> Json<HealthOut> {
    Json(HealthOut {
        status: "active",
        service: "call-screener",
        exact_routes: state.table.exact_count(),
        groups: state
            .table
            .group_names()
            .into_iter()
            .map(str::to_string)
            .collect(),
        default_url: state.table.default_url().to_string(),
        timestamp: chrono::Local::now().to_rfc3339(),
    })
}

async fn debug_history(State(state): State<AppState>) -> Json<Vec<DecisionRecord>> {
    Json(state.history.snapshot_last_n(10))
}

async fn debug_last_decision(State(state): State<AppState>) -> Json<Option<DecisionRecord>> {
    Json(state.history.snapshot_last_n(1).pop())
}

/// Dry-run route resolution: `/debug/route?to=+12145500953`.
async fn debug_route(
    State(state): State<AppState>,
    Query(q): Query<HashMap<String, String>>,
) -> String {
    let to = q.get("to").cloned().unwrap_or_default();
    let destination = state.table.resolve(&to);
    match state.table.matching_group(&to) {
        Some(group) => format!("to='{to}' -> destination={destination} (group={group})"),
        None => format!("to='{to}' -> destination={destination}"),
    }
}
