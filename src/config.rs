// src/config.rs
//! Process configuration: spam policy + routing rules, loaded once at startup.
//!
//! One TOML file, deserialized into an immutable `ScreenerConfig` and passed
//! by reference (behind `Arc`) into the components. No module reads ambient
//! process state after boot. Invalid configuration aborts startup; request
//! handling never sees a config error.
//!
//! A built-in `default_seed()` backs local runs and tests when no file is
//! present. A file that exists but fails to parse or validate is a hard error.

use once_cell::sync::Lazy;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

use crate::verdict::CallAction;

// --- env defaults & names ---
pub const DEFAULT_CONFIG_PATH: &str = "config/screener.toml";
pub const ENV_CONFIG_PATH: &str = "SCREENER_CONFIG_PATH";

static DEFAULT_SPAM_NAME_PATTERNS: Lazy<Vec<String>> = Lazy::new(|| {
    ["SPAM", "SCAM", "TELEMARKET", "ROBOCALL"]
        .iter()
        .map(|s| s.to_string())
        .collect()
});

fn default_spam_name_patterns() -> Vec<String> {
    DEFAULT_SPAM_NAME_PATTERNS.clone()
}

fn default_block_threshold() -> u32 {
    2
}

fn default_start_hour() -> u32 {
    8
}

fn default_end_hour() -> u32 {
    20
}

fn default_screen_prompt() -> String {
    "This call is being screened. Press any key to continue.".to_string()
}

fn default_num_digits() -> u32 {
    1
}

fn default_timeout_secs() -> u32 {
    5
}

fn default_true() -> bool {
    true
}

fn default_forward_url() -> String {
    "https://services.leadconnectorhq.com/phone-system/voice-call/inbound".to_string()
}

fn default_nomorobo_cutoff() -> f64 {
    0.5
}

fn default_whitepages_level() -> i64 {
    3
}

fn default_truecnam_cutoff() -> i64 {
    75
}

/// Top-level configuration snapshot.
#[derive(Debug, Clone, Deserialize)]
pub struct ScreenerConfig {
    #[serde(default)]
    pub policy: SpamPolicy,
    #[serde(default)]
    pub routing: RoutingConfig,
}

/// Everything the signal aggregator consults.
#[derive(Debug, Clone, Deserialize)]
pub struct SpamPolicy {
    /// Exact caller numbers that are always blocked.
    #[serde(default)]
    pub blocked_numbers: Vec<String>,
    /// 3-digit US area codes that are always hung up on.
    #[serde(default)]
    pub blocked_area_codes: Vec<String>,
    /// Allow-list; only enforced together with `whitelist_only`.
    #[serde(default)]
    pub allowed_numbers: Vec<String>,
    #[serde(default)]
    pub whitelist_only: bool,
    /// Case-insensitive substrings of the CNAM display name.
    #[serde(default = "default_spam_name_patterns")]
    pub spam_name_patterns: Vec<String>,
    /// How many third-party providers must flag a call before it is blocked.
    #[serde(default = "default_block_threshold")]
    pub block_threshold: u32,
    /// What a reputation block does to the call.
    #[serde(default)]
    pub block_action: BlockAction,
    /// One provider short of the threshold → challenge instead of forwarding.
    #[serde(default = "default_true")]
    pub screen_when_near_threshold: bool,
    #[serde(default)]
    pub business_hours: BusinessHours,
    #[serde(default)]
    pub providers: ProviderCutoffs,
    #[serde(default)]
    pub screening: ScreeningPrompt,
}

impl Default for SpamPolicy {
    fn default() -> Self {
        Self {
            blocked_numbers: Vec::new(),
            blocked_area_codes: Vec::new(),
            allowed_numbers: Vec::new(),
            whitelist_only: false,
            spam_name_patterns: default_spam_name_patterns(),
            block_threshold: default_block_threshold(),
            block_action: BlockAction::default(),
            screen_when_near_threshold: true,
            business_hours: BusinessHours::default(),
            providers: ProviderCutoffs::default(),
            screening: ScreeningPrompt::default(),
        }
    }
}

/// Terminal action for a reputation block. The heuristic checks carry their
/// own fixed actions; only the additive scorer is deployment-configurable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockAction {
    #[default]
    Hangup,
    BlockedMessage,
}

impl BlockAction {
    pub fn as_call_action(self) -> CallAction {
        match self {
            BlockAction::Hangup => CallAction::Hangup,
            BlockAction::BlockedMessage => CallAction::BlockedMessage,
        }
    }
}

/// Half-open window `[start_hour, end_hour)` in local hours (0–23).
#[derive(Debug, Clone, Deserialize)]
pub struct BusinessHours {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_start_hour")]
    pub start_hour: u32,
    #[serde(default = "default_end_hour")]
    pub end_hour: u32,
    /// Outside the window: block to voicemail (true) or fall through (false).
    #[serde(default)]
    pub off_hours_block: bool,
}

impl Default for BusinessHours {
    fn default() -> Self {
        Self {
            enabled: false,
            start_hour: default_start_hour(),
            end_hour: default_end_hour(),
            off_hours_block: false,
        }
    }
}

/// Per-provider cutoffs for the additive reputation score.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderCutoffs {
    /// Nomorobo spam score above this contributes (their scale: 0 or 1).
    #[serde(default = "default_nomorobo_cutoff")]
    pub nomorobo_score: f64,
    /// Whitepages reputation level at or above this contributes (1–4 scale).
    #[serde(default = "default_whitepages_level")]
    pub whitepages_min_level: i64,
    /// Truecnam spam score above this contributes (0–100 scale).
    #[serde(default = "default_truecnam_cutoff")]
    pub truecnam_spam_score: i64,
}

impl Default for ProviderCutoffs {
    fn default() -> Self {
        Self {
            nomorobo_score: default_nomorobo_cutoff(),
            whitepages_min_level: default_whitepages_level(),
            truecnam_spam_score: default_truecnam_cutoff(),
        }
    }
}

/// Parameters handed to the renderer's digit-capture verb. The core never
/// tracks the timeout; the carrier enforces it.
#[derive(Debug, Clone, Deserialize)]
pub struct ScreeningPrompt {
    #[serde(default = "default_screen_prompt")]
    pub prompt: String,
    #[serde(default = "default_num_digits")]
    pub num_digits: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u32,
}

impl Default for ScreeningPrompt {
    fn default() -> Self {
        Self {
            prompt: default_screen_prompt(),
            num_digits: default_num_digits(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Routing rules as written in the config file. `RoutingTable` (routing.rs)
/// is the normalized, lookup-ready form built from this once at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct RoutingConfig {
    /// Destination when no rule matches. Never empty.
    #[serde(default = "default_forward_url")]
    pub default_url: String,
    /// Exact-number rules, consulted before groups.
    #[serde(default)]
    pub route: Vec<RouteEntry>,
    /// Named groups, scanned in file order; first match wins.
    #[serde(default)]
    pub group: Vec<GroupEntry>,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            default_url: default_forward_url(),
            route: Vec::new(),
            group: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RouteEntry {
    pub number: String,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroupEntry {
    pub name: String,
    pub members: Vec<String>,
    pub url: String,
}

impl ScreenerConfig {
    /// Load from the TOML file at `SCREENER_CONFIG_PATH` (default
    /// `config/screener.toml`). A missing file falls back to the seed; a
    /// present but broken file is a startup error.
    pub fn from_toml() -> anyhow::Result<Self> {
        let path = std::env::var(ENV_CONFIG_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

        match fs::read_to_string(&path) {
            Ok(content) => Self::from_toml_str(&content),
            Err(_) => Ok(Self::default_seed()),
        }
    }

    pub fn from_toml_str(toml_str: &str) -> anyhow::Result<Self> {
        let cfg: ScreenerConfig = toml::from_str(toml_str)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Built-in configuration for local runs and tests: empty lists, default
    /// thresholds, default forwarding destination.
    pub fn default_seed() -> Self {
        Self {
            policy: SpamPolicy::default(),
            routing: RoutingConfig::default(),
        }
    }

    /// Startup-time sanity checks. Anything caught here would otherwise
    /// surface as a per-call surprise, which the request path must never do.
    pub fn validate(&self) -> anyhow::Result<()> {
        let p = &self.policy;

        if p.block_threshold == 0 {
            anyhow::bail!("policy.block_threshold must be at least 1");
        }

        let bh = &p.business_hours;
        if bh.enabled {
            if bh.start_hour > 23 || bh.end_hour > 24 {
                anyhow::bail!(
                    "business_hours window out of range: start {} end {}",
                    bh.start_hour,
                    bh.end_hour
                );
            }
            if bh.start_hour == bh.end_hour {
                anyhow::bail!("business_hours window is empty (start == end)");
            }
        }

        if p.screening.num_digits == 0 || p.screening.timeout_secs == 0 {
            anyhow::bail!("screening prompt needs num_digits >= 1 and timeout_secs >= 1");
        }

        let r = &self.routing;
        if r.default_url.trim().is_empty() {
            anyhow::bail!("routing.default_url must not be empty");
        }
        for entry in &r.route {
            if entry.number.trim().is_empty() || entry.url.trim().is_empty() {
                anyhow::bail!("routing.route entries need both a number and a url");
            }
        }
        for g in &r.group {
            if g.name.trim().is_empty() {
                anyhow::bail!("routing.group entry without a name");
            }
            if g.members.is_empty() {
                anyhow::bail!("routing.group '{}' has no members", g.name);
            }
            if g.url.trim().is_empty() {
                anyhow::bail!("routing.group '{}' has no destination url", g.name);
            }
        }

        Ok(())
    }
}
