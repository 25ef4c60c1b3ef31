//! # Route Resolver
//! Maps the dialed number to a forwarding destination via a layered rule set:
//! exact number → named groups → default. Built once from configuration at
//! startup, immutable afterwards, and infallible at request time — `resolve`
//! always returns a destination.

use std::collections::{HashMap, HashSet};

use crate::call::{digits, normalize_number};
use crate::config::RoutingConfig;

/// Many numbers sharing one destination. Groups are scanned in config order;
/// the first group containing the number wins.
#[derive(Debug, Clone)]
pub struct RouteGroup {
    pub name: String,
    /// Normalized member numbers (digits + `+`), as configured.
    members: HashSet<String>,
    pub url: String,
}

impl RouteGroup {
    /// Membership with or without a leading `+`, tolerating formatting noise
    /// on either side.
    fn contains(&self, normalized: &str, digits_only: &str) -> bool {
        self.members.contains(normalized)
            || self.members.contains(digits_only)
            || self.members.contains(&format!("+{digits_only}"))
    }
}

/// Lookup-ready routing rules. Exact rules are keyed by digits-only form,
/// which is what makes the country-code retry below work.
#[derive(Debug, Clone)]
pub struct RoutingTable {
    exact: HashMap<String, String>,
    groups: Vec<RouteGroup>,
    default_url: String,
}

impl RoutingTable {
    /// Build from validated configuration. Duplicate exact numbers keep the
    /// first entry, matching the first-match-wins rule everywhere else.
    pub fn from_config(cfg: &RoutingConfig) -> anyhow::Result<Self> {
        if cfg.default_url.trim().is_empty() {
            anyhow::bail!("routing table needs a default destination");
        }

        let mut exact = HashMap::new();
        for entry in &cfg.route {
            let key = digits(&entry.number);
            if key.is_empty() {
                anyhow::bail!("route number '{}' contains no digits", entry.number);
            }
            exact.entry(key).or_insert_with(|| entry.url.clone());
        }

        let mut groups = Vec::with_capacity(cfg.group.len());
        for g in &cfg.group {
            let members: HashSet<String> = g
                .members
                .iter()
                .map(|m| normalize_number(m.trim()))
                .filter(|m| !m.is_empty())
                .collect();
            if members.is_empty() {
                anyhow::bail!("routing group '{}' has no usable members", g.name);
            }
            groups.push(RouteGroup {
                name: g.name.clone(),
                members,
                url: g.url.clone(),
            });
        }

        Ok(Self {
            exact,
            groups,
            default_url: cfg.default_url.clone(),
        })
    }

    /// Resolve the dialed number to a destination URL. Never fails.
    ///
    /// Exact rules first: full digit string, then — for numbers longer than
    /// 10 digits — the trailing 10, which absorbs inconsistent country-code
    /// prefixes. Groups after that, in configured order. Default last.
    pub fn resolve(&self, to: &str) -> &str {
        let normalized = normalize_number(to);
        let d = digits(to);

        if let Some(url) = self.exact.get(&d) {
            return url;
        }
        if d.len() > 10 {
            if let Some(url) = self.exact.get(&d[d.len() - 10..]) {
                return url;
            }
        }

        for group in &self.groups {
            if group.contains(&normalized, &d) {
                return &group.url;
            }
        }

        &self.default_url
    }

    /// Name of the group that would route this number, for debug output.
    pub fn matching_group(&self, to: &str) -> Option<&str> {
        let normalized = normalize_number(to);
        let d = digits(to);
        self.groups
            .iter()
            .find(|g| g.contains(&normalized, &d))
            .map(|g| g.name.as_str())
    }

    pub fn exact_count(&self) -> usize {
        self.exact.len()
    }

    pub fn group_names(&self) -> Vec<&str> {
        self.groups.iter().map(|g| g.name.as_str()).collect()
    }

    pub fn default_url(&self) -> &str {
        &self.default_url
    }
}
