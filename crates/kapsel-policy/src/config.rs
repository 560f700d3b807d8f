//! Shell configuration.
//!
//! Access rules, the start page, and preferences used to live in mutable
//! global state, re-initialized on every setup call; here the whole
//! configuration is an owned value built once and shared read-only with
//! the policy chains. Loading rules from a manifest format is the
//! embedder's job: deserialize into [`AccessRule`] values and feed them
//! to the builder.

use std::collections::HashMap;

use kapsel_allowlist::Allowlist;
use serde::{Deserialize, Serialize};
use url::Url;

/// Start page when no content source is configured.
pub const DEFAULT_START_URL: &str = "file:///android_asset/www/index.html";

/// URL prefix identifying bundled-asset loads.
const DEFAULT_ASSET_URL_PREFIX: &str = "file:///android_asset/";

/// One configured origin-access rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRule {
    pub origin: String,
    #[serde(default)]
    pub include_subdomains: bool,
    /// `false`: safe to load in-page; `true`: hand off to the OS.
    #[serde(default)]
    pub external: bool,
}

/// Immutable shell configuration consumed by the policy chains.
///
/// All mutation happens through [`ShellConfigBuilder`] before the first
/// navigation or resource event is evaluated.
#[derive(Debug, Clone)]
pub struct ShellConfig {
    internal: Allowlist,
    external: Allowlist,
    start_url: String,
    asset_url_prefix: String,
    preferences: HashMap<String, String>,
    exec_bridge_enabled: bool,
    api_level: u32,
}

impl ShellConfig {
    pub fn builder() -> ShellConfigBuilder {
        ShellConfigBuilder::new()
    }

    /// Rules for URLs the surface may load in-page.
    ///
    /// Always begins with the built-in local-scheme rules (local file,
    /// local content, inline data), installed ahead of anything
    /// configured.
    pub fn internal_allowlist(&self) -> &Allowlist {
        &self.internal
    }

    /// Rules for URLs handed to the OS instead of loaded in-page.
    pub fn external_allowlist(&self) -> &Allowlist {
        &self.external
    }

    pub fn start_url(&self) -> &str {
        &self.start_url
    }

    pub fn asset_url_prefix(&self) -> &str {
        &self.asset_url_prefix
    }

    pub fn preference(&self, name: &str) -> Option<&str> {
        self.preferences.get(name).map(String::as_str)
    }

    /// Whether navigation step 1 decodes exec-prefixed URLs at all.
    pub fn exec_bridge_enabled(&self) -> bool {
        self.exec_bridge_enabled
    }

    pub fn api_level(&self) -> u32 {
        self.api_level
    }
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Builder for [`ShellConfig`].
#[derive(Debug, Clone)]
pub struct ShellConfigBuilder {
    rules: Vec<AccessRule>,
    start_source: Option<String>,
    asset_url_prefix: String,
    preferences: HashMap<String, String>,
    exec_bridge_enabled: bool,
    api_level: u32,
}

impl ShellConfigBuilder {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            start_source: None,
            asset_url_prefix: DEFAULT_ASSET_URL_PREFIX.to_string(),
            preferences: HashMap::new(),
            exec_bridge_enabled: true,
            api_level: 0,
        }
    }

    pub fn access_rule(mut self, rule: AccessRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Allow in-page navigation to an origin.
    pub fn internal_origin(self, origin: &str, include_subdomains: bool) -> Self {
        self.access_rule(AccessRule {
            origin: origin.to_string(),
            include_subdomains,
            external: false,
        })
    }

    /// Route an origin to the OS instead of loading it in-page.
    pub fn external_origin(self, origin: &str, include_subdomains: bool) -> Self {
        self.access_rule(AccessRule {
            origin: origin.to_string(),
            include_subdomains,
            external: true,
        })
    }

    /// Set the start page. An absolute URL is kept as-is; anything else
    /// resolves against the bundled `www` root.
    pub fn start_page(mut self, src: &str) -> Self {
        self.start_source = Some(src.to_string());
        self
    }

    pub fn preference(mut self, name: &str, value: &str) -> Self {
        self.preferences.insert(name.to_string(), value.to_string());
        self
    }

    pub fn exec_bridge(mut self, enabled: bool) -> Self {
        self.exec_bridge_enabled = enabled;
        self
    }

    pub fn asset_url_prefix(mut self, prefix: &str) -> Self {
        self.asset_url_prefix = prefix.to_string();
        self
    }

    pub fn api_level(mut self, api_level: u32) -> Self {
        self.api_level = api_level;
        self
    }

    pub fn build(self) -> ShellConfig {
        let mut internal = Allowlist::new();
        // implicit local-scheme rules, ahead of anything configured
        internal.add("file:///*", false);
        internal.add("content:///*", false);
        internal.add("data:*", false);

        let mut external = Allowlist::new();
        for rule in &self.rules {
            if rule.external {
                external.add(&rule.origin, rule.include_subdomains);
            } else {
                internal.add(&rule.origin, rule.include_subdomains);
            }
        }

        let start_url = resolve_start_url(
            self.start_source.as_deref().unwrap_or("index.html"),
            &self.asset_url_prefix,
        );

        ShellConfig {
            internal,
            external,
            start_url,
            asset_url_prefix: self.asset_url_prefix,
            preferences: self.preferences,
            exec_bridge_enabled: self.exec_bridge_enabled,
            api_level: self.api_level,
        }
    }
}

impl Default for ShellConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn resolve_start_url(src: &str, asset_url_prefix: &str) -> String {
    if Url::parse(src).is_ok() {
        return src.to_string();
    }
    let src = src.strip_prefix('/').unwrap_or(src);
    format!("{asset_url_prefix}www/{src}")
}
