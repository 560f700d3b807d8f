//! Whole-page navigation decisions.
//!
//! One terminal decision per URL, evaluated in strict order: bridge
//! dispatch, plugin override, local-scheme storage guard, internal
//! allowlist, external hand-off, block. First match wins; an unmatched
//! URL is never loaded and never handed off.

use std::sync::Arc;

use kapsel_bridge::BridgeCommand;

use crate::config::ShellConfig;
use crate::hooks::{ExternalOpener, PluginHooks, StorageGuard};
use crate::util::starts_with_ignore_case;

/// Terminal outcome of a navigation evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationDecision {
    /// The URL was an encoded bridge call and has been dispatched.
    CommandDispatched,
    /// A plugin claimed the navigation.
    PluginHandled,
    /// Let the surface perform its default load.
    Allow,
    /// The URL was handed to the OS.
    OpenedExternally,
    /// Deny: neither loadable in-page nor handed off.
    Blocked,
}

impl NavigationDecision {
    /// Whether the surface's default load must be suppressed.
    pub fn should_override(&self) -> bool {
        !matches!(self, NavigationDecision::Allow)
    }
}

/// Ordered decision chain for whole-page navigations.
pub struct NavigationPolicy {
    config: Arc<ShellConfig>,
    plugins: Arc<dyn PluginHooks>,
    opener: Arc<dyn ExternalOpener>,
    guard: Arc<dyn StorageGuard>,
}

impl NavigationPolicy {
    pub fn new(
        config: Arc<ShellConfig>,
        plugins: Arc<dyn PluginHooks>,
        opener: Arc<dyn ExternalOpener>,
        guard: Arc<dyn StorageGuard>,
    ) -> Self {
        Self {
            config,
            plugins,
            opener,
            guard,
        }
    }

    /// Decide what happens to a URL the surface wants to navigate to.
    ///
    /// Always returns a decision; every failure inside the chain fails
    /// closed rather than surfacing an error.
    pub fn evaluate(&self, url: &str) -> NavigationDecision {
        self.dispatch_exec(url)
            .or_else(|| self.plugin_override(url))
            .or_else(|| self.guard_local_schemes(url))
            .or_else(|| self.allow_internal(url))
            .or_else(|| self.hand_off_external(url))
            .unwrap_or(NavigationDecision::Blocked)
    }

    /// Step 1: exec-prefixed URLs are bridge calls, never real pages.
    fn dispatch_exec(&self, url: &str) -> Option<NavigationDecision> {
        if !self.config.exec_bridge_enabled() || !BridgeCommand::is_exec_url(url) {
            return None;
        }
        match BridgeCommand::decode(url) {
            Ok(command) => {
                self.plugins.exec(command);
                Some(NavigationDecision::CommandDispatched)
            }
            Err(err) => {
                // a malformed exec URL must never fall through to a page load
                tracing::error!("could not decode exec URL {url}: {err}");
                Some(NavigationDecision::Blocked)
            }
        }
    }

    /// Step 2: plugins may claim any navigation outright.
    fn plugin_override(&self, url: &str) -> Option<NavigationDecision> {
        self.plugins
            .on_override_url_loading(url)
            .then_some(NavigationDecision::PluginHandled)
    }

    /// Step 3: local-scheme URLs are terminal here. The private storage
    /// directory holds the surface's session databases; those files must
    /// not load as content even though the schemes themselves carry
    /// built-in internal rules.
    fn guard_local_schemes(&self, url: &str) -> Option<NavigationDecision> {
        if !starts_with_ignore_case(url, "file://") && !starts_with_ignore_case(url, "data:") {
            return None;
        }
        if self.guard.touches_private_storage(url) {
            tracing::warn!("navigation into private storage blocked: {url}");
            Some(NavigationDecision::Blocked)
        } else {
            Some(NavigationDecision::Allow)
        }
    }

    /// Step 4: internal allowlist.
    fn allow_internal(&self, url: &str) -> Option<NavigationDecision> {
        self.config
            .internal_allowlist()
            .is_allowed(url)
            .then_some(NavigationDecision::Allow)
    }

    /// Step 5: externally allowed URLs go to the OS. A missing handler
    /// falls through to the block default rather than retrying.
    fn hand_off_external(&self, url: &str) -> Option<NavigationDecision> {
        if !self.config.external_allowlist().is_allowed(url) {
            return None;
        }
        match self.opener.open(url) {
            Ok(()) => Some(NavigationDecision::OpenedExternally),
            Err(err) => {
                tracing::error!("external hand-off failed: {err}");
                None
            }
        }
    }
}
