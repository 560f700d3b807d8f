//! Collaborator seams supplied by the embedding shell.
//!
//! The policy chains never own plugin routing, OS hand-off, or the
//! surface's storage layout; they call through these traits and treat
//! every miss as a fall-through to the next step.

use kapsel_bridge::BridgeCommand;
use thiserror::Error;

use crate::response::ResourceResponse;

/// Hooks into the embedder's plugin registry.
pub trait PluginHooks {
    /// Let a plugin claim a whole-page navigation. `true` means the
    /// plugin handled it and the surface must not load the URL.
    fn on_override_url_loading(&self, url: &str) -> bool;

    /// Let a plugin answer a sub-resource fetch.
    fn should_intercept_request(&self, url: &str) -> Option<ResourceResponse>;

    /// Dispatch a decoded bridge call to its service.
    fn exec(&self, command: BridgeCommand);
}

/// Plugin hooks that never claim anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPlugins;

impl PluginHooks for NoPlugins {
    fn on_override_url_loading(&self, _url: &str) -> bool {
        false
    }

    fn should_intercept_request(&self, _url: &str) -> Option<ResourceResponse> {
        None
    }

    fn exec(&self, command: BridgeCommand) {
        tracing::warn!(
            "dropping bridge call {}.{}: no plugin registry installed",
            command.service,
            command.action
        );
    }
}

/// Generic last-resort request interception: the plugin manager's own
/// hook, distinct from the per-plugin [`PluginHooks`] seam, consulted
/// only when nothing earlier in the resource chain had an opinion.
pub trait RequestInterceptor {
    fn intercept(&self, url: &str) -> Option<ResourceResponse>;
}

/// Hand a URL to the operating system instead of loading it in-page.
pub trait ExternalOpener {
    fn open(&self, url: &str) -> Result<(), NoHandler>;
}

/// The OS has no application registered for the URL.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("no external handler for {url}")]
pub struct NoHandler {
    pub url: String,
}

/// Decides whether a URL reaches into the surface's private storage.
pub trait StorageGuard {
    fn touches_private_storage(&self, url: &str) -> bool;
}

/// Default guard: flags any URL containing the private data directory
/// segment. WebKit/Blink surfaces keep their session SQLite databases
/// under that directory, reachable through `file://` unless blocked.
#[derive(Debug, Clone)]
pub struct SegmentGuard {
    segment: String,
}

impl SegmentGuard {
    pub fn new(segment: &str) -> Self {
        Self {
            segment: segment.to_string(),
        }
    }
}

impl Default for SegmentGuard {
    fn default() -> Self {
        Self::new("app_webview")
    }
}

impl StorageGuard for SegmentGuard {
    fn touches_private_storage(&self, url: &str) -> bool {
        url.contains(&self.segment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_guard() {
        let guard = SegmentGuard::default();
        assert!(guard.touches_private_storage("file:///data/data/com.app/app_webview/Cookies"));
        assert!(!guard.touches_private_storage("file:///android_asset/www/index.html"));
    }

    #[test]
    fn test_segment_guard_custom_segment() {
        let guard = SegmentGuard::new("WebKitData");
        assert!(guard.touches_private_storage("file:///app/WebKitData/db.sqlite"));
        assert!(!guard.touches_private_storage("file:///app/app_webview/db.sqlite"));
    }

    #[test]
    fn test_no_plugins_claims_nothing() {
        let plugins = NoPlugins;
        assert!(!plugins.on_override_url_loading("https://example.com/"));
        assert!(plugins.should_intercept_request("https://example.com/").is_none());
    }
}
