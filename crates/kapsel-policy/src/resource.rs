//! Sub-resource fetch interception.
//!
//! Unlike a navigation, a sub-resource fetch either gets a response
//! handed to the surface or passes through to the surface's default
//! fetch path. The chain runs: plugin opinion, harmful check (which
//! overrides the plugin), bundled-asset synthesis for URL shapes the
//! surface mishandles, then the plugin manager's last-resort hook.

use std::sync::Arc;

use percent_encoding::percent_decode_str;

use crate::asset::AssetStore;
use crate::config::ShellConfig;
use crate::hooks::{PluginHooks, RequestInterceptor, StorageGuard};
use crate::quirks::PlatformQuirks;
use crate::response::ResourceResponse;
use crate::util::starts_with_ignore_case;

/// Outcome of a sub-resource evaluation.
#[derive(Debug)]
pub enum ResourceDecision {
    /// Allowlist or storage violation: an explicit empty response the
    /// surface renders as a not-found instead of fetching.
    Denied(ResourceResponse),
    /// Response synthesized from the bundled-asset store.
    Asset(ResourceResponse),
    /// Response supplied by a plugin or the fallback interceptor.
    Plugin(ResourceResponse),
    /// No opinion: the surface performs its default fetch.
    PassThrough,
}

impl ResourceDecision {
    /// The response to hand to the surface, if any.
    pub fn into_response(self) -> Option<ResourceResponse> {
        match self {
            ResourceDecision::Denied(response)
            | ResourceDecision::Asset(response)
            | ResourceDecision::Plugin(response) => Some(response),
            ResourceDecision::PassThrough => None,
        }
    }
}

/// Ordered decision chain for sub-resource fetches.
pub struct ResourcePolicy {
    config: Arc<ShellConfig>,
    plugins: Arc<dyn PluginHooks>,
    assets: Arc<dyn AssetStore>,
    guard: Arc<dyn StorageGuard>,
    quirks: PlatformQuirks,
    fallback: Option<Arc<dyn RequestInterceptor>>,
}

impl ResourcePolicy {
    pub fn new(
        config: Arc<ShellConfig>,
        plugins: Arc<dyn PluginHooks>,
        assets: Arc<dyn AssetStore>,
        guard: Arc<dyn StorageGuard>,
    ) -> Self {
        let quirks = PlatformQuirks::new(config.api_level());
        Self {
            config,
            plugins,
            assets,
            guard,
            quirks,
            fallback: None,
        }
    }

    /// Install the plugin manager's last-resort interceptor.
    pub fn with_fallback(mut self, interceptor: Arc<dyn RequestInterceptor>) -> Self {
        self.fallback = Some(interceptor);
        self
    }

    /// Decide what happens to a sub-resource fetch.
    pub fn evaluate(&self, url: &str) -> ResourceDecision {
        let plugin_response = self.plugins.should_intercept_request(url);

        // the harmful check overrides whatever a plugin produced
        if self.is_harmful(url) {
            tracing::warn!("resource blocked by allowlist: {url}");
            return ResourceDecision::Denied(ResourceResponse::not_found());
        }

        if let Some(response) = plugin_response {
            return ResourceDecision::Plugin(response);
        }

        if has_query_or_fragment(url) || self.quirks.needs_encoded_space_fix(url) {
            if let Some(response) = self.asset_response(url) {
                return ResourceDecision::Asset(response);
            }
        }

        if let Some(interceptor) = &self.fallback {
            if let Some(response) = interceptor.intercept(url) {
                return ResourceDecision::Plugin(response);
            }
        }

        ResourceDecision::PassThrough
    }

    /// Web URLs outside the internal allowlist, and anything reaching
    /// into private storage, must not hit the default fetch path.
    fn is_harmful(&self, url: &str) -> bool {
        let unlisted_web = (starts_with_ignore_case(url, "http:")
            || starts_with_ignore_case(url, "https:"))
            && !self.config.internal_allowlist().is_allowed(url);
        unlisted_web || self.guard.touches_private_storage(url)
    }

    /// Resolve a bundled-asset URL against the asset store. The surface
    /// mishandles query strings, fragments, and (on affected platforms)
    /// encoded spaces in asset URLs, so those loads are answered here. A
    /// store miss yields no response and the chain continues.
    fn asset_response(&self, url: &str) -> Option<ResourceResponse> {
        let rest = url.strip_prefix(self.config.asset_url_prefix())?;
        let path = match rest.find(['?', '#']) {
            Some(i) => &rest[..i],
            None => rest,
        };

        let mime_type = path.ends_with(".html").then_some("text/html");

        let path = match percent_decode_str(path).decode_utf8() {
            Ok(decoded) => decoded.into_owned(),
            Err(err) => {
                tracing::error!("undecodable asset path in {url}: {err}");
                return None;
            }
        };

        match self.assets.open(&path) {
            Ok(stream) => Some(ResourceResponse::from_reader(mime_type, Some("UTF-8"), stream)),
            Err(err) => {
                tracing::error!("asset resolution failed for {url}: {err}");
                None
            }
        }
    }
}

fn has_query_or_fragment(url: &str) -> bool {
    url.contains('?') || url.contains('#')
}
