//! Kapsel Policy
//!
//! The decision layer of the WebView shell. For every URL the embedded
//! rendering surface wants to navigate to or fetch, this crate decides
//! whether the load may proceed in-page, must be handed to the OS, must
//! be silently blocked, or is actually an encoded bridge call for the
//! native side.
//!
//! Two chains cover the two event kinds:
//! - [`NavigationPolicy`] for whole-page navigations
//! - [`ResourcePolicy`] for sub-resource fetches
//!
//! Both read the same [`ShellConfig`] (built once, then immutable) and
//! call out to collaborator traits supplied by the embedder: plugin hooks,
//! the bundled-asset store, the OS URL opener, and the private-storage
//! predicate. Every failure path fails closed: the chains always return
//! a decision, never an error, and nothing here panics on hostile input.
//!
//! All evaluation runs synchronously on the thread that owns the surface;
//! there is no internal concurrency and nothing blocks beyond local
//! computation and bundled-asset reads.

mod asset;
mod config;
mod hooks;
mod navigation;
mod quirks;
mod resource;
mod response;
mod util;

pub use asset::{AssetError, AssetStore, DirAssetStore};
pub use config::{AccessRule, DEFAULT_START_URL, ShellConfig, ShellConfigBuilder};
pub use hooks::{
    ExternalOpener, NoHandler, NoPlugins, PluginHooks, RequestInterceptor, SegmentGuard,
    StorageGuard,
};
pub use navigation::{NavigationDecision, NavigationPolicy};
pub use quirks::PlatformQuirks;
pub use resource::{ResourceDecision, ResourcePolicy};
pub use response::ResourceResponse;

// Re-export the sibling crates the policies are built on.
pub use kapsel_allowlist as allowlist;
pub use kapsel_bridge as bridge;
