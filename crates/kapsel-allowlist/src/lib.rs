//! Kapsel Allowlist
//!
//! Origin-access rules for the WebView shell. A rule is compiled once from
//! the textual origin syntax (`scheme://host/path`, where any component may
//! be `*`) and then matched against full URL strings.
//!
//! Two independent lists exist per running configuration: the *internal*
//! list (URLs safe to load inside the rendering surface) and the *external*
//! list (URLs handed to the OS instead). Both are plain [`Allowlist`]
//! values; the split is owned by the configuration layer.
//!
//! Everything here fails closed: malformed origins compile to patterns
//! that match nothing, malformed URLs match no pattern, and an empty list
//! allows nothing.

mod list;
mod pattern;

pub use list::Allowlist;
pub use pattern::OriginPattern;
