//! Small string helpers shared by the policy chains.

/// Case-insensitive ASCII prefix check.
///
/// Scheme prefixes must be compared this way: the URL parser treats
/// `FILE://` and `file://` identically, so a raw case-sensitive check
/// would let an uppercase scheme slip past a guard the lowercase form
/// triggers.
pub(crate) fn starts_with_ignore_case(url: &str, prefix: &str) -> bool {
    url.len() >= prefix.len()
        && url.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}
