//! Origin pattern compilation and matching.
//!
//! Compilation is total: input that does not fit the origin grammar
//! produces a pattern that matches nothing, so a bad configuration entry
//! fails closed instead of taking setup down with it.

use url::Url;

/// Scheme component of a compiled pattern
#[derive(Debug, Clone, PartialEq, Eq)]
enum SchemeRule {
    /// `*://...`
    Any,
    /// No scheme given: the web schemes only
    Web,
    Exact(String),
}

/// Host component of a compiled pattern
#[derive(Debug, Clone, PartialEq, Eq)]
enum HostRule {
    Any,
    Exact {
        host: String,
        include_subdomains: bool,
    },
}

/// Path component of a compiled pattern
#[derive(Debug, Clone, PartialEq, Eq)]
enum PathRule {
    Any,
    /// Trailing `*` after a non-empty prefix
    Prefix(String),
    Exact(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Rule {
    scheme: SchemeRule,
    host: HostRule,
    path: PathRule,
}

/// A compiled origin-access rule.
///
/// Immutable once compiled. The degenerate pattern (from malformed input)
/// matches no URL at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginPattern {
    rule: Option<Rule>,
}

impl OriginPattern {
    /// A pattern that matches no URL.
    pub fn match_nothing() -> Self {
        Self { rule: None }
    }

    /// Compile an origin string into a pattern. Never fails.
    ///
    /// Accepted forms:
    /// - `scheme://host/path`: `scheme` and `host` may each be `*`; a
    ///   host of `*.example.com` implies subdomain matching; a path of
    ///   `/*` (or no path) matches everything after the host
    /// - `scheme:*`: any URL of that scheme (covers schemes without an
    ///   authority, like inline data)
    /// - `host/path`: scheme-less origins match the web schemes only
    /// - `*`: wildcard scheme, host, and path
    pub fn compile(origin: &str, include_subdomains: bool) -> Self {
        let origin = origin.trim();
        if origin.is_empty() {
            tracing::warn!("empty origin pattern matches nothing");
            return Self::match_nothing();
        }
        if origin == "*" {
            return Self {
                rule: Some(Rule {
                    scheme: SchemeRule::Any,
                    host: HostRule::Any,
                    path: PathRule::Any,
                }),
            };
        }

        let (scheme, rest) = match origin.split_once("://") {
            Some(("*", rest)) => (SchemeRule::Any, rest),
            Some((s, rest)) if is_scheme(s) => (SchemeRule::Exact(s.to_ascii_lowercase()), rest),
            Some(_) => {
                tracing::warn!("malformed origin pattern {origin:?} matches nothing");
                return Self::match_nothing();
            }
            None => match origin.split_once(':') {
                // scheme-only form, e.g. `data:*`
                Some((s, tail)) if is_scheme(s) => {
                    return Self {
                        rule: Some(Rule {
                            scheme: SchemeRule::Exact(s.to_ascii_lowercase()),
                            host: HostRule::Any,
                            path: compile_path(tail),
                        }),
                    };
                }
                Some(_) => {
                    tracing::warn!("malformed origin pattern {origin:?} matches nothing");
                    return Self::match_nothing();
                }
                None => (SchemeRule::Web, origin),
            },
        };

        let (host_part, path_part) = match rest.find('/') {
            Some(i) => (&rest[..i], &rest[i..]),
            None => (rest, ""),
        };

        let host = if host_part.is_empty() || host_part == "*" {
            HostRule::Any
        } else {
            let (host_part, include_subdomains) = match host_part.strip_prefix("*.") {
                Some(h) => (h, true),
                None => (host_part, include_subdomains),
            };
            if host_part.is_empty() || host_part.contains(['*', ':', '/']) {
                tracing::warn!("malformed origin pattern {origin:?} matches nothing");
                return Self::match_nothing();
            }
            HostRule::Exact {
                host: host_part.to_ascii_lowercase(),
                include_subdomains,
            }
        };

        Self {
            rule: Some(Rule {
                scheme,
                host,
                path: compile_path(path_part),
            }),
        }
    }

    /// Match a full URL string against this pattern.
    ///
    /// URLs that do not parse never match.
    pub fn matches(&self, url: &str) -> bool {
        let Some(rule) = &self.rule else { return false };
        let Ok(parsed) = Url::parse(url) else {
            return false;
        };

        let scheme_ok = match &rule.scheme {
            SchemeRule::Any => true,
            SchemeRule::Web => matches!(parsed.scheme(), "http" | "https"),
            SchemeRule::Exact(scheme) => parsed.scheme() == scheme,
        };
        if !scheme_ok {
            return false;
        }

        let host_ok = match &rule.host {
            HostRule::Any => true,
            HostRule::Exact {
                host,
                include_subdomains,
            } => match parsed.host_str() {
                Some(candidate) => {
                    let candidate = candidate.to_ascii_lowercase();
                    candidate == *host || (*include_subdomains && is_subdomain(&candidate, host))
                }
                None => false,
            },
        };
        if !host_ok {
            return false;
        }

        match &rule.path {
            PathRule::Any => true,
            PathRule::Prefix(prefix) => remaining(&parsed).starts_with(prefix.as_str()),
            PathRule::Exact(exact) => remaining(&parsed) == *exact,
        }
    }
}

fn compile_path(path: &str) -> PathRule {
    match path {
        "" | "*" | "/*" => PathRule::Any,
        p if p.ends_with('*') => PathRule::Prefix(p[..p.len() - 1].to_string()),
        p => PathRule::Exact(p.to_string()),
    }
}

/// `candidate` is `host` with one or more label prefixes prepended.
fn is_subdomain(candidate: &str, host: &str) -> bool {
    candidate.len() > host.len()
        && candidate.ends_with(host)
        && candidate.as_bytes()[candidate.len() - host.len() - 1] == b'.'
}

fn is_scheme(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Path, query, and fragment of a parsed URL, as one string.
fn remaining(url: &Url) -> String {
    let mut out = url.path().to_string();
    if let Some(query) = url.query() {
        out.push('?');
        out.push_str(query);
    }
    if let Some(fragment) = url.fragment() {
        out.push('#');
        out.push_str(fragment);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_wildcard() {
        let pattern = OriginPattern::compile("file:///*", false);
        assert!(pattern.matches("file:///path/x.html"));
        assert!(pattern.matches("file:///y"));
        assert!(!pattern.matches("content:///z"));
    }

    #[test]
    fn test_scheme_only_form() {
        let pattern = OriginPattern::compile("data:*", false);
        assert!(pattern.matches("data:text/html,<b>hi</b>"));
        assert!(pattern.matches("data:image/png;base64,AAAA"));
        assert!(!pattern.matches("file:///x"));
    }

    #[test]
    fn test_subdomains() {
        let pattern = OriginPattern::compile("example.com", true);
        assert!(pattern.matches("http://example.com/a"));
        assert!(pattern.matches("http://a.example.com/a"));
        assert!(pattern.matches("http://a.b.example.com/a"));
        assert!(!pattern.matches("http://notexample.com/a"));
        assert!(!pattern.matches("http://example.com.evil/a"));
    }

    #[test]
    fn test_no_subdomains() {
        let pattern = OriginPattern::compile("example.com", false);
        assert!(pattern.matches("https://example.com/a"));
        assert!(!pattern.matches("https://a.example.com/a"));
    }

    #[test]
    fn test_star_dot_host_form() {
        // the `*.host` spelling implies subdomain matching on its own
        let pattern = OriginPattern::compile("https://*.example.com", false);
        assert!(pattern.matches("https://a.example.com/"));
        assert!(pattern.matches("https://example.com/"));
        assert!(!pattern.matches("https://example.org/"));
    }

    #[test]
    fn test_schemeless_is_web_only() {
        let pattern = OriginPattern::compile("example.com", true);
        assert!(pattern.matches("https://example.com/"));
        assert!(!pattern.matches("ftp://example.com/"));
        assert!(!pattern.matches("example-scheme://example.com/"));
    }

    #[test]
    fn test_scheme_case_insensitive() {
        let pattern = OriginPattern::compile("HTTP://example.com", false);
        assert!(pattern.matches("http://example.com/"));
        // the URL parser lowercases the scheme before we compare
        assert!(pattern.matches("HTTP://example.com/"));
    }

    #[test]
    fn test_host_case_insensitive() {
        let pattern = OriginPattern::compile("http://Example.COM", false);
        assert!(pattern.matches("http://example.com/"));
        assert!(pattern.matches("http://EXAMPLE.com/"));
    }

    #[test]
    fn test_exact_path() {
        let pattern = OriginPattern::compile("https://example.com/login", false);
        assert!(pattern.matches("https://example.com/login"));
        assert!(!pattern.matches("https://example.com/login/extra"));
        assert!(!pattern.matches("https://example.com/login?next=/"));
    }

    #[test]
    fn test_path_prefix() {
        let pattern = OriginPattern::compile("https://example.com/app/*", false);
        assert!(pattern.matches("https://example.com/app/index.html"));
        assert!(pattern.matches("https://example.com/app/a?b=c#d"));
        assert!(!pattern.matches("https://example.com/other"));
    }

    #[test]
    fn test_wildcard_path_spans_query_and_fragment() {
        let pattern = OriginPattern::compile("https://example.com/*", false);
        assert!(pattern.matches("https://example.com/a?b=c"));
        assert!(pattern.matches("https://example.com/a#frag"));
    }

    #[test]
    fn test_full_wildcard() {
        let pattern = OriginPattern::compile("*", false);
        assert!(pattern.matches("http://anything/x"));
        assert!(pattern.matches("sms:12345"));
    }

    #[test]
    fn test_malformed_origin_matches_nothing() {
        for origin in ["", "   ", "htt p://x", "https://exa*mple.com", "https://example.com:8080", "::"] {
            let pattern = OriginPattern::compile(origin, true);
            assert!(!pattern.matches("https://example.com/"), "origin {origin:?}");
            assert!(!pattern.matches("file:///x"), "origin {origin:?}");
        }
    }

    #[test]
    fn test_malformed_url_never_matches() {
        let pattern = OriginPattern::compile("*", false);
        assert!(!pattern.matches(""));
        assert!(!pattern.matches("not a url"));
        assert!(!pattern.matches("//missing-scheme.com/x"));
    }

    #[test]
    fn test_match_nothing() {
        let pattern = OriginPattern::match_nothing();
        assert!(!pattern.matches("https://example.com/"));
    }
}
