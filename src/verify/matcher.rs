//! Resource, environment and proxy matching for API products.
//!
//! Resource patterns use two wildcards:
//! - `**` matches any run of characters, including `/` and the empty run
//! - `*` matches one or more characters other than `/`
//!
//! A pattern containing `**` uses only the `**` rule, so any lone `*` left in
//! it is literal. A pattern without wildcards must equal the path exactly.

use regex::Regex;

const ANY_RUN: &str = "**";
const SEGMENT_RUN: char = '*';

/// Returns true if `path` matches any of `patterns`. An empty pattern list
/// places no restriction on the path.
pub fn path_matches(patterns: &[String], path: &str) -> bool {
    patterns.is_empty() || patterns.iter().any(|p| pattern_matches(p, path))
}

/// Match a single resource pattern against a request path.
pub fn pattern_matches(pattern: &str, path: &str) -> bool {
    let translated = if pattern.contains(ANY_RUN) {
        translate(pattern, ANY_RUN, ".*")
    } else if pattern.contains(SEGMENT_RUN) {
        translate(pattern, "*", "[^/]+")
    } else {
        return pattern == path;
    };

    match Regex::new(&translated) {
        Ok(re) => re.is_match(path),
        Err(e) => {
            tracing::warn!(pattern, error = %e, "Resource pattern does not compile");
            false
        }
    }
}

/// Split on the wildcard, escape the literal pieces and anchor the result.
fn translate(pattern: &str, wildcard: &str, replacement: &str) -> String {
    let body = pattern
        .split(wildcard)
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(replacement);
    format!("^{body}$")
}

/// Returns true if the requested environment is allowed. An empty list allows all.
pub fn environment_matches(environments: &[String], environment: &str) -> bool {
    environments.is_empty() || environments.iter().any(|e| e == environment)
}

/// Returns true if the requested proxy is allowed. An empty list allows all.
pub fn proxy_matches(proxies: &[String], proxy: &str) -> bool {
    proxies.is_empty() || proxies.iter().any(|p| p == proxy)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patterns(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_patterns_match_anything() {
        assert!(path_matches(&[], "/anything/at/all"));
        assert!(path_matches(&[], ""));
    }

    #[test]
    fn test_double_star_matches_across_segments() {
        let p = patterns(&["/a/**"]);
        assert!(path_matches(&p, "/a/b/c"));
        assert!(path_matches(&p, "/a/"));
        assert!(!path_matches(&p, "/x"));
        assert!(!path_matches(&p, "/a"));
    }

    #[test]
    fn test_root_double_star() {
        let p = patterns(&["/**"]);
        assert!(path_matches(&p, "/"));
        assert!(path_matches(&p, "/b"));
        assert!(path_matches(&p, "/b/c/d"));
        assert!(!path_matches(&p, "b"));
    }

    #[test]
    fn test_single_star_stays_within_segment() {
        let p = patterns(&["/a/*"]);
        assert!(path_matches(&p, "/a/b"));
        assert!(!path_matches(&p, "/a/b/c"));
        // `*` requires at least one character
        assert!(!path_matches(&p, "/a/"));
    }

    #[test]
    fn test_single_star_in_middle() {
        assert!(pattern_matches("/users/*/orders", "/users/42/orders"));
        assert!(!pattern_matches("/users/*/orders", "/users/42/x/orders"));
    }

    #[test]
    fn test_lone_star_is_literal_with_double_star() {
        assert!(pattern_matches("/a/*/**", "/a/*/b/c"));
        assert!(!pattern_matches("/a/*/**", "/a/x/b/c"));
    }

    #[test]
    fn test_exact_pattern() {
        let p = patterns(&["/a/b"]);
        assert!(path_matches(&p, "/a/b"));
        assert!(!path_matches(&p, "/a/b/"));
        assert!(!path_matches(&p, "/a"));
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        assert!(pattern_matches("/v1.0/**", "/v1.0/items"));
        assert!(!pattern_matches("/v1.0/**", "/v1x0/items"));
        assert!(pattern_matches("/items(*)", "/items(7)"));
        assert!(pattern_matches("/q?a=1", "/q?a=1"));
    }

    #[test]
    fn test_any_pattern_may_match() {
        let p = patterns(&["/x", "/a/*", "/b/**"]);
        assert!(path_matches(&p, "/b/c/d"));
        assert!(path_matches(&p, "/a/z"));
        assert!(!path_matches(&p, "/c"));
    }

    #[test]
    fn test_environment_matches() {
        assert!(environment_matches(&[], "prod"));
        assert!(environment_matches(&patterns(&["test"]), "test"));
        assert!(!environment_matches(&patterns(&["test"]), "prod"));
        assert!(!environment_matches(&patterns(&["Test"]), "test"));
    }

    #[test]
    fn test_proxy_matches() {
        assert!(proxy_matches(&[], "orders-v1"));
        assert!(proxy_matches(&patterns(&["a", "orders-v1"]), "orders-v1"));
        assert!(!proxy_matches(&patterns(&["a"]), "orders-v1"));
    }
}
