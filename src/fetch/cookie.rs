// src/fetch/cookie.rs
// =============================================================================
// This module parses a raw cookie string into a structured cookie.
//
// The accepted shape is "name=value". Anything without an "=" is treated as
// "no cookie supplied" rather than an error - the rest of the fetch pipeline
// checks for the absent sentinel to decide whether to attach a cookie jar to
// the HTTP client at all.
//
// Rust concepts:
// - split_once: Splits a string on the FIRST occurrence of a pattern
// - Associated constants: Cookie::ABSENT_NAME lives on the type itself
// =============================================================================

/// A single cookie destined for the request client.
///
/// `path` is always "/" so the cookie applies to the target host and all of
/// its sub-paths, and `version` is always 0 (legacy cookie semantics: no
/// attribute quoting, no Max-Age negotiation).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub path: &'static str,
    pub version: u8,
}

impl Cookie {
    /// Sentinel name signalling "no cookie was supplied".
    ///
    /// Downstream code must only use this to decide whether to attach cookie
    /// state to a client - never as a literal cookie name.
    const ABSENT_NAME: &'static str = "none";

    /// Parses a raw cookie string.
    ///
    /// Rules:
    /// - No "=" anywhere -> the absent sentinel. Malformed input deliberately
    ///   degrades to "no cookie" instead of erroring; callers wanting strict
    ///   validation must pre-validate.
    /// - Otherwise split on the FIRST "=": the name is everything before it,
    ///   the value is everything after it, embedded "=" characters included.
    pub fn parse(raw: &str) -> Cookie {
        match raw.split_once('=') {
            Some((name, value)) => Cookie {
                name: name.to_string(),
                value: value.to_string(),
                path: "/",
                version: 0,
            },
            None => Cookie {
                name: Self::ABSENT_NAME.to_string(),
                value: String::new(),
                path: "/",
                version: 0,
            },
        }
    }

    /// Returns true if this is the absent sentinel (no cookie supplied).
    pub fn is_absent(&self) -> bool {
        self.name == Self::ABSENT_NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_equals_yields_absent_sentinel() {
        let cookie = Cookie::parse("just-some-text");
        assert!(cookie.is_absent());
        assert_eq!(cookie.name, "none");
        assert_eq!(cookie.value, "");
    }

    #[test]
    fn test_empty_string_yields_absent_sentinel() {
        assert!(Cookie::parse("").is_absent());
    }

    #[test]
    fn test_simple_name_value() {
        let cookie = Cookie::parse("PHPSESSID=abc123");
        assert!(!cookie.is_absent());
        assert_eq!(cookie.name, "PHPSESSID");
        assert_eq!(cookie.value, "abc123");
        assert_eq!(cookie.path, "/");
        assert_eq!(cookie.version, 0);
    }

    #[test]
    fn test_split_happens_once_only() {
        // Embedded "=" characters stay inside the value verbatim
        let cookie = Cookie::parse("token=a=b=c");
        assert_eq!(cookie.name, "token");
        assert_eq!(cookie.value, "a=b=c");
    }

    #[test]
    fn test_leading_equals_is_not_absent() {
        // "=value" does contain an "=", so it parses as an empty name
        let cookie = Cookie::parse("=value");
        assert!(!cookie.is_absent());
        assert_eq!(cookie.name, "");
        assert_eq!(cookie.value, "value");
    }
}
