// src/fetch/options.rs
// =============================================================================
// This module defines the configuration bundle attached to each fetch.
//
// Two types live here:
// - Address: a URL that either parsed correctly or is explicitly invalid.
//   A bad address is carried around as Address::Invalid(raw), never silently
//   replaced by some default and never represented as a null-ish Option.
// - RequestOptions: the per-target bundle (address, cookie string, headers,
//   timeout). The fan-out orchestrator copies this once per derived target,
//   so concurrent fetches never share a mutable options instance.
//
// Rust concepts:
// - Enums with data: Address carries a payload in both variants
// - Clone semantics: with_address() produces an independent value copy
// =============================================================================

use std::fmt;
use std::time::Duration;
use url::Url;

/// Default request timeout applied when the caller does not choose one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// An absolute resource locator that either parsed or didn't.
///
/// The Invalid variant keeps the raw text so error reports and derivation
/// logs can show exactly what failed to parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Address {
    Valid(Url),
    Invalid(String),
}

impl Address {
    /// Parses a string into an Address; parse failures become Invalid.
    pub fn parse(raw: &str) -> Address {
        match Url::parse(raw) {
            Ok(url) => Address::Valid(url),
            Err(_) => Address::Invalid(raw.to_string()),
        }
    }

    /// Returns the parsed URL, or None for an invalid address.
    pub fn as_url(&self) -> Option<&Url> {
        match self {
            Address::Valid(url) => Some(url),
            Address::Invalid(_) => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Address::Valid(_))
    }
}

impl fmt::Display for Address {
    // Valid addresses display in normalized URL form, invalid ones as the
    // raw text that failed to parse.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::Valid(url) => write!(f, "{}", url),
            Address::Invalid(raw) => write!(f, "{}", raw),
        }
    }
}

/// Configuration bundle for one fetch.
///
/// Constructed once per logical target. The fan-out path derives one fresh
/// copy per sub-path via [`RequestOptions::with_address`], overwriting only
/// the address; cookie, headers, and timeout are shared by value.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    /// Target address (possibly invalid - the fetcher checks before any I/O).
    pub address: Address,
    /// Raw cookie string in "name=value" form; empty means no cookie.
    pub cookie: String,
    /// Ordered header mapping, names unique.
    pub headers: Vec<(String, String)>,
    /// Per-request time budget. Applied verbatim at fetch time, zero
    /// included; the only defaulting happens here at construction.
    pub timeout: Duration,
}

impl RequestOptions {
    /// Creates options with no cookie, no headers, and the 30 second
    /// default timeout.
    pub fn new(address: Address) -> RequestOptions {
        RequestOptions {
            address,
            cookie: String::new(),
            headers: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Sets a header, replacing any existing header with the same name.
    ///
    /// Replacement keeps the original position, so header order stays stable
    /// and names stay unique - the request builder can then iterate the list
    /// directly without any duplicate-header ambiguity.
    pub fn set_header(&mut self, name: &str, value: &str) {
        if let Some(entry) = self.headers.iter_mut().find(|(n, _)| n == name) {
            entry.1 = value.to_string();
        } else {
            self.headers.push((name.to_string(), value.to_string()));
        }
    }

    /// Returns an independent copy of these options with only the address
    /// replaced.
    ///
    /// This is the copy-on-derive rule the fan-out depends on: every derived
    /// target gets its own options value, so one in-flight fetch can never
    /// observe another's address.
    pub fn with_address(&self, address: Address) -> RequestOptions {
        RequestOptions {
            address,
            cookie: self.cookie.clone(),
            headers: self.headers.clone(),
            timeout: self.timeout,
        }
    }
}
