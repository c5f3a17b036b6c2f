// src/fetch/single.rs
// =============================================================================
// This module sends exactly one GET request and captures the response.
//
// Key behavior:
// - An invalid address short-circuits into an error before any network I/O
// - The cookie (if present) is attached through a per-client cookie jar,
//   never through any process-global cookie handler
// - Headers are applied in their mapping order
// - The per-request timeout is applied verbatim, zero included
// - Every outcome is exactly one of FetchResult / FetchError - a failed fetch
//   is never represented by a null-ish value
//
// Rust concepts:
// - Result<T, E>: Success and failure as a single two-variant type
// - Arc: Shared ownership of the cookie jar with the client
// =============================================================================

use std::fmt;
use std::sync::Arc;

use reqwest::cookie::Jar;
use reqwest::{redirect::Policy, Client};
use url::Url;

use super::cookie::Cookie;
use super::options::{Address, RequestOptions};

/// A captured successful response.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchResult {
    /// Final resolved address, after any redirects the client followed.
    pub address: Url,
    /// HTTP status code. Non-2xx responses are still successful fetches;
    /// the caller decides what a status means.
    pub status: u16,
    /// Full response body as text.
    pub body: String,
}

/// Why a fetch failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchCause {
    /// The target address never parsed; no network call was attempted.
    InvalidAddress,
    /// Network or protocol fault during send (connection refused, DNS
    /// failure, per-request timeout, broken body stream).
    Transport,
    /// The fetch was cancelled before it could complete.
    Interrupted,
}

/// A failed fetch, carrying the address it was aimed at.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchError {
    pub address: Address,
    pub cause: FetchCause,
    /// Human-readable detail for logs.
    pub message: String,
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cause = match self.cause {
            FetchCause::InvalidAddress => "invalid address",
            FetchCause::Transport => "transport failure",
            FetchCause::Interrupted => "interrupted",
        };
        write!(f, "{} ({}): {}", self.address, cause, self.message)
    }
}

/// Sends one GET request described by `options`.
///
/// The call blocks (suspends) for the full network round trip; run it on a
/// worker task if you need concurrency. Redirects are followed by the client
/// (up to 5 hops) and the final URL is reported in the result.
pub async fn fetch(options: &RequestOptions) -> Result<FetchResult, FetchError> {
    // An invalid address is detected before any I/O happens
    let url = match options.address.as_url() {
        Some(url) => url.clone(),
        None => {
            return Err(FetchError {
                address: options.address.clone(),
                cause: FetchCause::InvalidAddress,
                message: "address failed to parse".to_string(),
            });
        }
    };

    let client = build_client(&options.cookie, &url).map_err(|e| FetchError {
        address: options.address.clone(),
        cause: FetchCause::Transport,
        message: format!("failed to build HTTP client: {}", e),
    })?;

    // GET only - this tool never sends a request body
    let mut request = client.get(url).timeout(options.timeout);

    // Apply each header in mapping order; RequestOptions guarantees unique
    // names, so there is no duplicate-header ambiguity here
    for (name, value) in &options.headers {
        request = request.header(name.as_str(), value.as_str());
    }

    match request.send().await {
        Ok(response) => {
            let final_url = response.url().clone();
            let status = response.status().as_u16();

            match response.text().await {
                Ok(body) => Ok(FetchResult {
                    address: final_url,
                    status,
                    body,
                }),
                Err(e) => Err(categorize_error(&options.address, e)),
            }
        }
        Err(e) => Err(categorize_error(&options.address, e)),
    }
}

/// Builds the HTTP client for one fetch.
///
/// If the raw cookie parses to a real cookie (not the absent sentinel), a
/// cookie jar scoped to this client carries it for the target host with
/// path "/" so it also covers every sub-path. TLS uses rustls, whose ALPN
/// negotiates up to HTTP/2 when the server supports it.
fn build_client(raw_cookie: &str, url: &Url) -> Result<Client, reqwest::Error> {
    let cookie = Cookie::parse(raw_cookie);

    let builder = Client::builder().redirect(Policy::limited(5));

    if cookie.is_absent() {
        return builder.build();
    }

    let jar = Jar::default();
    jar.add_cookie_str(
        &format!("{}={}; Path={}", cookie.name, cookie.value, cookie.path),
        url,
    );

    builder.cookie_provider(Arc::new(jar)).build()
}

// Maps a reqwest error onto our fetch-error taxonomy.
//
// Everything that goes wrong on the wire is a transport failure; the message
// keeps enough detail to tell a timeout from a refused connection in logs.
fn categorize_error(address: &Address, error: reqwest::Error) -> FetchError {
    let message = if error.is_timeout() {
        "request timed out".to_string()
    } else if error.is_connect() {
        format!("connection failed: {}", error)
    } else {
        error.to_string()
    };

    FetchError {
        address: address.clone(),
        cause: FetchCause::Transport,
        message,
    }
}

/// Builds the error recorded for a fetch that was still in flight when its
/// batch stopped waiting.
pub(crate) fn interrupted(address: Address) -> FetchError {
    FetchError {
        address,
        cause: FetchCause::Interrupted,
        message: "abandoned after the batch wait ceiling".to_string(),
    }
}
