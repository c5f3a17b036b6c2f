// src/fetch/mod.rs
// =============================================================================
// This module contains the whole fetch pipeline.
//
// Submodules:
// - options: Address + RequestOptions, the per-target configuration bundle
// - cookie:  raw cookie string -> structured cookie (or the absent sentinel)
// - single:  builds and sends exactly one GET request
// - fanout:  runs one single-fetch per sub-path under a bounded pool
//
// This file is the module root - it re-exports the public API so callers can
// write `fetch::fetch_all(...)` instead of reaching into submodules.
// =============================================================================

mod cookie;
mod fanout;
mod options;
mod single;

pub use cookie::Cookie;
pub use fanout::{fetch_all, FanoutLimits, ResponseSet};
pub use options::{Address, RequestOptions, DEFAULT_TIMEOUT};
pub use single::{fetch, FetchCause, FetchError, FetchResult};
