// src/fetch/fanout.rs
// =============================================================================
// This module fans one request template out across many sub-paths.
//
// How it works:
// 1. For each sub-path, derive a full address by concatenating the root
//    address's string form with the sub-path
// 2. Sub-paths that don't produce a parseable address are skipped (and
//    recorded) - one bad sub-path never aborts the batch
// 3. Each valid target gets its own copy of the request options with only
//    the address swapped, so concurrent fetches never share mutable state
// 4. Fetches run concurrently, bounded by min(targets, pool cap)
// 5. Completions are drained under a collective wait ceiling; anything still
//    in flight past the ceiling is abandoned and its result discarded
//
// Rust concepts:
// - buffer_unordered: Run up to N futures at once, yield results as they
//   finish (completion order is unspecified by design)
// - timeout_at: A single deadline shared by the whole drain loop
// =============================================================================

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use futures::stream::{self, StreamExt};
use tokio::time::{timeout_at, Instant};
use url::Url;

use super::options::{Address, RequestOptions};
use super::single::{self, FetchCause, FetchError};

/// Tuning knobs for one fan-out batch.
///
/// Neither value is a hard constant: callers (and the CLI) can size the pool
/// and the wait ceiling to the target they are scanning.
#[derive(Debug, Clone)]
pub struct FanoutLimits {
    /// Upper bound on concurrently running fetches. The actual pool is
    /// min(valid targets, pool_cap), so a large sub-path list can never
    /// spawn unbounded connections.
    pub pool_cap: usize,
    /// How long to keep waiting for in-flight fetches after dispatch.
    pub wait_ceiling: Duration,
}

impl Default for FanoutLimits {
    fn default() -> FanoutLimits {
        FanoutLimits {
            pool_cap: 50,
            wait_ceiling: Duration::from_secs(60),
        }
    }
}

/// Aggregated outcome of a fan-out batch.
///
/// `bodies` maps each target's final address to its response body; key order
/// carries no meaning. `failures` is the parallel error report: derivation
/// failures, per-target fetch errors, and abandoned stragglers all land
/// there instead of vanishing silently.
#[derive(Debug, Default)]
pub struct ResponseSet {
    pub bodies: HashMap<Url, String>,
    pub failures: Vec<FetchError>,
}

impl ResponseSet {
    /// Number of successfully fetched targets.
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn get(&self, address: &Url) -> Option<&str> {
        self.bodies.get(address).map(String::as_str)
    }
}

/// Fetches every sub-path under the root address concurrently.
///
/// With no sub-paths there is no work to do and the empty set comes back
/// immediately - callers with a single target should use
/// [`single::fetch`](super::single::fetch) directly. Partial failure is the
/// normal mode here: whatever fetched shows up in `bodies`, everything else
/// is accounted for in `failures`. Every call issues fresh network requests;
/// nothing is memoized.
pub async fn fetch_all(
    root: &RequestOptions,
    sub_paths: &[String],
    limits: &FanoutLimits,
) -> ResponseSet {
    let mut set = ResponseSet::default();

    if sub_paths.is_empty() {
        return set;
    }

    // The root's string form is the prefix for every derived address. An
    // invalid root simply makes every derivation fail; each failure is
    // recorded individually below.
    let root_text = root.address.to_string();

    let mut targets = Vec::new();
    for sub_path in sub_paths {
        match derive_address(&root_text, sub_path) {
            Ok(url) => targets.push(url),
            Err(joined) => {
                // Non-fatal: skip this target, keep the batch going
                eprintln!(
                    "  Warning: sub-path '{}' derives unparseable address '{}', skipping",
                    sub_path, joined
                );
                set.failures.push(FetchError {
                    address: Address::Invalid(joined),
                    cause: FetchCause::InvalidAddress,
                    message: format!("derived from sub-path '{}'", sub_path),
                });
            }
        }
    }

    if targets.is_empty() {
        return set;
    }

    let pool_size = targets.len().min(limits.pool_cap.max(1));

    // Dispatch addresses we still expect an answer from; whatever is left
    // when the ceiling hits gets reported as interrupted
    let mut pending: HashSet<Url> = targets.iter().cloned().collect();

    // One future per target, each owning its own copy of the options with
    // only the address replaced - the template is never shared mutably
    let fetches = targets.into_iter().map(|url| {
        let options = root.with_address(Address::Valid(url.clone()));
        async move { (url, single::fetch(&options).await) }
    });

    let mut completions = stream::iter(fetches).buffer_unordered(pool_size);

    // After dispatch no new work is accepted; we only drain completions,
    // and only until the collective deadline
    let deadline = Instant::now() + limits.wait_ceiling;

    loop {
        match timeout_at(deadline, completions.next()).await {
            // A fetch finished successfully: record body under its final
            // (post-redirect) address
            Ok(Some((dispatched, Ok(result)))) => {
                pending.remove(&dispatched);
                set.bodies.insert(result.address, result.body);
            }
            // A fetch failed: non-fatal, siblings keep running
            Ok(Some((dispatched, Err(error)))) => {
                pending.remove(&dispatched);
                eprintln!("  Warning: fetch failed for {}", error);
                set.failures.push(error);
            }
            // Stream exhausted: every fetch completed within the ceiling
            Ok(None) => break,
            // Ceiling reached: abandon stragglers, keep what we have
            Err(_) => {
                eprintln!(
                    "  Warning: wait ceiling reached, abandoning {} in-flight fetch(es)",
                    pending.len()
                );
                for url in pending.drain() {
                    set.failures.push(single::interrupted(Address::Valid(url)));
                }
                break;
            }
        }
    }

    set
}

// Derives a full target address by concatenating the root's string form with
// a sub-path. Plain concatenation, not URL joining: "http://host/dir/" + "x"
// must become "http://host/dir/x" and nothing cleverer. On parse failure the
// joined string comes back so the caller can report it.
fn derive_address(root_text: &str, sub_path: &str) -> Result<Url, String> {
    let joined = format!("{}{}", root_text, sub_path);
    Url::parse(&joined).map_err(|_| joined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

    fn root_options(server: &MockServer) -> RequestOptions {
        RequestOptions::new(Address::parse(&server.uri()))
    }

    fn paths(list: &[&str]) -> Vec<String> {
        list.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_derive_address_concatenates_verbatim() {
        let url = derive_address("http://example.test/", "login/login.php").unwrap();
        assert_eq!(url.as_str(), "http://example.test/login/login.php");
    }

    #[test]
    fn test_derive_address_fails_for_invalid_root() {
        let joined = derive_address("not a url/", "a").unwrap_err();
        assert_eq!(joined, "not a url/a");
    }

    #[tokio::test]
    async fn test_empty_sub_paths_do_no_work() {
        let root = RequestOptions::new(Address::parse("http://example.test/"));
        let set = fetch_all(&root, &[], &FanoutLimits::default()).await;
        assert!(set.is_empty());
        assert!(set.failures.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_root_skips_every_target_without_io() {
        let root = RequestOptions::new(Address::parse("no scheme here"));
        let set = fetch_all(&root, &paths(&["a", "b", "c"]), &FanoutLimits::default()).await;

        assert!(set.is_empty());
        assert_eq!(set.failures.len(), 3);
        assert!(set
            .failures
            .iter()
            .all(|f| f.cause == FetchCause::InvalidAddress));
    }

    #[tokio::test]
    async fn test_two_targets_both_fetched() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/a"))
            .respond_with(ResponseTemplate::new(200).set_body_string("alpha"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/b"))
            .respond_with(ResponseTemplate::new(200).set_body_string("beta"))
            .mount(&server)
            .await;

        let root = root_options(&server);
        let set = fetch_all(&root, &paths(&["a", "b"]), &FanoutLimits::default()).await;

        assert_eq!(set.len(), 2);
        let key_a = Url::parse(&format!("{}/a", server.uri())).unwrap();
        let key_b = Url::parse(&format!("{}/b", server.uri())).unwrap();
        assert_eq!(set.get(&key_a), Some("alpha"));
        assert_eq!(set.get(&key_b), Some("beta"));
        assert!(set.failures.is_empty());
    }

    // Echoes the request path back as the body, so every target has a
    // deterministic, distinct response
    struct PathEcho;

    impl Respond for PathEcho {
        fn respond(&self, request: &Request) -> ResponseTemplate {
            ResponseTemplate::new(200).set_body_string(request.url.path().to_string())
        }
    }

    #[tokio::test]
    async fn test_fifty_targets_yield_fifty_uncorrupted_entries() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(PathEcho)
            .mount(&server)
            .await;

        let sub_paths: Vec<String> = (0..50).map(|i| format!("p{}", i)).collect();
        let root = root_options(&server);
        let set = fetch_all(&root, &sub_paths, &FanoutLimits::default()).await;

        assert_eq!(set.len(), 50);
        assert!(set.failures.is_empty());
        // No interleaving or cross-talk: each body is exactly its own path
        for (url, body) in &set.bodies {
            assert_eq!(url.path(), body);
        }
    }

    #[tokio::test]
    async fn test_one_slow_target_fails_alone() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/fast"))
            .respond_with(ResponseTemplate::new(200).set_body_string("fast"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("slow")
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let mut root = root_options(&server);
        // Per-request budget small enough to fail the delayed target only
        root.timeout = Duration::from_millis(200);

        let set = fetch_all(&root, &paths(&["fast", "slow"]), &FanoutLimits::default()).await;

        assert_eq!(set.len(), 1);
        assert_eq!(set.failures.len(), 1);
        assert_eq!(set.failures[0].cause, FetchCause::Transport);
    }

    #[tokio::test]
    async fn test_wait_ceiling_abandons_stragglers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/fast"))
            .respond_with(ResponseTemplate::new(200).set_body_string("fast"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("slow")
                    .set_delay(Duration::from_secs(10)),
            )
            .mount(&server)
            .await;

        let root = root_options(&server);
        let limits = FanoutLimits {
            pool_cap: 50,
            wait_ceiling: Duration::from_millis(500),
        };

        let set = fetch_all(&root, &paths(&["fast", "slow"]), &limits).await;

        // The fast target made it in, the straggler was abandoned and
        // reported rather than waited for
        let key_fast = Url::parse(&format!("{}/fast", server.uri())).unwrap();
        assert_eq!(set.get(&key_fast), Some("fast"));
        assert_eq!(set.len(), 1);
        assert_eq!(set.failures.len(), 1);
        assert_eq!(set.failures[0].cause, FetchCause::Interrupted);
    }
}
