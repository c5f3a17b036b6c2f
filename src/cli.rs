// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the derive API: the Cli struct below IS the interface, and clap
// generates the parsing, help text, and error messages from it.
//
// Anything clap can't express directly (the "40s" timeout syntax, the
// "name=value;name=value" header grammar, sub-path / header files) is parsed
// by the helper functions at the bottom. Malformed values and unreadable
// files are fatal: the process reports and exits before any request is sent.
// =============================================================================

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "html-scout",
    version = "0.1.0",
    about = "Fetch web pages and reveal HTML comments and hidden form fields",
    long_about = "html-scout sends GET requests to a root URL (and optionally a set of \
                  sub-paths under it, fetched concurrently) and scans each response for \
                  HTML comments and type=\"hidden\" elements - the things developers \
                  forget they left in the page."
)]
pub struct Cli {
    /// Root URL to fetch. With sub-paths, this is the prefix every target is
    /// derived from, so it normally ends with "/"
    pub url: String,

    /// Sub-path under the root URL; repeat the flag or separate with commas
    #[arg(long = "sub-path", value_delimiter = ',')]
    pub sub_paths: Vec<String>,

    /// File with one sub-path per line, combined with any --sub-path flags
    #[arg(long)]
    pub sub_paths_file: Option<PathBuf>,

    /// Cookie to present to the target, in name=value form
    #[arg(long)]
    pub cookie: Option<String>,

    /// Request header(s), in name=value form; separate several with ";"
    #[arg(long)]
    pub header: Option<String>,

    /// File with one name=value header per line
    #[arg(long)]
    pub headers_file: Option<PathBuf>,

    /// Request timeout as whole seconds with an "s" suffix, e.g. 40s
    #[arg(long, default_value = "30s", value_parser = parse_timeout)]
    pub timeout: Duration,

    /// Search responses for HTML comments
    #[arg(long)]
    pub comments: bool,

    /// Search responses for elements with type="hidden"
    #[arg(long)]
    pub hidden: bool,

    /// Send a random browser User-Agent header
    #[arg(long)]
    pub random_agent: bool,

    /// Output findings as JSON instead of plain text
    #[arg(long)]
    pub json: bool,

    /// Maximum number of concurrently running fetches during fan-out
    #[arg(long, default_value_t = 50)]
    pub pool_cap: usize,

    /// How long to wait for in-flight fetches after dispatch, e.g. 60s
    #[arg(long, default_value = "60s", value_parser = parse_timeout)]
    pub wait_ceiling: Duration,
}

/// Parses the "<integer>s" duration syntax ("40s" -> 40 seconds).
///
/// Used by clap for --timeout and --wait-ceiling; the String error becomes
/// the flag's diagnostic message.
pub fn parse_timeout(raw: &str) -> std::result::Result<Duration, String> {
    let seconds = raw
        .strip_suffix('s')
        .ok_or_else(|| format!("invalid timeout '{}': expected e.g. 40s", raw))?;

    seconds
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|_| format!("invalid timeout '{}': expected e.g. 40s", raw))
}

/// Parses an inline header specification: name=value, several separated
/// by ";". Every entry must contain an "=" or the whole spec is rejected.
pub fn parse_header_spec(raw: &str) -> Result<Vec<(String, String)>> {
    let mut headers = Vec::new();

    for entry in raw.split(';') {
        let (name, value) = entry
            .split_once('=')
            .ok_or_else(|| anyhow!("invalid header format '{}': expected name=value", entry))?;
        headers.push((name.to_string(), value.to_string()));
    }

    Ok(headers)
}

/// Reads a file into its non-empty lines (sub-path lists, header lists).
pub fn load_lines(path: &PathBuf) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("could not read {}", path.display()))?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Reads a headers file: one name=value per line, all lines must parse.
pub fn load_header_file(path: &PathBuf) -> Result<Vec<(String, String)>> {
    let mut headers = Vec::new();

    for line in load_lines(path)? {
        let (name, value) = line
            .split_once('=')
            .ok_or_else(|| anyhow!("invalid header format '{}': expected name=value", line))?;
        headers.push((name.to_string(), value.to_string()));
    }

    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timeout_accepts_suffixed_seconds() {
        assert_eq!(parse_timeout("40s").unwrap(), Duration::from_secs(40));
        assert_eq!(parse_timeout("0s").unwrap(), Duration::from_secs(0));
    }

    #[test]
    fn test_parse_timeout_rejects_bare_numbers_and_junk() {
        assert!(parse_timeout("40").is_err());
        assert!(parse_timeout("s").is_err());
        assert!(parse_timeout("forty seconds").is_err());
        assert!(parse_timeout("-5s").is_err());
    }

    #[test]
    fn test_parse_header_spec_single() {
        let headers = parse_header_spec("Accept=text/html").unwrap();
        assert_eq!(
            headers,
            vec![("Accept".to_string(), "text/html".to_string())]
        );
    }

    #[test]
    fn test_parse_header_spec_multiple() {
        let headers = parse_header_spec("A=1;B=2;C=3").unwrap();
        assert_eq!(headers.len(), 3);
        assert_eq!(headers[2], ("C".to_string(), "3".to_string()));
    }

    #[test]
    fn test_parse_header_spec_rejects_missing_equals() {
        assert!(parse_header_spec("no-equals-here").is_err());
        // One bad entry poisons the whole spec
        assert!(parse_header_spec("A=1;broken;C=3").is_err());
    }

    #[test]
    fn test_cli_parses_full_flag_set() {
        let cli = Cli::parse_from([
            "html-scout",
            "http://example.test/",
            "--sub-path",
            "a,b",
            "--cookie",
            "sid=1",
            "--header",
            "X-Test=1",
            "--timeout",
            "10s",
            "--comments",
            "--hidden",
            "--random-agent",
            "--pool-cap",
            "8",
        ]);

        assert_eq!(cli.url, "http://example.test/");
        assert_eq!(cli.sub_paths, vec!["a", "b"]);
        assert_eq!(cli.cookie.as_deref(), Some("sid=1"));
        assert_eq!(cli.timeout, Duration::from_secs(10));
        assert!(cli.comments && cli.hidden && cli.random_agent);
        assert_eq!(cli.pool_cap, 8);
    }

    #[test]
    fn test_load_lines_skips_blanks() {
        let dir = std::env::temp_dir();
        let path = dir.join("html-scout-test-sub-paths.txt");
        std::fs::write(&path, "login/\n\nadmin/\n  \nrobots.txt\n").unwrap();

        let lines = load_lines(&path).unwrap();
        assert_eq!(lines, vec!["login/", "admin/", "robots.txt"]);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_lines_missing_file_is_an_error() {
        let path = PathBuf::from("/definitely/not/here.txt");
        assert!(load_lines(&path).is_err());
    }
}
