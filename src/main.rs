// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Assemble the request options (cookie, headers, timeout, user-agent)
// 3. Fetch: the root URL alone, or a concurrent fan-out over its sub-paths
// 4. Scan each response body for comments and/or hidden fields
// 5. Print findings (plain text or JSON) and exit with a proper code
//    (0 = every target fetched, 1 = some targets failed, 2 = fatal error)
// =============================================================================

use anyhow::Result;
use clap::Parser;
use scraper::Html;
use serde::Serialize;

use html_scout::agents;
use html_scout::cli::{self, Cli};
use html_scout::fetch::{self, Address, FanoutLimits, RequestOptions};
use html_scout::scan::{self, Finding};

#[tokio::main]
async fn main() {
    // Run the application logic and capture the exit code; argument and
    // file errors land here as Err and terminate before any fetch
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Findings for one fetched page, keyed by its final address.
#[derive(Debug, Serialize)]
struct PageReport {
    url: String,
    findings: Vec<Finding>,
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();

    // --- Assemble the request options shared by every target ---------------
    let mut options = RequestOptions::new(Address::parse(&cli.url));
    options.timeout = cli.timeout;

    if let Some(cookie) = &cli.cookie {
        options.cookie = cookie.clone();
    }

    if let Some(spec) = &cli.header {
        for (name, value) in cli::parse_header_spec(spec)? {
            options.set_header(&name, &value);
        }
    }

    if let Some(path) = &cli.headers_file {
        for (name, value) in cli::load_header_file(path)? {
            options.set_header(&name, &value);
        }
    }

    if cli.random_agent {
        options.set_header("User-Agent", agents::random_user_agent());
    }

    // With neither toggle given, run both scans - fetching a page only to
    // report nothing would serve nobody
    let (scan_comments, scan_hidden) = if !cli.comments && !cli.hidden {
        (true, true)
    } else {
        (cli.comments, cli.hidden)
    };

    let mut sub_paths = cli.sub_paths.clone();
    if let Some(path) = &cli.sub_paths_file {
        sub_paths.extend(cli::load_lines(path)?);
    }

    // --- Fetch -------------------------------------------------------------
    let mut reports = Vec::new();
    let mut failed_targets = 0usize;

    if sub_paths.is_empty() {
        println!("🔍 Fetching {}", options.address);

        match fetch::fetch(&options).await {
            Ok(result) => {
                reports.push(build_report(
                    result.address.to_string(),
                    &result.body,
                    scan_comments,
                    scan_hidden,
                ));
            }
            Err(error) => {
                eprintln!("Fetch failed: {}", error);
                failed_targets += 1;
            }
        }
    } else {
        println!(
            "🔍 Fanning out over {} sub-path(s) under {}",
            sub_paths.len(),
            options.address
        );

        let limits = FanoutLimits {
            pool_cap: cli.pool_cap,
            wait_ceiling: cli.wait_ceiling,
        };

        let set = fetch::fetch_all(&options, &sub_paths, &limits).await;
        failed_targets = set.failures.len();

        for (url, body) in &set.bodies {
            reports.push(build_report(
                url.to_string(),
                body,
                scan_comments,
                scan_hidden,
            ));
        }
    }

    // Fan-out completion order is unspecified; sort so output is stable
    reports.sort_by(|a, b| a.url.cmp(&b.url));

    print_reports(&reports, cli.json)?;

    if failed_targets > 0 {
        Ok(1) // Some targets failed or were abandoned
    } else {
        Ok(0) // Every target fetched
    }
}

// Parses one response body and runs the requested scans over it.
fn build_report(url: String, body: &str, scan_comments: bool, scan_hidden: bool) -> PageReport {
    let document = Html::parse_document(body);

    let mut findings = Vec::new();
    if scan_comments {
        findings.extend(scan::find_comments(&document));
    }
    if scan_hidden {
        findings.extend(scan::find_hidden_fields(&document));
    }

    PageReport { url, findings }
}

// Prints the reports either as readable text or JSON
fn print_reports(reports: &[PageReport], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(reports)?);
        return Ok(());
    }

    let mut total = 0usize;

    for report in reports {
        println!("\n{}:", report.url);

        if report.findings.is_empty() {
            println!("   (nothing found)");
            continue;
        }

        for finding in &report.findings {
            total += 1;
            match finding {
                Finding::Comment { text } => println!("   💬 comment: {}", text),
                Finding::HiddenField { markup } => println!("   🕵️  hidden:  {}", markup),
            }
        }
    }

    println!("\n📊 Summary:");
    println!("   📄 Pages scanned: {}", reports.len());
    println!("   🔎 Findings: {}", total);

    Ok(())
}
