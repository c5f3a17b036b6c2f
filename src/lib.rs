// src/lib.rs
// =============================================================================
// Library surface of html-scout.
//
// The binary in main.rs is a thin assembly layer over these modules; keeping
// them in a lib target also lets the integration tests under tests/ drive
// the fetch-and-scan pipeline directly.
// =============================================================================

pub mod agents; // static User-Agent pool + random selection
pub mod cli; // command-line flags and value/file parsing
pub mod fetch; // options, cookie codec, single fetch, fan-out
pub mod scan; // comment / hidden-field extraction
