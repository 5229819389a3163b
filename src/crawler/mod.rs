//! Network side of the engine
//!
//! This module contains:
//! - HTTP fetching with redirect handling and error classification
//! - HEAD probes with a GET fallback
//! - The concurrent link scanner and its result records

mod classify;
mod fetcher;
mod scanner;

pub use classify::{LinkProbeResult, Recommendation, RedirectRecord};
pub use fetcher::{build_http_client, FetchError, FetchedPage, Fetcher, ProbeOutcome};
pub use scanner::{LinkScanResult, LinkScanner};
