//! Link probe records and status classification

use serde::{Deserialize, Serialize};

/// What the site owner should do about a broken link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recommendation {
    Fix,
    Redirect,
    Remove,
}

impl Recommendation {
    /// 404 → redirect the dead URL, any other error status → fix the link
    pub fn for_status(status: u16) -> Self {
        if status == 404 {
            Self::Redirect
        } else {
            Self::Fix
        }
    }
}

/// A link that did not resolve to a successful page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkProbeResult {
    pub url: String,
    /// HTTP status of the last hop, 0 when no response was received
    pub status: u16,
    pub error: Option<String>,
    /// Seed pages the link appeared on
    pub found_on: Vec<String>,
    pub classification: Recommendation,
}

/// A link answered with a redirect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedirectRecord {
    pub from: String,
    /// Final destination when hops are followed, else the first `Location`
    pub to: String,
    /// Status of the first redirect response
    pub status: u16,
    /// Every URL that answered with a redirect, starting at `from`
    pub chain: Vec<String>,
    pub found_on: Vec<String>,
}

/// Outcome of resolving one link, before `found_on` is attached
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum LinkVerdict {
    Ok,
    Broken {
        status: u16,
        error: Option<String>,
        recommendation: Recommendation,
    },
    Redirect {
        to: String,
        status: u16,
        chain: Vec<String>,
    },
}

impl LinkVerdict {
    /// Verdict for a non-redirect final status
    pub(crate) fn from_status(status: u16) -> Self {
        if status >= 400 {
            Self::Broken {
                status,
                error: Some(format!("HTTP {}", status)),
                recommendation: Recommendation::for_status(status),
            }
        } else {
            Self::Ok
        }
    }

    /// Verdict for a link that produced no response
    pub(crate) fn unreachable(error: String) -> Self {
        Self::Broken {
            status: 0,
            error: Some(error),
            recommendation: Recommendation::Remove,
        }
    }
}
