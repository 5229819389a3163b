//! Performance vitals intake
//!
//! This core never measures anything itself. Samples come from an external
//! source (a browser observer, a lab runner, a synthetic agent) and are
//! folded into one process-wide [`VitalsAggregator`], whose snapshot feeds
//! the scoring engine.

mod aggregator;
mod rating;

pub use aggregator::VitalsAggregator;
pub use rating::{rate_vitals, MetricRating, Rating, VitalsReport};

use serde::{Deserialize, Serialize};

/// One externally supplied measurement set
///
/// Timings are milliseconds; CLS is unit-less. A `None` field means "not
/// measured", never zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct VitalsSample {
    pub lcp: Option<f64>,
    pub fid: Option<f64>,
    pub cls: Option<f64>,
    pub fcp: Option<f64>,
    pub ttfb: Option<f64>,
}

impl VitalsSample {
    /// Returns a copy of `self` with every field present in `newer` replaced
    pub fn merged_with(&self, newer: &VitalsSample) -> VitalsSample {
        VitalsSample {
            lcp: newer.lcp.or(self.lcp),
            fid: newer.fid.or(self.fid),
            cls: newer.cls.or(self.cls),
            fcp: newer.fcp.or(self.fcp),
            ttfb: newer.ttfb.or(self.ttfb),
        }
    }

    /// True when no field has been measured
    pub fn is_empty(&self) -> bool {
        self.lcp.is_none()
            && self.fid.is_none()
            && self.cls.is_none()
            && self.fcp.is_none()
            && self.ttfb.is_none()
    }
}
