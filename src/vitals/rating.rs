//! Good / needs-improvement / poor ratings per metric
//!
//! The thresholds are the published Web Vitals boundaries; a value equal to
//! a boundary belongs to the better band.

use crate::vitals::VitalsSample;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rating {
    Good,
    NeedsImprovement,
    Poor,
}

/// A measured metric with its rating
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRating {
    pub metric: String,
    pub value: f64,
    pub rating: Rating,
}

/// Ratings for every measured metric; unmeasured metrics are absent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VitalsReport {
    pub metrics: Vec<MetricRating>,
}

/// (name, good limit, poor limit)
const THRESHOLDS: [(&str, f64, f64); 5] = [
    ("LCP", 2500.0, 4000.0),
    ("FID", 100.0, 300.0),
    ("CLS", 0.1, 0.25),
    ("FCP", 1800.0, 3000.0),
    ("TTFB", 800.0, 1800.0),
];

fn rate(value: f64, good: f64, poor: f64) -> Rating {
    if value <= good {
        Rating::Good
    } else if value <= poor {
        Rating::NeedsImprovement
    } else {
        Rating::Poor
    }
}

/// Rates every field present in `sample`
pub fn rate_vitals(sample: &VitalsSample) -> VitalsReport {
    let values = [sample.lcp, sample.fid, sample.cls, sample.fcp, sample.ttfb];

    let metrics = THRESHOLDS
        .iter()
        .zip(values)
        .filter_map(|(&(metric, good, poor), value)| {
            value.map(|value| MetricRating {
                metric: metric.to_string(),
                value,
                rating: rate(value, good, poor),
            })
        })
        .collect();

    VitalsReport { metrics }
}
