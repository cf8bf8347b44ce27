//! Usage-series aggregation
//!
//! Reduces a container's historical samples to the two figures the
//! suggestion rules consume: the arithmetic mean and the 95th percentile.

use crate::models::UsageSample;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Minimum number of samples before a series replaces the snapshot value
pub const MIN_SERIES_SAMPLES: usize = 2;

/// Sample count from which a series is medium confidence
pub const MEDIUM_CONFIDENCE_SAMPLES: usize = 60;

/// Sample count from which a series is high confidence
pub const HIGH_CONFIDENCE_SAMPLES: usize = 400;

/// Arithmetic mean, 0 for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Nearest-rank 95th percentile, 0 for an empty slice
pub fn p95(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let rank = (0.95 * sorted.len() as f64).ceil() as usize;
    sorted[rank.saturating_sub(1).min(sorted.len() - 1)]
}

/// How many samples back a percentile-based suggestion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn from_sample_count(samples: usize) -> Self {
        if samples >= HIGH_CONFIDENCE_SAMPLES {
            Confidence::High
        } else if samples >= MEDIUM_CONFIDENCE_SAMPLES {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::Low => "low confidence",
            Confidence::Medium => "medium confidence",
            Confidence::High => "high confidence",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregates of a usable series
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesStats {
    pub samples: usize,
    pub mean: f64,
    pub p95: f64,
}

impl SeriesStats {
    /// Aggregate a series, or `None` when it is too short to be usable
    pub fn from_samples(samples: &[UsageSample]) -> Option<Self> {
        if samples.len() < MIN_SERIES_SAMPLES {
            return None;
        }
        let values: Vec<f64> = samples.iter().map(|s| s.v.max(0.0)).collect();
        Some(Self {
            samples: values.len(),
            mean: mean(&values),
            p95: p95(&values),
        })
    }

    pub fn confidence(&self) -> Confidence {
        Confidence::from_sample_count(self.samples)
    }
}

/// Figures a rule compares against: history aggregates when usable,
/// otherwise the instantaneous snapshot for both.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UsageEstimate {
    pub snapshot: f64,
    pub mean: f64,
    pub p95: f64,
    pub confidence: Option<Confidence>,
}

impl UsageEstimate {
    pub fn new(snapshot: f64, stats: Option<SeriesStats>) -> Self {
        match stats {
            Some(stats) => Self {
                snapshot,
                mean: stats.mean,
                p95: stats.p95,
                confidence: Some(stats.confidence()),
            },
            None => Self {
                snapshot,
                mean: snapshot,
                p95: snapshot,
                confidence: None,
            },
        }
    }

    pub fn from_history(snapshot: f64, samples: Option<&[UsageSample]>) -> Self {
        Self::new(snapshot, samples.and_then(SeriesStats::from_samples))
    }

    pub fn has_history(&self) -> bool {
        self.confidence.is_some()
    }
}

/// Error for an unknown look-back window label
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown look-back window {0:?} (expected 1h, 6h, 24h or 7d; omit it to skip the check)")]
pub struct WindowParseError(pub String);

/// Look-back window a history was fetched over.
///
/// The engine never branches on the window; only the sample density, and
/// therefore the confidence qualifier, differs between windows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LookbackWindow {
    #[default]
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "6h")]
    SixHours,
    #[serde(rename = "24h")]
    OneDay,
    #[serde(rename = "7d")]
    SevenDays,
}

impl LookbackWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            LookbackWindow::OneHour => "1h",
            LookbackWindow::SixHours => "6h",
            LookbackWindow::OneDay => "24h",
            LookbackWindow::SevenDays => "7d",
        }
    }

    pub fn duration_secs(&self) -> u64 {
        match self {
            LookbackWindow::OneHour => 3600,
            LookbackWindow::SixHours => 6 * 3600,
            LookbackWindow::OneDay => 24 * 3600,
            LookbackWindow::SevenDays => 7 * 24 * 3600,
        }
    }

    /// Query resolution used by the metrics backend for this window
    pub fn step_secs(&self) -> u64 {
        match self {
            LookbackWindow::OneHour => 60,
            LookbackWindow::SixHours => 120,
            LookbackWindow::OneDay => 300,
            LookbackWindow::SevenDays => 900,
        }
    }

    /// Samples a fully populated series over this window holds
    pub fn expected_samples(&self) -> usize {
        (self.duration_secs() / self.step_secs()) as usize
    }
}

impl FromStr for LookbackWindow {
    type Err = WindowParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1h" => Ok(LookbackWindow::OneHour),
            "6h" => Ok(LookbackWindow::SixHours),
            "24h" => Ok(LookbackWindow::OneDay),
            "7d" => Ok(LookbackWindow::SevenDays),
            other => Err(WindowParseError(other.to_string())),
        }
    }
}

impl fmt::Display for LookbackWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
