//! Severity classification
//!
//! Maps usage ratios to a [`Severity`]. Every rule guards its denominator
//! and treats a zero usage as "no data", so nothing here can divide by zero.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Request is over-provisioned when mean usage is at most this share of it
pub const REQUEST_OVERKILL_RATIO: f64 = 0.35;

/// Limit is over-provisioned when it is at least this multiple of p95 usage
pub const LIMIT_OVERKILL_MULTIPLE: f64 = 3.0;

/// Severity of a suggestion, ranked for display priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Danger,
    Warning,
    Overkill,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::Danger, Severity::Warning, Severity::Overkill];

    /// Display rank, lower sorts first
    pub fn rank(&self) -> u8 {
        match self {
            Severity::Danger => 0,
            Severity::Warning => 1,
            Severity::Overkill => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Danger => "danger",
            Severity::Warning => "warning",
            Severity::Overkill => "overkill",
        }
    }

    /// Action a reader is expected to take
    pub fn action(&self) -> &'static str {
        match self {
            Severity::Danger | Severity::Warning => "Increase limit",
            Severity::Overkill => "Reduce request",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unknown severity name
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown severity {0:?} (expected danger, warning or overkill)")]
pub struct SeverityParseError(pub String);

impl FromStr for Severity {
    type Err = SeverityParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "danger" | "critical" => Ok(Severity::Danger),
            "warning" => Ok(Severity::Warning),
            "overkill" | "over-prov" => Ok(Severity::Overkill),
            _ => Err(SeverityParseError(s.to_string())),
        }
    }
}

/// Ratio thresholds for the near/over-limit rule
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bands {
    pub danger: f64,
    pub warning: f64,
}

/// CPU and memory against their limits
pub const COMPUTE_BANDS: Bands = Bands {
    danger: 0.90,
    warning: 0.70,
};

/// Ephemeral storage and sized emptyDir volumes
pub const EPHEMERAL_BANDS: Bands = Bands {
    danger: 0.90,
    warning: 0.70,
};

/// Persistent volume claims. The warning band is wider because a claim
/// resize is disruptive.
pub const CLAIM_BANDS: Bands = Bands {
    danger: 0.90,
    warning: 0.75,
};

impl Bands {
    /// Classify a ratio, boundary-inclusive on the low end of each band
    pub fn classify(&self, ratio: f64) -> Option<Severity> {
        if ratio >= self.danger {
            Some(Severity::Danger)
        } else if ratio >= self.warning {
            Some(Severity::Warning)
        } else {
            None
        }
    }
}

/// Outcome of the near/over-limit rule
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LimitPressure {
    pub severity: Severity,
    pub ratio: f64,
}

impl LimitPressure {
    /// Ratio as a rounded whole percentage
    pub fn percent(&self) -> i64 {
        (self.ratio * 100.0).round() as i64
    }
}

/// Rule 1: usage close to or above its limit or capacity
pub fn near_limit(usage: f64, limit: f64, bands: Bands) -> Option<LimitPressure> {
    if limit <= 0.0 || usage <= 0.0 {
        return None;
    }
    let ratio = usage / limit;
    bands
        .classify(ratio)
        .map(|severity| LimitPressure { severity, ratio })
}

/// Rule 2: request far above mean usage. Returns request ÷ mean.
pub fn request_overkill(mean_usage: f64, request: f64) -> Option<f64> {
    if request <= 0.0 || mean_usage <= 0.0 {
        return None;
    }
    (mean_usage / request <= REQUEST_OVERKILL_RATIO).then(|| request / mean_usage)
}

/// Rule 3: limit far above p95 usage. Returns limit ÷ p95.
pub fn limit_overkill(p95_usage: f64, limit: f64) -> Option<f64> {
    if limit <= 0.0 || p95_usage <= 0.0 {
        return None;
    }
    let multiple = limit / p95_usage;
    (multiple >= LIMIT_OVERKILL_MULTIPLE).then_some(multiple)
}

/// Rule 4: usage observed while no limit is set
pub fn missing_limit(usage: f64, limit: f64) -> bool {
    limit <= 0.0 && usage > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_boundaries() {
        assert_eq!(
            near_limit(900.0, 1000.0, COMPUTE_BANDS).map(|p| p.severity),
            Some(Severity::Danger)
        );
        assert_eq!(
            near_limit(0.899999, 1.0, COMPUTE_BANDS).map(|p| p.severity),
            Some(Severity::Warning)
        );
        assert_eq!(
            near_limit(700.0, 1000.0, COMPUTE_BANDS).map(|p| p.severity),
            Some(Severity::Warning)
        );
        assert!(near_limit(0.699999, 1.0, COMPUTE_BANDS).is_none());
    }

    #[test]
    fn test_claim_bands_are_wider() {
        assert!(near_limit(72.0, 100.0, CLAIM_BANDS).is_none());
        assert_eq!(
            near_limit(75.0, 100.0, CLAIM_BANDS).map(|p| p.severity),
            Some(Severity::Warning)
        );
        assert_eq!(
            near_limit(72.0, 100.0, EPHEMERAL_BANDS).map(|p| p.severity),
            Some(Severity::Warning)
        );
    }

    #[test]
    fn test_zero_denominator_never_classifies() {
        assert!(near_limit(500.0, 0.0, COMPUTE_BANDS).is_none());
        assert!(request_overkill(10.0, 0.0).is_none());
        assert!(limit_overkill(0.0, 1000.0).is_none());
    }

    #[test]
    fn test_request_overkill() {
        assert_eq!(request_overkill(100.0, 500.0), Some(5.0));
        assert!(request_overkill(100.0, 285.0).is_none());
        assert!(request_overkill(0.0, 500.0).is_none());
    }

    #[test]
    fn test_limit_overkill() {
        assert_eq!(limit_overkill(100.0, 300.0), Some(3.0));
        assert!(limit_overkill(100.0, 299.0).is_none());
    }

    #[test]
    fn test_missing_limit() {
        assert!(missing_limit(10.0, 0.0));
        assert!(!missing_limit(0.0, 0.0));
        assert!(!missing_limit(10.0, 100.0));
    }

    #[test]
    fn test_percent_rounding() {
        let pressure = near_limit(480.0, 500.0, COMPUTE_BANDS).unwrap();
        assert_eq!(pressure.percent(), 96);
    }

    #[test]
    fn test_severity_parsing_and_rank() {
        assert_eq!("Danger".parse::<Severity>(), Ok(Severity::Danger));
        assert_eq!(" overkill ".parse::<Severity>(), Ok(Severity::Overkill));
        assert!("healthy".parse::<Severity>().is_err());
        assert!(Severity::Danger.rank() < Severity::Warning.rank());
        assert!(Severity::Warning < Severity::Overkill);
        assert_eq!(Severity::Overkill.action(), "Reduce request");
    }
}
