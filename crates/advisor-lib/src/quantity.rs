//! Quantity parsing and unit normalization
//!
//! The parsing half implements the input boundary: it turns Kubernetes
//! quantity strings ("500m", "2", "18447n", "1Gi", "512M") into
//! [`ResourceQuantity`] values, and [`resolve_workloads`] fills in numeric
//! fields a sender left out. The normalization half is what the engine
//! uses: it reads the numeric field that matches the resource's unit and
//! treats anything missing as 0.

use crate::models::{
    ContainerResourceSpec, ResourcePair, ResourceQuantity, VolumeSpec, WorkloadSpec,
};
use thiserror::Error;

const KIB: i64 = 1024;
const MIB: i64 = KIB * 1024;
const GIB: i64 = MIB * 1024;
const TIB: i64 = GIB * 1024;

/// Suffix table, two-letter binary suffixes first so "Mi" never matches "M"
const BYTE_SUFFIXES: &[(&str, i64)] = &[
    ("Ki", KIB),
    ("Mi", MIB),
    ("Gi", GIB),
    ("Ti", TIB),
    ("K", 1_000),
    ("k", 1_000),
    ("M", 1_000_000),
    ("G", 1_000_000_000),
    ("T", 1_000_000_000_000),
];

/// Errors produced when a quantity string cannot be accepted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuantityError {
    #[error("quantity is empty")]
    Empty,
    #[error("invalid quantity {0:?}")]
    Invalid(String),
    #[error("negative quantity {0:?}")]
    Negative(String),
}

/// Unit a quantity is compared in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    Millicores,
    Bytes,
}

impl Unit {
    pub fn for_cpu(is_cpu: bool) -> Self {
        if is_cpu {
            Unit::Millicores
        } else {
            Unit::Bytes
        }
    }

    pub fn is_cpu(self) -> bool {
        matches!(self, Unit::Millicores)
    }
}

/// Normalize an optional quantity to a comparable scalar.
///
/// Absent quantities and quantities whose numeric field is missing yield 0.
/// Negative values are clamped to 0 so they can never drive a ratio.
pub fn normalize(quantity: Option<&ResourceQuantity>, unit: Unit) -> f64 {
    let value = quantity.and_then(|q| match unit {
        Unit::Millicores => q.millicores,
        Unit::Bytes => q.bytes,
    });
    value.map(|v| v.max(0) as f64).unwrap_or(0.0)
}

/// Parse a CPU quantity into millicores.
///
/// Handles nanocores ("18447n"), millicores ("500m") and whole or
/// fractional cores ("2", "0.5").
pub fn parse_cpu_millicores(raw: &str) -> Result<i64, QuantityError> {
    let s = raw.trim();
    if s.is_empty() {
        return Err(QuantityError::Empty);
    }
    let millicores = if let Some(nanos) = s.strip_suffix('n') {
        parse_integer(nanos, raw)? / 1_000_000
    } else if let Some(millis) = s.strip_suffix('m') {
        parse_integer(millis, raw)?
    } else {
        (parse_decimal(s, raw)? * 1000.0) as i64
    };
    Ok(millicores)
}

/// Parse a memory or storage quantity into bytes.
///
/// Supports binary (Ki/Mi/Gi/Ti) and decimal (K/M/G/T) suffixes, nano-bytes
/// reported by the metrics API ("n") and plain byte counts.
pub fn parse_memory_bytes(raw: &str) -> Result<i64, QuantityError> {
    let s = raw.trim();
    if s.is_empty() {
        return Err(QuantityError::Empty);
    }
    for (suffix, factor) in BYTE_SUFFIXES {
        if let Some(mantissa) = s.strip_suffix(suffix) {
            return Ok((parse_decimal(mantissa, raw)? * *factor as f64) as i64);
        }
    }
    if let Some(nanos) = s.strip_suffix('n') {
        return Ok(parse_integer(nanos, raw)? / 1_000_000_000);
    }
    parse_integer(s, raw)
}

fn parse_integer(s: &str, raw: &str) -> Result<i64, QuantityError> {
    let value: i64 = s
        .parse()
        .map_err(|_| QuantityError::Invalid(raw.to_string()))?;
    if value < 0 {
        return Err(QuantityError::Negative(raw.to_string()));
    }
    Ok(value)
}

fn parse_decimal(s: &str, raw: &str) -> Result<f64, QuantityError> {
    let value: f64 = s
        .parse()
        .map_err(|_| QuantityError::Invalid(raw.to_string()))?;
    if !value.is_finite() {
        return Err(QuantityError::Invalid(raw.to_string()));
    }
    if value < 0.0 {
        return Err(QuantityError::Negative(raw.to_string()));
    }
    Ok(value)
}

impl ResourceQuantity {
    /// Parse a CPU quantity, rejecting malformed or negative input
    pub fn parse_cpu(raw: &str) -> Result<Self, QuantityError> {
        Ok(Self {
            raw: raw.to_string(),
            millicores: Some(parse_cpu_millicores(raw)?),
            bytes: None,
        })
    }

    /// Parse a memory or storage quantity, rejecting malformed or negative input
    pub fn parse_memory(raw: &str) -> Result<Self, QuantityError> {
        Ok(Self {
            raw: raw.to_string(),
            millicores: None,
            bytes: Some(parse_memory_bytes(raw)?),
        })
    }

    /// Build a quantity from raw text, keeping it textual-only when it does
    /// not parse.
    pub fn lenient(raw: &str, unit: Unit) -> Self {
        let parsed = if unit.is_cpu() {
            Self::parse_cpu(raw)
        } else {
            Self::parse_memory(raw)
        };
        parsed.unwrap_or_else(|_| Self {
            raw: raw.to_string(),
            millicores: None,
            bytes: None,
        })
    }

    /// Fill the numeric field for `unit` from the raw text when the sender
    /// left it out. A value already present is kept.
    pub fn resolve(&mut self, unit: Unit) {
        let missing = match unit {
            Unit::Millicores => self.millicores.is_none(),
            Unit::Bytes => self.bytes.is_none(),
        };
        if !missing || self.raw.trim().is_empty() {
            return;
        }
        let parsed = Self::lenient(&self.raw, unit);
        self.millicores = self.millicores.or(parsed.millicores);
        self.bytes = self.bytes.or(parsed.bytes);
    }
}

fn resolve_field(quantity: &mut Option<ResourceQuantity>, unit: Unit) {
    if let Some(q) = quantity {
        q.resolve(unit);
    }
}

fn resolve_pair(pair: &mut ResourcePair) {
    resolve_field(&mut pair.cpu, Unit::Millicores);
    resolve_field(&mut pair.memory, Unit::Bytes);
}

fn resolve_container(container: &mut ContainerResourceSpec) {
    resolve_pair(&mut container.requests);
    resolve_pair(&mut container.limits);
    if let Some(usage) = &mut container.usage {
        resolve_pair(usage);
    }
    if let Some(eph) = &mut container.ephemeral_storage {
        resolve_field(&mut eph.request, Unit::Bytes);
        resolve_field(&mut eph.limit, Unit::Bytes);
        resolve_field(&mut eph.usage, Unit::Bytes);
    }
}

fn resolve_volume(volume: &mut VolumeSpec) {
    resolve_field(&mut volume.size_limit, Unit::Bytes);
    resolve_field(&mut volume.capacity, Unit::Bytes);
    resolve_field(&mut volume.usage, Unit::Bytes);
    resolve_field(&mut volume.available, Unit::Bytes);
}

/// Input boundary: parse every quantity that arrived as text only.
///
/// Unparseable text stays textual and normalizes to 0 downstream.
pub fn resolve_workloads(workloads: &mut [WorkloadSpec]) {
    for pod in workloads.iter_mut().flat_map(|w| w.pods.iter_mut()) {
        pod.containers.iter_mut().for_each(resolve_container);
        pod.volumes.iter_mut().for_each(resolve_volume);
    }
}
