//! KubeAdjust advisor service
//!
//! Serves the suggestion engine over HTTP next to health and metrics
//! endpoints.

pub mod api;
pub mod config;
