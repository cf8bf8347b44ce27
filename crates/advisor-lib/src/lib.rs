//! Resource advisor library
//!
//! This crate provides the core functionality for:
//! - Parsing and normalizing Kubernetes resource quantities
//! - Aggregating usage history (mean, p95)
//! - Classifying usage against requests, limits and capacities
//! - Generating, ranking and grouping sizing suggestions
//! - Observability for the hosts embedding the engine
//!
//! The engine is a pure function: [`compute_suggestions`] takes a namespace
//! snapshot and optional history and returns a ranked list, with no I/O and
//! no hidden state.

pub mod api;
pub mod format;
pub mod models;
pub mod observability;
pub mod quantity;
pub mod ranking;
pub mod series;
pub mod severity;
pub mod status;
pub mod suggestions;

pub use api::{ErrorBody, SuggestRequest, SuggestResponse};
pub use models::*;
pub use observability::{AdvisorMetrics, StructuredLogger};
pub use ranking::{
    group_by_resource, present, DisplayOptions, SeverityFilter, SuggestionGroup,
    SuggestionSummary, SuggestionView,
};
pub use quantity::resolve_workloads;
pub use series::LookbackWindow;
pub use severity::Severity;
pub use suggestions::{compute_suggestions, ResourceLabel, Suggestion};
