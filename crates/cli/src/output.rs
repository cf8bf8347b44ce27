//! Output formatting utilities

use advisor_lib::status::ResourceStatus;
use advisor_lib::{Severity, SuggestionSummary};
use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Render rows as a rounded table
pub fn render_table<T: Tabled>(rows: Vec<T>) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Color a severity name
pub fn color_severity(severity: Severity) -> String {
    let name = severity.as_str();
    match severity {
        Severity::Danger => name.red().bold().to_string(),
        Severity::Warning => name.yellow().to_string(),
        Severity::Overkill => name.blue().to_string(),
    }
}

/// Color a status badge
pub fn color_status(status: ResourceStatus) -> String {
    let name = status.as_str();
    match status {
        ResourceStatus::Danger => name.red().bold().to_string(),
        ResourceStatus::Warning => name.yellow().to_string(),
        ResourceStatus::Overkill => name.blue().to_string(),
        ResourceStatus::Healthy => name.green().to_string(),
        ResourceStatus::None => name.dimmed().to_string(),
    }
}

/// One-line count summary, e.g. `3 suggestions: 1 danger, 0 warning, 2 overkill`
pub fn summary_line(summary: &SuggestionSummary) -> String {
    let noun = if summary.total == 1 {
        "suggestion"
    } else {
        "suggestions"
    };
    let counts: Vec<String> = Severity::ALL
        .iter()
        .map(|s| format!("{} {}", summary.count(*s), s))
        .collect();
    format!("{} {}: {}", summary.total, noun, counts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_line() {
        let summary = SuggestionSummary {
            danger: 1,
            warning: 0,
            overkill: 2,
            total: 3,
        };
        assert_eq!(
            summary_line(&summary),
            "3 suggestions: 1 danger, 0 warning, 2 overkill"
        );

        let single = SuggestionSummary {
            danger: 0,
            warning: 1,
            overkill: 0,
            total: 1,
        };
        assert!(summary_line(&single).starts_with("1 suggestion:"));
    }

    #[test]
    fn test_colored_names_keep_text() {
        assert!(color_severity(Severity::Overkill).contains("overkill"));
        assert!(color_status(ResourceStatus::Healthy).contains("healthy"));
    }
}
