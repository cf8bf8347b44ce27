//! `kadj suggest`: evaluate a namespace snapshot

use advisor_lib::{
    compute_suggestions, present, LookbackWindow, Severity, SuggestRequest, SuggestResponse,
    Suggestion,
};
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;
use tabled::Tabled;
use tracing::debug;

use super::{load_history, load_workloads};
use crate::client::ApiClient;
use crate::config::Config;
use crate::output::{
    color_severity, print_info, print_json, print_success, print_warning, render_table,
    summary_line, OutputFormat,
};

/// Inputs of one `suggest` invocation
#[derive(Debug, Clone, Default)]
pub struct SuggestArgs {
    pub workloads: PathBuf,
    pub history: Option<PathBuf>,
    pub window: Option<String>,
    pub only: Vec<Severity>,
    pub group: bool,
    pub remote: bool,
    pub show_hidden: bool,
}

/// Row for the suggestions table
#[derive(Tabled)]
struct SuggestionRow {
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "Workload")]
    workload: String,
    #[tabled(rename = "Pod")]
    pod: String,
    #[tabled(rename = "Container")]
    container: String,
    #[tabled(rename = "Resource")]
    resource: String,
    #[tabled(rename = "Issue")]
    message: String,
    #[tabled(rename = "Current")]
    current: String,
    #[tabled(rename = "Suggested")]
    suggested: String,
    #[tabled(rename = "Action")]
    action: String,
}

impl From<&Suggestion> for SuggestionRow {
    fn from(s: &Suggestion) -> Self {
        Self {
            severity: color_severity(s.severity),
            workload: s.workload.clone(),
            pod: s.pod.clone(),
            container: s.container.clone(),
            resource: s.resource.to_string(),
            message: s.message.clone(),
            current: s.current.clone(),
            suggested: s.suggested.clone(),
            action: s.severity.action().to_string(),
        }
    }
}

fn build_request(args: &SuggestArgs, config: &Config) -> Result<SuggestRequest> {
    let workloads = load_workloads(&args.workloads)?;
    let history = args.history.as_deref().map(load_history).transpose()?;

    let mut request = SuggestRequest::new(workloads, history);
    request.window = args.window.clone();
    request.active_severities = args.only.clone();
    request.grouped = args.group;
    if !args.show_hidden {
        request.hidden_severities = config.hidden_severities.iter().copied().collect();
    }
    Ok(request)
}

/// Run the engine in-process
pub fn evaluate_locally(request: &SuggestRequest) -> Result<SuggestResponse> {
    let window: Option<LookbackWindow> = request
        .lookback_window()
        .context("Invalid --window")?;
    let ranked = compute_suggestions(&request.workloads, request.history.as_ref());
    debug!(count = ranked.len(), "Evaluated locally");
    let view = present(ranked, &request.display_options());
    Ok(SuggestResponse::from_view(view, window))
}

/// Evaluate a snapshot and print the suggestions
pub async fn run(
    args: &SuggestArgs,
    config: &Config,
    api_url: &str,
    format: OutputFormat,
) -> Result<()> {
    let request = build_request(args, config)?;

    let response = if args.remote {
        let client = ApiClient::new(api_url)?;
        client.suggest(&request).await?
    } else {
        evaluate_locally(&request)?
    };

    match format {
        OutputFormat::Json => print_json(&response)?,
        OutputFormat::Table => print_table(&response, !request.hidden_severities.is_empty()),
    }

    Ok(())
}

/// Sampling density the history was expected to have
fn window_line(window: LookbackWindow) -> String {
    format!(
        "History window: {} ({}s step, {} samples expected)",
        window,
        window.step_secs(),
        window.expected_samples()
    )
}

fn print_table(response: &SuggestResponse, filtered: bool) {
    if let Some(window) = response.window {
        print_info(&window_line(window));
    }

    if response.suggestions.is_empty() {
        if filtered {
            print_warning(
                "No suggestions to show (some severities are hidden, see `kadj prefs show`)",
            );
        } else {
            print_success("No suggestions: every resource is within its bands");
        }
        return;
    }

    match &response.groups {
        Some(groups) => {
            for group in groups {
                println!(
                    "\n{} ({})",
                    group.resource.to_string().bold(),
                    group.items.len()
                );
                let rows: Vec<SuggestionRow> =
                    group.items.iter().map(SuggestionRow::from).collect();
                println!("{}", render_table(rows));
            }
        }
        None => {
            let rows: Vec<SuggestionRow> =
                response.suggestions.iter().map(SuggestionRow::from).collect();
            println!("{}", render_table(rows));
        }
    }

    println!("\n{}", summary_line(&response.summary));
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORKLOADS: &str = r#"[{
        "name": "api",
        "pods": [{
            "name": "api-0",
            "containers": [{
                "name": "server",
                "requests": {"cpu": {"raw": "500m", "millicores": 500}},
                "limits": {"cpu": {"raw": "1", "millicores": 1000}},
                "usage": {"cpu": {"raw": "950m", "millicores": 950}}
            }]
        }]
    }]"#;

    fn args_for(dir: &tempfile::TempDir) -> SuggestArgs {
        let path = dir.path().join("workloads.json");
        std::fs::write(&path, WORKLOADS).unwrap();
        SuggestArgs {
            workloads: path,
            ..Default::default()
        }
    }

    #[test]
    fn test_local_evaluation() {
        let dir = tempfile::tempdir().unwrap();
        let request = build_request(&args_for(&dir), &Config::default()).unwrap();
        let response = evaluate_locally(&request).unwrap();

        assert_eq!(response.suggestions.len(), 1);
        assert_eq!(response.suggestions[0].severity, Severity::Danger);
        assert_eq!(response.suggestions[0].suggested, "1.33 cores");
    }

    #[test]
    fn test_preferences_hide_severities() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.hidden_severities.insert(Severity::Danger);

        let request = build_request(&args_for(&dir), &config).unwrap();
        assert!(evaluate_locally(&request).unwrap().suggestions.is_empty());

        let mut args = args_for(&dir);
        args.show_hidden = true;
        let request = build_request(&args, &config).unwrap();
        assert_eq!(evaluate_locally(&request).unwrap().suggestions.len(), 1);
    }

    #[test]
    fn test_unknown_window_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = args_for(&dir);
        args.window = Some("2w".to_string());
        let request = build_request(&args, &Config::default()).unwrap();
        assert!(evaluate_locally(&request).is_err());
    }

    #[test]
    fn test_window_line_reports_density() {
        assert_eq!(
            window_line(LookbackWindow::SixHours),
            "History window: 6h (120s step, 180 samples expected)"
        );
    }
}
