//! `kadj prefs`: persisted display preferences

use advisor_lib::Severity;
use anyhow::Result;
use serde_json::json;
use std::path::Path;

use crate::config::Config;
use crate::output::{print_info, print_json, print_success, print_warning, OutputFormat};

/// Print the current preferences
pub fn show(path: &Path, format: OutputFormat) -> Result<()> {
    let config = Config::load(path)?;

    match format {
        OutputFormat::Json => print_json(&json!({
            "path": path.display().to_string(),
            "hiddenSeverities": config.hidden_severities,
            "apiUrl": config.api_url,
        }))?,
        OutputFormat::Table => {
            print_info(&format!("Config file: {}", path.display()));
            if config.hidden_severities.is_empty() {
                println!("Hidden severities: none");
            } else {
                let hidden: Vec<&str> =
                    config.hidden_severities.iter().map(|s| s.as_str()).collect();
                println!("Hidden severities: {}", hidden.join(", "));
            }
            if let Some(url) = &config.api_url {
                println!("Advisor URL: {}", url);
            }
        }
    }
    Ok(())
}

/// Hide a severity from `kadj suggest`
pub fn hide(path: &Path, severity: Severity) -> Result<()> {
    let mut config = Config::load(path)?;
    if config.hidden_severities.insert(severity) {
        config.save(path)?;
        print_success(&format!("Hiding {} suggestions", severity));
    } else {
        print_warning(&format!("{} suggestions are already hidden", severity));
    }
    Ok(())
}

/// Show a previously hidden severity again
pub fn unhide(path: &Path, severity: Severity) -> Result<()> {
    let mut config = Config::load(path)?;
    if config.hidden_severities.remove(&severity) {
        config.save(path)?;
        print_success(&format!("Showing {} suggestions", severity));
    } else {
        print_warning(&format!("{} suggestions are not hidden", severity));
    }
    Ok(())
}

/// Clear hidden severities
pub fn reset(path: &Path) -> Result<()> {
    let mut config = Config::load(path)?;
    config.hidden_severities.clear();
    config.save(path)?;
    print_success("Preferences reset");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hide_unhide_reset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        hide(&path, Severity::Overkill).unwrap();
        hide(&path, Severity::Warning).unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.hidden_severities.len(), 2);

        unhide(&path, Severity::Warning).unwrap();
        let config = Config::load(&path).unwrap();
        assert!(config.hidden_severities.contains(&Severity::Overkill));
        assert!(!config.hidden_severities.contains(&Severity::Warning));

        reset(&path).unwrap();
        assert!(Config::load(&path).unwrap().hidden_severities.is_empty());
    }

    #[test]
    fn test_reset_keeps_api_url() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config = Config {
            api_url: Some("http://advisor:8080".to_string()),
            hidden_severities: [Severity::Danger].into_iter().collect(),
        };
        config.save(&path).unwrap();

        reset(&path).unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.api_url.as_deref(), Some("http://advisor:8080"));
        assert!(config.hidden_severities.is_empty());
    }
}
