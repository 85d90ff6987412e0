use crate::charts::ChartSettings;
use crate::error::{ReportError, Result, ResultExt as _};
use crate::report::ReportFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Summarization settings. The API key is deliberately absent: it is read
/// from the command line or `OPENAI_API_KEY` and never written to disk.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AIConfig {
    pub enabled: bool,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Upper bound on the single summarization attempt.
    pub timeout_secs: u64,
    /// OpenAI-compatible endpoint; the public API when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
}

impl Default for AIConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            model: "gpt-4".to_owned(),
            temperature: 0.3,
            max_tokens: 500,
            timeout_secs: 60,
            api_base: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ReportSettings {
    /// Directory the exhibit images are written to.
    pub output_dir: PathBuf,
    pub format: ReportFormat,
    pub charts: ChartSettings,
    pub ai: AIConfig,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("plots"),
            format: ReportFormat::default(),
            charts: ChartSettings::default(),
            ai: AIConfig::default(),
        }
    }
}

/// Reads settings from a JSON file. A missing file yields the defaults,
/// a file that exists but does not parse is an error.
pub fn load_settings(path: &Path) -> Result<ReportSettings> {
    if !path.exists() {
        return Ok(ReportSettings::default());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings from {}", path.display()))?;
    serde_json::from_str(&content).map_err(|e| {
        ReportError::Config(format!("Invalid settings file {}: {e}", path.display()))
    })
}

pub fn save_settings(path: &Path, settings: &ReportSettings) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(settings)?;
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn test_defaults() {
        let settings = ReportSettings::default();
        assert_eq!(settings.output_dir, PathBuf::from("plots"));
        assert_eq!(settings.format, ReportFormat::Pdf);
        assert_eq!(settings.charts.density_row_limit, 50_000);
        assert_eq!(settings.charts.large_dataset_bins, 50);
        assert_eq!(settings.ai.model, "gpt-4");
        assert_eq!(settings.ai.max_tokens, 500);
    }

    #[test]
    fn test_missing_file_gives_defaults() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let settings = load_settings(&dir.path().join("absent.json"))?;
        assert_eq!(settings, ReportSettings::default());
        Ok(())
    }

    #[test]
    fn test_save_then_load() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("nested").join("settings.json");
        let mut settings = ReportSettings::default();
        settings.format = ReportFormat::Docx;
        settings.ai.enabled = false;
        settings.charts.density_row_limit = 10;

        save_settings(&path, &settings)?;
        assert_eq!(load_settings(&path)?, settings);
        Ok(())
    }

    #[test]
    fn test_partial_file_fills_defaults() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"format":"docx","ai":{"model":"gpt-4o-mini"}}"#)?;

        let settings = load_settings(&path)?;
        assert_eq!(settings.format, ReportFormat::Docx);
        assert_eq!(settings.ai.model, "gpt-4o-mini");
        assert_eq!(settings.ai.max_tokens, 500);
        assert_eq!(settings.output_dir, PathBuf::from("plots"));
        Ok(())
    }

    #[test]
    fn test_malformed_file_is_config_error() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json")?;
        assert!(matches!(load_settings(&path), Err(ReportError::Config(_))));
        Ok(())
    }
}
