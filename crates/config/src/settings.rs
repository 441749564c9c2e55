// Application settings
// Loaded from ~/.config/salesq/settings.json

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

/// Overrides the settings file location.
pub const CONFIG_ENV: &str = "SALESQ_CONFIG";
/// Overrides `report.path`.
pub const REPORT_ENV: &str = "SALESQ_REPORT";
/// Overrides `ai.endpoint`.
pub const AI_ENDPOINT_ENV: &str = "SALESQ_AI_ENDPOINT";
/// Overrides `ai.model`.
pub const AI_MODEL_ENV: &str = "SALESQ_AI_MODEL";

const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Text-generation backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AIProvider {
    /// General questions are rejected
    None,
    /// Local model via Ollama
    #[default]
    Local,
}

impl AIProvider {
    pub fn is_enabled(&self) -> bool {
        !matches!(self, AIProvider::None)
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            AIProvider::None => "",
            AIProvider::Local => "llama3.1:8b",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AIProvider::None => "none",
            AIProvider::Local => "local",
        }
    }
}

/// Settings for the general-question responder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AISettings {
    pub provider: AIProvider,

    /// Model identifier. Empty = provider default
    pub model: String,

    /// Ollama base URL
    pub endpoint: Option<String>,

    /// Sampling temperature. None = model default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Request timeout for one generation
    pub timeout_secs: u64,
}

impl Default for AISettings {
    fn default() -> Self {
        Self {
            provider: AIProvider::Local,
            model: String::new(),
            endpoint: None,
            temperature: None,
            timeout_secs: 120,
        }
    }
}

impl AISettings {
    /// Get the effective model (user-specified or provider default)
    pub fn effective_model(&self) -> &str {
        if self.model.is_empty() {
            self.provider.default_model()
        } else {
            &self.model
        }
    }

    /// Get the effective Ollama endpoint
    pub fn effective_endpoint(&self) -> &str {
        self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Report
    #[serde(rename = "report.path")]
    pub report_path: PathBuf,

    #[serde(rename = "report.sheet")]
    pub report_sheet: String,

    #[serde(rename = "report.productColumn")]
    pub product_column: String,

    #[serde(rename = "report.strictHeaders")]
    pub strict_headers: bool,

    // Plot
    #[serde(rename = "plot.outputDir")]
    pub plot_output_dir: PathBuf,

    // AI
    #[serde(rename = "ai", default)]
    pub ai: AISettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            report_path: PathBuf::from("Sales Report.xlsx"),
            report_sheet: "Sheet1".to_string(),
            product_column: "Product Name".to_string(),
            strict_headers: false,
            plot_output_dir: PathBuf::from("plots"),
            ai: AISettings::default(),
        }
    }
}

impl Settings {
    /// Get the settings file path ($SALESQ_CONFIG wins over the platform config dir)
    pub fn config_path() -> PathBuf {
        if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
            return PathBuf::from(path);
        }
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("salesq")
            .join("settings.json")
    }

    /// Load settings from `path` and apply SALESQ_* environment overrides
    pub fn load_at(path: &Path) -> Self {
        let mut settings = Self::load_from(path);
        settings.apply_overrides(|key| std::env::var(key).ok());
        settings
    }

    /// Load settings from a specific file, falling back to defaults.
    ///
    /// A missing file is created with the commented defaults.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            let settings = Self::default();
            settings.create_default_file(path);
            return settings;
        }

        match fs::read_to_string(path) {
            Ok(contents) => match Self::parse(&contents) {
                Ok(settings) => settings,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "error parsing settings, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "error reading settings, using defaults");
                Self::default()
            }
        }
    }

    /// Parse settings JSON, ignoring `//` comment lines
    pub fn parse(contents: &str) -> Result<Self, serde_json::Error> {
        let cleaned: String = contents
            .lines()
            .filter(|line| !line.trim().starts_with("//"))
            .collect::<Vec<_>>()
            .join("\n");

        serde_json::from_str(&cleaned)
    }

    /// Apply SALESQ_* overrides. Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(report) = get(REPORT_ENV) {
            self.report_path = PathBuf::from(report);
        }
        if let Some(endpoint) = get(AI_ENDPOINT_ENV) {
            self.ai.endpoint = Some(endpoint);
        }
        if let Some(model) = get(AI_MODEL_ENV) {
            self.ai.model = model;
        }
    }

    /// Create default settings file with comments
    fn create_default_file(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                warn!(error = %e, "error creating config directory");
                return;
            }
        }

        let default_config = r#"{
    // Sales report (xlsx, xls, ods, csv or tsv)
    "report.path": "Sales Report.xlsx",
    "report.sheet": "Sheet1",
    "report.productColumn": "Product Name",

    // Fail instead of warn when a date-like header cannot be read
    "report.strictHeaders": false,

    // Where `salesq plot` writes its charts
    "plot.outputDir": "plots",

    // General questions are answered by a local Ollama model
    // Provider options: "none", "local"
    "ai": {
        "provider": "local",
        "model": "",
        "endpoint": "http://localhost:11434",
        "timeout_secs": 120
    }
}
"#;

        if let Err(e) = fs::write(path, default_config) {
            warn!(path = %path.display(), error = %e, "error writing default settings");
        }
    }
}
