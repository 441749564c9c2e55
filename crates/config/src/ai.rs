// Resolved text-generation configuration
//
// Settings, environment and CLI flags all feed into `ResolvedAIConfig`; the
// CLI builds its generator from this and nothing else.

use std::time::Duration;

use serde::Serialize;

use crate::settings::{AIProvider, AISettings};

/// Status of the AI configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AIConfigStatus {
    /// provider = none
    Disabled,
    Ready,
    /// Enabled, but a setting is unusable (see `blocking_reason`)
    Misconfigured,
}

impl AIConfigStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disabled => "disabled",
            Self::Ready => "ready",
            Self::Misconfigured => "misconfigured",
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

/// The effective AI configuration, fully resolved from all sources.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAIConfig {
    pub provider: AIProvider,
    pub model: String,
    /// Ollama base URL, without trailing slash
    pub endpoint: Option<String>,
    pub temperature: Option<f32>,
    pub timeout: Duration,
    pub status: AIConfigStatus,
    /// Human-readable reason if not ready
    pub blocking_reason: Option<String>,
}

impl ResolvedAIConfig {
    pub fn from_settings(settings: &AISettings) -> Self {
        let provider = settings.provider;

        if !provider.is_enabled() {
            return Self {
                provider,
                model: String::new(),
                endpoint: None,
                temperature: None,
                timeout: settings.timeout(),
                status: AIConfigStatus::Disabled,
                blocking_reason: Some("ai.provider is \"none\"".to_string()),
            };
        }

        let model = settings.effective_model().to_string();
        let endpoint = settings.effective_endpoint().trim_end_matches('/').to_string();

        let problem = if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            Some(format!("ai.endpoint must be an http(s) URL, got \"{}\"", endpoint))
        } else if model.trim().is_empty() {
            Some("ai.model is empty".to_string())
        } else if settings.timeout_secs == 0 {
            Some("ai.timeout_secs must be greater than 0".to_string())
        } else {
            match settings.temperature {
                Some(t) if !(0.0..=2.0).contains(&t) => {
                    Some(format!("ai.temperature must be between 0 and 2, got {}", t))
                }
                _ => None,
            }
        };

        let status = if problem.is_some() {
            AIConfigStatus::Misconfigured
        } else {
            AIConfigStatus::Ready
        };

        Self {
            provider,
            model,
            endpoint: Some(endpoint),
            temperature: settings.temperature,
            timeout: settings.timeout(),
            status,
            blocking_reason: problem,
        }
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }
}

/// Result of a live connectivity check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid(String),
    Invalid(String),
    /// Not attempted (AI disabled or misconfigured)
    Skipped(String),
}

impl ValidationResult {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Valid(msg) => msg,
            Self::Invalid(msg) => msg,
            Self::Skipped(msg) => msg,
        }
    }
}

/// Diagnostic information about AI configuration (for `salesq ai doctor`)
#[derive(Debug, Clone, Serialize)]
pub struct AIDiagnostics {
    pub provider: String,
    pub model: String,
    pub status: AIConfigStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    pub timeout_secs: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocking_reason: Option<String>,
}

impl AIDiagnostics {
    pub fn from_resolved(config: &ResolvedAIConfig) -> Self {
        Self {
            provider: config.provider_name().to_string(),
            model: config.model.clone(),
            status: config.status,
            endpoint: config.endpoint.clone(),
            temperature: config.temperature,
            timeout_secs: config.timeout.as_secs(),
            blocking_reason: config.blocking_reason.clone(),
        }
    }

    pub fn from_settings(settings: &AISettings) -> Self {
        Self::from_resolved(&ResolvedAIConfig::from_settings(settings))
    }
}

impl std::fmt::Display for AIDiagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "AI Configuration")?;
        writeln!(f, "──────────────────────────────")?;
        writeln!(f, "Provider:          {}", self.provider)?;
        writeln!(f, "Status:            {}", self.status.as_str())?;
        if !self.model.is_empty() {
            writeln!(f, "Model:             {}", self.model)?;
        }
        if let Some(endpoint) = &self.endpoint {
            writeln!(f, "Endpoint:          {}", endpoint)?;
        }
        match self.temperature {
            Some(t) => writeln!(f, "Temperature:       {}", t)?,
            None => writeln!(f, "Temperature:       model default")?,
        }
        writeln!(f, "Timeout:           {}s", self.timeout_secs)?;
        if let Some(reason) = &self.blocking_reason {
            writeln!(f, "Reason:            {}", reason)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local() -> AISettings {
        AISettings::default()
    }

    #[test]
    fn test_default_is_ready() {
        let config = ResolvedAIConfig::from_settings(&local());
        assert_eq!(config.status, AIConfigStatus::Ready);
        assert_eq!(config.model, "llama3.1:8b");
        assert_eq!(config.endpoint.as_deref(), Some("http://localhost:11434"));
        assert!(config.blocking_reason.is_none());
    }

    #[test]
    fn test_disabled() {
        let settings = AISettings {
            provider: AIProvider::None,
            ..local()
        };
        let config = ResolvedAIConfig::from_settings(&settings);
        assert_eq!(config.status, AIConfigStatus::Disabled);
        assert!(config.endpoint.is_none());
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let settings = AISettings {
            endpoint: Some("http://gpu-box:11434/".into()),
            ..local()
        };
        let config = ResolvedAIConfig::from_settings(&settings);
        assert_eq!(config.endpoint.as_deref(), Some("http://gpu-box:11434"));
    }

    #[test]
    fn test_misconfigured() {
        let bad_endpoint = AISettings {
            endpoint: Some("localhost:11434".into()),
            ..local()
        };
        let zero_timeout = AISettings {
            timeout_secs: 0,
            ..local()
        };
        let hot = AISettings {
            temperature: Some(3.5),
            ..local()
        };

        for settings in [bad_endpoint, zero_timeout, hot] {
            let config = ResolvedAIConfig::from_settings(&settings);
            assert_eq!(config.status, AIConfigStatus::Misconfigured, "{settings:?}");
            assert!(config.blocking_reason.is_some());
        }
    }

    #[test]
    fn test_diagnostics_display() {
        let diag = AIDiagnostics::from_settings(&local());
        let text = diag.to_string();
        assert!(text.contains("Provider:          local"));
        assert!(text.contains("Status:            ready"));
        assert!(text.contains("Temperature:       model default"));
    }

    #[test]
    fn test_diagnostics_json() {
        let settings = AISettings {
            provider: AIProvider::None,
            ..local()
        };
        let json = serde_json::to_value(AIDiagnostics::from_settings(&settings)).unwrap();
        assert_eq!(json["status"], "disabled");
        assert_eq!(json["provider"], "none");
        assert!(json.get("endpoint").is_none());
    }
}
