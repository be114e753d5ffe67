//! Configuration system for TrialScope.
//!
//! Uses `figment` for layered configuration: defaults -> user config file ->
//! workspace config file -> environment variables -> explicit overrides.

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrialScopeConfig {
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub enrichment: EnrichmentConfig,
    #[serde(default)]
    pub synthesis: SynthesisConfig,
}

/// Upstream evidence source endpoints and transport settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourcesConfig {
    /// Trial registry study-fields endpoint.
    pub trial_registry_url: String,
    /// Literature index search endpoint.
    pub literature_url: String,
    /// Drug label lookup endpoint.
    pub label_url: String,
    pub user_agent: String,
    pub connect_timeout_secs: u64,
    /// Whole-request timeout. Unset leaves the transport default in place.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
    /// Upper rank requested from the trial registry.
    pub trial_page_size: usize,
    /// `retmax` requested from the literature index.
    pub publication_limit: usize,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            trial_registry_url: "https://clinicaltrials.gov/api/query/study_fields".to_string(),
            literature_url: "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/esearch.fcgi"
                .to_string(),
            label_url: "https://api.fda.gov/drug/label.json".to_string(),
            user_agent: format!("TrialScope/{}", env!("CARGO_PKG_VERSION")),
            connect_timeout_secs: 10,
            request_timeout_secs: None,
            trial_page_size: 10,
            publication_limit: 5,
        }
    }
}

/// Optional sentiment enrichment of the intent profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentConfig {
    pub enabled: bool,
    pub endpoint: String,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: "https://api-inference.huggingface.co/models/cardiffnlp/twitter-roberta-base-sentiment-latest"
                .to_string(),
        }
    }
}

/// Report synthesis settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SynthesisConfig {
    /// Seed for the synthetic-evidence generator. Unset draws from entropy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl TrialScopeConfig {
    /// Reject values the pipeline cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sources.trial_page_size == 0 {
            return Err(ConfigError::Invalid {
                message: "sources.trial_page_size must be at least 1".into(),
            });
        }
        for (key, url) in [
            ("sources.trial_registry_url", &self.sources.trial_registry_url),
            ("sources.literature_url", &self.sources.literature_url),
            ("sources.label_url", &self.sources.label_url),
        ] {
            if url.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    message: format!("{key} must not be empty"),
                });
            }
        }
        if self.enrichment.enabled && self.enrichment.endpoint.trim().is_empty() {
            return Err(ConfigError::Invalid {
                message: "enrichment.endpoint must be set when enrichment is enabled".into(),
            });
        }
        Ok(())
    }
}

/// `~/.config/trialscope` or the platform equivalent.
pub fn user_config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("dev", "trialscope", "trialscope")
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// `<workspace>/.trialscope/config.toml`.
pub fn workspace_config_path(workspace: &Path) -> PathBuf {
    workspace.join(".trialscope").join("config.toml")
}

/// Load configuration by merging all layers.
///
/// Priority (highest to lowest):
/// 1. Explicit overrides
/// 2. Environment variables (`TRIALSCOPE_SOURCES__LABEL_URL`, ...)
/// 3. Workspace config (`.trialscope/config.toml`)
/// 4. User config (`~/.config/trialscope/config.toml`)
/// 5. Built-in defaults
pub fn load_config(
    workspace: Option<&Path>,
    overrides: Option<&TrialScopeConfig>,
) -> Result<TrialScopeConfig, ConfigError> {
    load_config_with(user_config_dir().as_deref(), workspace, None, overrides)
}

/// Like [`load_config`], with an explicit user config directory and one
/// extra TOML file merged after the workspace layer.
pub fn load_config_with(
    user_dir: Option<&Path>,
    workspace: Option<&Path>,
    extra_file: Option<&Path>,
    overrides: Option<&TrialScopeConfig>,
) -> Result<TrialScopeConfig, ConfigError> {
    let mut figment = Figment::from(Serialized::defaults(TrialScopeConfig::default()));

    if let Some(dir) = user_dir {
        let user_config = dir.join("config.toml");
        if user_config.exists() {
            figment = figment.merge(Toml::file(&user_config));
        }
    }

    if let Some(ws) = workspace {
        let ws_config = workspace_config_path(ws);
        if ws_config.exists() {
            figment = figment.merge(Toml::file(&ws_config));
        }
    }

    if let Some(path) = extra_file {
        if !path.exists() {
            return Err(ConfigError::Invalid {
                message: format!("config file not found: {}", path.display()),
            });
        }
        figment = figment.merge(Toml::file(path));
    }

    figment = figment.merge(Env::prefixed("TRIALSCOPE_").split("__"));

    if let Some(overrides) = overrides {
        figment = figment.merge(Serialized::defaults(overrides));
    }

    let config: TrialScopeConfig = figment.extract().map_err(|e| ConfigError::ParseError {
        message: e.to_string(),
    })?;
    config.validate()?;
    Ok(config)
}

/// Check whether a user-level or workspace-level config file exists.
pub fn config_exists(workspace: Option<&Path>) -> bool {
    if let Some(dir) = user_config_dir()
        && dir.join("config.toml").exists()
    {
        return true;
    }

    workspace.is_some_and(|ws| workspace_config_path(ws).exists())
}

/// Write the default configuration to `<workspace>/.trialscope/config.toml`.
pub fn write_default_config(workspace: &Path) -> Result<PathBuf, ConfigError> {
    let path = workspace_config_path(workspace);
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::WriteFailed {
            message: e.to_string(),
        })?;
    }
    let content =
        toml::to_string_pretty(&TrialScopeConfig::default()).map_err(|e| {
            ConfigError::WriteFailed {
                message: e.to_string(),
            }
        })?;
    std::fs::write(&path, content).map_err(|e| ConfigError::WriteFailed {
        message: e.to_string(),
    })?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TrialScopeConfig::default();
        assert_eq!(config.sources.connect_timeout_secs, 10);
        assert_eq!(config.sources.request_timeout_secs, None);
        assert_eq!(config.sources.trial_page_size, 10);
        assert_eq!(config.sources.publication_limit, 5);
        assert!(config.enrichment.enabled);
        assert_eq!(config.synthesis.seed, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = TrialScopeConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: TrialScopeConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed: TrialScopeConfig = toml::from_str("[synthesis]\nseed = 7\n").unwrap();
        assert_eq!(parsed.synthesis.seed, Some(7));
        assert_eq!(parsed.sources, SourcesConfig::default());
    }

    #[test]
    fn test_validate_rejects_zero_page_size() {
        let mut config = TrialScopeConfig::default();
        config.sources.trial_page_size = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn test_validate_allows_empty_endpoint_when_disabled() {
        let mut config = TrialScopeConfig::default();
        config.enrichment.endpoint.clear();
        assert!(config.validate().is_err());
        config.enrichment.enabled = false;
        assert!(config.validate().is_ok());
    }
}
