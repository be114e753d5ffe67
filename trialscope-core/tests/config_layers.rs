//! Layered configuration loading against real files on disk.

use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;
use tempfile::TempDir;
use trialscope_core::config::{
    self, SourcesConfig, TrialScopeConfig, load_config_with, workspace_config_path,
};
use trialscope_core::error::ConfigError;

fn write(path: &Path, content: &str) {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).unwrap();
    }
    fs::write(path, content).unwrap();
}

#[test]
fn no_files_yields_defaults() {
    let user = TempDir::new().unwrap();
    let ws = TempDir::new().unwrap();
    let config = load_config_with(Some(user.path()), Some(ws.path()), None, None).unwrap();
    assert_eq!(config, TrialScopeConfig::default());
}

#[test]
fn workspace_overrides_user() {
    let user = TempDir::new().unwrap();
    let ws = TempDir::new().unwrap();
    write(
        &user.path().join("config.toml"),
        "[sources]\ntrial_page_size = 20\npublication_limit = 8\n",
    );
    write(
        &workspace_config_path(ws.path()),
        "[sources]\ntrial_page_size = 4\n",
    );

    let config = load_config_with(Some(user.path()), Some(ws.path()), None, None).unwrap();
    assert_eq!(config.sources.trial_page_size, 4);
    assert_eq!(config.sources.publication_limit, 8);
    assert_eq!(config.sources.label_url, SourcesConfig::default().label_url);
}

#[test]
fn extra_file_overrides_workspace() {
    let ws = TempDir::new().unwrap();
    write(
        &workspace_config_path(ws.path()),
        "[synthesis]\nseed = 1\n[sources]\nrequest_timeout_secs = 30\n",
    );
    let extra = ws.path().join("ci.toml");
    write(&extra, "[synthesis]\nseed = 2\n");

    let config = load_config_with(None, Some(ws.path()), Some(&extra), None).unwrap();
    assert_eq!(config.synthesis.seed, Some(2));
    assert_eq!(config.sources.request_timeout_secs, Some(30));
}

#[test]
fn explicit_overrides_win() {
    let ws = TempDir::new().unwrap();
    write(
        &workspace_config_path(ws.path()),
        "[enrichment]\nenabled = true\n",
    );
    let mut overrides = TrialScopeConfig::default();
    overrides.enrichment.enabled = false;

    let config = load_config_with(None, Some(ws.path()), None, Some(&overrides)).unwrap();
    assert!(!config.enrichment.enabled);
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let ws = TempDir::new().unwrap();
    write(
        &workspace_config_path(ws.path()),
        "[sources]\ntrial_page_size = \"many\"\n",
    );
    let err = load_config_with(None, Some(ws.path()), None, None).unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }), "{err:?}");
}

#[test]
fn invalid_values_fail_validation() {
    let ws = TempDir::new().unwrap();
    write(
        &workspace_config_path(ws.path()),
        "[sources]\ntrial_page_size = 0\n",
    );
    let err = load_config_with(None, Some(ws.path()), None, None).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { .. }), "{err:?}");
}

#[test]
fn written_default_config_loads_back() {
    let ws = TempDir::new().unwrap();
    let path = config::write_default_config(ws.path()).unwrap();
    assert_eq!(path, workspace_config_path(ws.path()));
    assert!(config::config_exists(Some(ws.path())));

    let config = load_config_with(None, Some(ws.path()), None, None).unwrap();
    assert_eq!(config, TrialScopeConfig::default());
}
