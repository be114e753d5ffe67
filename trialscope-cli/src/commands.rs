//! Subcommand handlers.

use std::path::Path;

use trialscope_core::config::{self, TrialScopeConfig};

use crate::{Commands, ConfigAction};

/// Load configuration for `workspace`, merging `extra` when given.
pub(crate) fn load(workspace: &Path, extra: Option<&Path>) -> anyhow::Result<TrialScopeConfig> {
    config::load_config_with(
        config::user_config_dir().as_deref(),
        Some(workspace),
        extra,
        None,
    )
    .map_err(|e| anyhow::anyhow!("Configuration error: {}", e))
}

pub(crate) async fn handle_command(
    command: Commands,
    workspace: &Path,
    extra: Option<&Path>,
) -> anyhow::Result<()> {
    match command {
        Commands::Config { action } => handle_config(action, workspace, extra).await,
    }
}

async fn handle_config(
    action: ConfigAction,
    workspace: &Path,
    extra: Option<&Path>,
) -> anyhow::Result<()> {
    match action {
        ConfigAction::Init => {
            let config_path = config::workspace_config_path(workspace);
            if config_path.exists() {
                println!(
                    "Configuration file already exists at: {}",
                    config_path.display()
                );
                return Ok(());
            }

            let path = config::write_default_config(workspace)?;
            println!("Created default configuration at: {}", path.display());
            Ok(())
        }
        ConfigAction::Show => {
            let config = load(workspace, extra)?;
            let toml_str = toml::to_string_pretty(&config)?;
            println!("{}", toml_str);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_config_init_creates_file() {
        let dir = TempDir::new().unwrap();
        let workspace = dir.path();

        let command = Commands::Config {
            action: ConfigAction::Init,
        };
        handle_command(command, workspace, None).await.unwrap();

        let config_path = workspace.join(".trialscope").join("config.toml");
        assert!(config_path.exists());

        let content = std::fs::read_to_string(&config_path).unwrap();
        let parsed: TrialScopeConfig = toml::from_str(&content).unwrap();
        assert_eq!(parsed, TrialScopeConfig::default());
    }

    #[tokio::test]
    async fn test_config_init_idempotent() {
        let dir = TempDir::new().unwrap();
        let workspace = dir.path();

        let command = Commands::Config {
            action: ConfigAction::Init,
        };
        handle_command(command, workspace, None).await.unwrap();

        let config_path = workspace.join(".trialscope").join("config.toml");
        std::fs::write(&config_path, "[synthesis]\nseed = 99\n").unwrap();

        let command = Commands::Config {
            action: ConfigAction::Init,
        };
        handle_command(command, workspace, None).await.unwrap();

        let content = std::fs::read_to_string(&config_path).unwrap();
        assert_eq!(content, "[synthesis]\nseed = 99\n");
    }

    #[test]
    fn test_load_merges_extra_file() {
        let dir = TempDir::new().unwrap();
        let extra = dir.path().join("extra.toml");
        std::fs::write(&extra, "[sources]\ntrial_page_size = 3\n").unwrap();

        let config = load(dir.path(), Some(&extra)).unwrap();
        assert_eq!(config.sources.trial_page_size, 3);
    }

    #[test]
    fn test_load_rejects_missing_extra_file() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(load(dir.path(), Some(&missing)).is_err());
    }
}
