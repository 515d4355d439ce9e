//! Config command implementation.

use crate::cli::{ConfigAction, Output};
use crate::config::Settings;
use anyhow::Result;
use std::path::PathBuf;

/// The file `--config` names, or the default location.
pub fn resolve_config_path(config: Option<&str>) -> PathBuf {
    config
        .map(Settings::expand_path)
        .unwrap_or_else(Settings::default_config_path)
}

/// Run the config command.
pub fn run_config(action: &ConfigAction, settings: Settings, config: Option<&str>) -> Result<()> {
    let config_path = resolve_config_path(config);

    match action {
        ConfigAction::Show => {
            let toml_str = toml::to_string_pretty(&settings)
                .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;
            println!("{}", toml_str);
        }

        ConfigAction::Init => {
            if config_path.exists() {
                Output::warning(&format!("Config already exists at {}", config_path.display()));
            } else {
                settings.save_to(&config_path)?;
                Output::success(&format!("Created config at {}", config_path.display()));
            }
        }

        ConfigAction::Path => {
            println!("{}", config_path.display());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_config_path() {
        assert_eq!(resolve_config_path(Some("/tmp/f.toml")), PathBuf::from("/tmp/f.toml"));
        assert_eq!(resolve_config_path(None), Settings::default_config_path());
    }

    #[test]
    fn test_init_writes_to_given_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        let path_str = path.to_str().unwrap();

        let mut settings = Settings::default();
        settings.completion.model = "gpt-4o".to_string();
        run_config(&ConfigAction::Init, settings, Some(path_str)).unwrap();

        let loaded = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.completion.model, "gpt-4o");

        // A second init leaves the existing file alone.
        run_config(&ConfigAction::Init, Settings::default(), Some(path_str)).unwrap();
        let reloaded = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(reloaded.completion.model, "gpt-4o");
    }
}
