use std::{env, fs, path::PathBuf};

use config::{Config, File};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::cli::Args;

#[derive(Debug, Default, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Settings {
    pub api_url: Option<String>,
    pub socket_url: Option<String>,
    pub identity_url: Option<String>,
    pub id_token: Option<String>,
    pub user_id: Option<String>,
    pub user_name: Option<String>,
}

const CONFIG_FILE_NAME: &str = "teambox";

// Function to get the XDG_CONFIG_HOME path
fn get_xdg_config_path() -> Option<PathBuf> {
    // First check XDG_CONFIG_HOME environment variable
    if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(xdg_config));
    }

    // If XDG_CONFIG_HOME is not set, fall back to $HOME/.config
    if let Ok(home) = env::var("HOME") {
        return Some(PathBuf::from(home).join(".config"));
    }

    None
}

pub fn load_settings() -> anyhow::Result<Settings> {
    let config_builder = Config::builder();

    let mut settings = Settings::default();

    if let Some(xdg_config) = get_xdg_config_path() {
        let config_path = xdg_config.join(CONFIG_FILE_NAME).join("config.toml");
        if config_path.exists() {
            settings = config_builder
                .add_source(File::from(config_path.clone()).required(false))
                .build()?
                .try_deserialize()
                .map_err(|e| {
                    anyhow::anyhow!(
                        "Failed to deserialize config file {}: {}",
                        config_path.display(),
                        e
                    )
                })?
        }
    }

    Ok(settings)
}

pub fn write_settings(settings: &Settings) -> anyhow::Result<()> {
    let Some(xdg_config) = get_xdg_config_path() else {
        anyhow::bail!("cannot determine a config directory");
    };

    let config_dir = xdg_config.join(CONFIG_FILE_NAME);
    fs::create_dir_all(&config_dir)?;

    let config_path = config_dir.join("config.toml");
    fs::write(&config_path, toml::to_string_pretty(settings)?)?;
    debug!("wrote settings to {}", config_path.display());

    Ok(())
}

pub fn merge_settings_with_args(args: &Args) -> anyhow::Result<Args> {
    let settings = load_settings()?;

    let mut new_args = args.clone();

    // Apply config values to args if they're not already set by CLI
    macro_rules! apply_if_empty {
        ($args:expr, $field:ident, $config:expr) => {
            if let Some(value) = $config.$field {
                if $args.$field.is_empty() {
                    $args.$field = value.clone();
                }
            }
        };
    }

    apply_if_empty!(new_args, api_url, settings);
    apply_if_empty!(new_args, socket_url, settings);
    apply_if_empty!(new_args, identity_url, settings);

    debug!("merged config: {:?}", new_args);

    Ok(new_args)
}
