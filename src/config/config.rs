use home_dir::HomeDirExt;
use std::{io::Write, path::PathBuf};

use anyhow::{anyhow, Result};
use tracing::debug;

use crate::{errors::GrabError, types::Quality};

use super::app_config::{AppConfig, DEFAULT_USER_AGENT};

pub struct Config {
    config_file: PathBuf,
    app_config: AppConfig,
}

impl Config {
    pub fn new_from_file(config_path: Option<String>) -> Result<Config> {
        if let Some(config_path) = config_path {
            let config_path = PathBuf::from(config_path);

            Config::new(expand(&config_path)?)
        } else {
            Config::new_default()
        }
    }

    pub fn new_default() -> Result<Config> {
        let config_directory_root =
            std::env::var("XDG_CONFIG_HOME").unwrap_or("~/.config".to_string());

        let config_directory = expand(&PathBuf::from(config_directory_root))?.join("tt-grab");
        let config_file = config_directory.join("config.toml");

        Config::new(config_file)
    }

    fn new(config_file: PathBuf) -> Result<Config> {
        if let Some(parent) = config_file.parent() {
            ensure_dir(&parent.to_path_buf())?;
        }

        let app_config: AppConfig = {
            let file_content = ensure_file(
                &config_file,
                toml::to_string_pretty(&AppConfig::new_default())?,
            )?;

            toml::from_str(&file_content).map_err(|e| {
                anyhow!(
                    "Cannot parse config file \"{}\": {}",
                    config_file.display(),
                    e
                )
            })?
        };

        debug!(path = %config_file.display(), "loaded config");

        let config = Config {
            config_file,
            app_config,
        };

        config.validate().and(Ok(config))
    }

    pub fn get_output_dir(&self) -> Result<PathBuf> {
        Ok(expand(&PathBuf::from(&self.app_config.output_dir))?)
    }

    pub fn get_extractor(&self) -> &str {
        &self.app_config.extractor
    }

    pub fn get_quality(&self) -> Quality {
        self.app_config.quality
    }

    pub fn history_enabled(&self) -> bool {
        self.app_config.history
    }

    pub fn open_folder(&self) -> bool {
        self.app_config.open_folder
    }

    pub fn stealth(&self) -> bool {
        self.app_config.stealth
    }

    /// `None` when the user agent header is switched off with an empty string.
    pub fn get_user_agent(&self) -> Option<String> {
        match &self.app_config.user_agent {
            Some(agent) if agent.trim().is_empty() => None,
            Some(agent) => Some(agent.clone()),
            None => Some(DEFAULT_USER_AGENT.to_string()),
        }
    }

    pub fn get_history_path(&self) -> Result<PathBuf> {
        let data_dir = self.get_data_dir()?;
        ensure_dir(&data_dir)?;

        Ok(data_dir.join("history.sqlite"))
    }

    pub fn get_data_dir(&self) -> Result<PathBuf> {
        if let Some(data_dir) = &self.app_config.data_dir {
            return Ok(expand(&PathBuf::from(data_dir))?);
        }

        let data_directory_root =
            std::env::var("XDG_DATA_HOME").unwrap_or("~/.local/share".to_string());

        Ok(expand(&PathBuf::from(data_directory_root))?.join("tt-grab"))
    }

    pub fn validate(&self) -> Result<()> {
        if self.app_config.output_dir.trim().is_empty() {
            return Err(anyhow!(
                "Given output_dir is empty (config file path: \"{}\")",
                self.config_file.display()
            ));
        }

        if self.app_config.extractor.trim().is_empty() {
            return Err(anyhow!(
                "Given extractor is empty (config file path: \"{}\")",
                self.config_file.display()
            ));
        }

        Ok(())
    }
}

fn expand(path: &PathBuf) -> Result<PathBuf, GrabError> {
    path.expand_home()
        .map_err(|_| GrabError::HomeDir(path.display().to_string()))
}

fn ensure_dir(dir: &PathBuf) -> Result<()> {
    std::fs::create_dir_all(dir)?;

    Ok(())
}

fn ensure_file(file_path: &PathBuf, default: String) -> Result<String> {
    if !file_path.exists() {
        let mut file = std::fs::File::create(file_path)?;
        file.write_all(default.as_bytes())?;
        Ok(default)
    } else {
        Ok(std::fs::read_to_string(file_path)?)
    }
}
