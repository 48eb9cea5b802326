use crate::{client::ClientConfig, errors::KarakeepError, Settings};
use anyhow::{anyhow, Context};
use log::{debug, trace};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

const CONFIG_DIR: &str = "karakeep";
const SETTINGS_FILE: &str = "settings.json";
const SNAPSHOT_FILE: &str = "snapshot.json";
const FAILED_MATCHES_FILE: &str = "failed-matches.json";

/// The environment variable overriding the configuration directory.
const HOME_ENV: &str = "KARAKEEP_HOME";
/// The environment variable holding the API key.
const API_KEY_ENV: &str = "KARAKEEP_API_KEY";
/// The environment variable overriding the configured base url.
const BASE_URL_ENV: &str = "KARAKEEP_BASE_URL";

/// The resolved configuration of a CLI run.
#[derive(Debug, PartialEq, Default)]
pub struct Config {
    /// The path of the settings file.
    pub settings_path: PathBuf,
    /// The path of the local bookmark snapshot.
    pub snapshot_path: PathBuf,
    /// The path of the file collecting articles without a matching bookmark.
    pub failed_matches_path: PathBuf,
    /// The configured settings.
    pub settings: Settings,
}

impl Config {
    fn new(
        settings_path: &Path,
        snapshot_path: &Path,
        failed_matches_path: &Path,
        settings: Settings,
    ) -> Self {
        Self {
            settings_path: settings_path.to_owned(),
            snapshot_path: snapshot_path.to_owned(),
            failed_matches_path: failed_matches_path.to_owned(),
            settings,
        }
    }

    pub fn init() -> Result<Config, anyhow::Error> {
        let config_path = if let Ok(karakeep_home) = env::var(HOME_ENV) {
            PathBuf::from(karakeep_home)
        } else if let Some(config_path) = dirs::config_dir() {
            config_path.join(CONFIG_DIR)
        } else {
            return Err(anyhow!("HOME environment variable not set"));
        };
        let settings_path = config_path.join(SETTINGS_FILE);
        let snapshot_path = config_path.join(SNAPSHOT_FILE);
        let failed_matches_path = config_path.join(FAILED_MATCHES_FILE);

        if !config_path.exists() {
            debug!("Create config at {}", config_path.display());
            fs::create_dir_all(&config_path).context(format!(
                "Can't create config directory: {}",
                config_path.display()
            ))?;
        }

        let settings = Settings::init(&settings_path)?;

        let config = Config::new(&settings_path, &snapshot_path, &failed_matches_path, settings);

        trace!("Config: {:#?}", config);

        Ok(config)
    }

    /// The API key, taken from the environment.
    pub fn api_key(&self) -> Result<String, KarakeepError> {
        env::var(API_KEY_ENV).map_err(|_| KarakeepError::MissingApiKey)
    }

    /// The instance base url, taken from the environment or the settings.
    pub fn base_url(&self) -> Result<String, KarakeepError> {
        if let Ok(base_url) = env::var(BASE_URL_ENV) {
            return Ok(base_url);
        }

        self.settings
            .base_url
            .clone()
            .ok_or(KarakeepError::MissingBaseUrl)
    }

    /// Assemble the client configuration from settings and environment.
    pub fn client_config(&self) -> Result<ClientConfig, KarakeepError> {
        let mut client_config = ClientConfig::new(self.base_url()?, self.api_key()?);
        client_config.request_timeout = self.settings.request_timeout;
        client_config.request_throttling = self.settings.request_throttling;
        client_config.max_retries = self.settings.max_retries;
        Ok(client_config)
    }
}
