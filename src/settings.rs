use crate::json;
use anyhow::Context;
use log::debug;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{Read, Write},
    path::Path,
};

/// The default for `Settings::request_timeout`.
const REQUEST_TIMEOUT_DEFAULT: u64 = 60_000;

/// The default for `Settings::request_throttling`.
const REQUEST_THROTTLING_DEFAULT: u64 = 1_000;

/// The default for `Settings::max_retries`.
const MAX_RETRIES_DEFAULT: u32 = 3;

/// The default for `Settings::page_size`.
const PAGE_SIZE_DEFAULT: u32 = 100;

/// The settings stored in the `settings.json` file.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Settings {
    /// The base url of the Karakeep instance.
    pub base_url: Option<String>,
    /// The request timeout in milliseconds.
    pub request_timeout: u64,
    /// The throttling between requests in milliseconds.
    pub request_throttling: u64,
    /// The maximum number of retries for failed requests.
    pub max_retries: u32,
    /// The page size used when fetching bookmarks and highlights.
    pub page_size: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: None,
            request_timeout: REQUEST_TIMEOUT_DEFAULT,
            request_throttling: REQUEST_THROTTLING_DEFAULT,
            max_retries: MAX_RETRIES_DEFAULT,
            page_size: PAGE_SIZE_DEFAULT,
        }
    }
}

impl Settings {
    pub fn init(settings_path: &Path) -> Result<Settings, anyhow::Error> {
        if settings_path.exists() {
            debug!("Reading settings file at {}", settings_path.display());
            let mut buf = Vec::new();
            let mut settings_file = File::open(settings_path)?;
            settings_file
                .read_to_end(&mut buf)
                .context("Can't read `settings.json` file")?;
            let settings = json::deserialize::<Settings>(&buf)?;
            Ok(settings)
        } else {
            debug!("Create settings file at {}", settings_path.display());
            let settings = Settings::default();
            let settings_json = json::serialize(&settings)?;
            let mut settings_file = File::create(settings_path).context(format!(
                "Can't create `settings.json` file: {}",
                settings_path.display()
            ))?;
            settings_file.write_all(&settings_json)?;
            settings_file.flush()?;

            Ok(settings)
        }
    }
}
