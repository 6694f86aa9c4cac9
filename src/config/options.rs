// src/config/options.rs
use std::path::PathBuf;

use super::consts::*;
use crate::log::LogConfig;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppOptions {
    pub log: LogConfig,
    pub scrape: ScrapeOptions,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            log: LogConfig::default(),
            scrape: ScrapeOptions::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScrapeOptions {
    /// Saved page fragment the appids are pulled from.
    pub appid_source: PathBuf,
    /// One sub-directory per game lands here.
    pub image_dir: PathBuf,
    /// Progress counter, kept under `scrape/done`.
    pub state_file: PathBuf,
    pub pause_ms: u64,
    /// Skip the appids a previous run already finished.
    pub resume: bool,
    pub limit: Option<usize>,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            appid_source: PathBuf::from(DEFAULT_APPID_SOURCE),
            image_dir: PathBuf::from(DEFAULT_IMAGE_DIR),
            state_file: PathBuf::from(DEFAULT_DATA_DIR).join(STATE_FILE),
            pause_ms: REQUEST_PAUSE_MS,
            resume: false,
            limit: None,
        }
    }
}

