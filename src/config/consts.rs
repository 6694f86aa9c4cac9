// src/config/consts.rs

// Site
pub const SITE_URL: &str = "https://www.steamcardexchange.net";
pub const APP_INFO_PATH: &str = "/index.php?gamepage-appid-{appid}";
pub const TITLE_PREFIX: &str = "Showcase :: ";
pub const BADGE_CONTAINER: &str = r#"<div class="showcase-element-container badge""#;

// Local data
pub const DEFAULT_DATA_DIR: &str = "./data";
pub const LOG_FILE: &str = "lib.log";
pub const ERROR_LOG_FILE: &str = "error.log";
pub const LOG_MAX_BYTES: u64 = 50 * 1024 * 1000;
pub const STATE_FILE: &str = "state.json";

// Scrape
pub const DEFAULT_APPID_SOURCE: &str = "all_url_tbody.txt";
pub const DEFAULT_IMAGE_DIR: &str = "images";
pub const RECORD_FILE: &str = "data.json";
pub const REQUEST_PAUSE_MS: u64 = 5_000; // be polite
pub const DOWNLOAD_PAUSE_MS: u64 = 100;

// Download retry
pub const TRIAL_NUM: u32 = 100;
pub const TRIAL_INTERVAL_SECS: u64 = 5;
pub const HTTP_TIMEOUT_SECS: u64 = 15;
