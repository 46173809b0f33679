use serde::{Deserialize, Serialize};

use crate::types::Quality;

pub const DEFAULT_OUTPUT_DIR: &str = "~/TikTok Downloads";
pub const DEFAULT_EXTRACTOR: &str = "yt-dlp";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Deserialize, Serialize)]
pub struct AppConfig {
    pub(super) output_dir: String,
    pub(super) extractor: String,
    #[serde(default)]
    pub(super) quality: Quality,
    #[serde(default = "enabled")]
    pub(super) history: bool,
    #[serde(default)]
    pub(super) open_folder: bool,
    #[serde(default)]
    pub(super) stealth: bool,
    pub(super) user_agent: Option<String>,
    pub(super) data_dir: Option<String>,
}

fn enabled() -> bool {
    true
}

impl AppConfig {
    pub fn new_default() -> AppConfig {
        AppConfig {
            output_dir: DEFAULT_OUTPUT_DIR.to_string(),
            extractor: DEFAULT_EXTRACTOR.to_string(),
            quality: Quality::Best,
            history: true,
            open_folder: false,
            stealth: false,
            user_agent: None,
            data_dir: None,
        }
    }
}
