use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadMode {
    Video,
    Photos,
}

impl DownloadMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DownloadMode::Video => "video",
            DownloadMode::Photos => "photos",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum Quality {
    #[default]
    #[serde(rename = "best")]
    Best,
    #[serde(rename = "1080p")]
    Max1080,
    #[serde(rename = "720p")]
    Max720,
    #[serde(rename = "480p")]
    Max480,
    #[serde(rename = "audio")]
    Audio,
}

impl Quality {
    /// Maps the numeric answer of the quality prompt.
    pub fn from_choice(choice: &str) -> Option<Quality> {
        match choice.trim() {
            "1" => Some(Quality::Best),
            "2" => Some(Quality::Max1080),
            "3" => Some(Quality::Max720),
            "4" => Some(Quality::Max480),
            "5" => Some(Quality::Audio),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Quality::Best => "Best",
            Quality::Max1080 => "Max 1080p",
            Quality::Max720 => "Max 720p",
            Quality::Max480 => "Max 480p",
            Quality::Audio => "Audio only",
        }
    }

    /// yt-dlp format selector. Watermarked renditions are tried last.
    pub fn format_selector(&self) -> &'static str {
        match self {
            Quality::Best => "b[format_note!*=?watermark]/bv*+ba/b",
            Quality::Max1080 => {
                "b[height<=1080][format_note!*=?watermark]/bv*[height<=1080]+ba/b[height<=1080]/b"
            }
            Quality::Max720 => {
                "b[height<=720][format_note!*=?watermark]/bv*[height<=720]+ba/b[height<=720]/b"
            }
            Quality::Max480 => {
                "b[height<=480][format_note!*=?watermark]/bv*[height<=480]+ba/b[height<=480]/b"
            }
            Quality::Audio => "ba/b",
        }
    }
}

#[derive(Debug, Clone)]
pub struct DownloadRequest {
    pub url: Url,
    pub mode: DownloadMode,
    /// `None` for slideshows, whose images are fetched as they are.
    pub quality: Option<Quality>,
}

impl DownloadRequest {
    pub fn quality_label(&self) -> &'static str {
        self.quality.map(|q| q.label()).unwrap_or("Images")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedMedia {
    pub path: PathBuf,
    pub id: Option<String>,
    pub uploader: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryState {
    Finished,
    Failed,
}

pub struct HistoryEntry {
    pub created_at: String,
    pub url: String,
    pub mode: String,
    pub quality: String,
    pub state: HistoryState,
    pub output: Option<String>,
    pub output_dir: String,
    pub error: Option<String>,
}
