use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
    process::{Command, Output},
};

use anyhow::Result;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::{
    errors::GrabError,
    tools,
    types::{DownloadMode, DownloadRequest, Quality, SavedMedia},
};

pub const PHOTOS_DIR: &str = "photos";

const MEDIA_TEMPLATE: &str = "%(uploader)s_%(id)s.%(ext)s";

#[derive(Debug)]
pub enum DownloadStatus {
    DownloadFinished { files: Vec<SavedMedia> },
    DownloadFailed { error_message: String },
}

pub trait Extractor {
    fn download(&self, request: &DownloadRequest, output_dir: &Path) -> Result<DownloadStatus>;

    /// Self-update of the extractor; returns what the tool printed.
    fn update(&self) -> Result<String>;
}

impl<E: Extractor + ?Sized> Extractor for &E {
    fn download(&self, request: &DownloadRequest, output_dir: &Path) -> Result<DownloadStatus> {
        (**self).download(request, output_dir)
    }

    fn update(&self) -> Result<String> {
        (**self).update()
    }
}

pub struct YtDlp {
    binary: PathBuf,
    user_agent: Option<String>,
    has_ffmpeg: fn() -> bool,
}

impl YtDlp {
    pub fn new(binary: PathBuf, user_agent: Option<String>) -> Self {
        YtDlp {
            binary,
            user_agent,
            has_ffmpeg: tools::has_ffmpeg,
        }
    }

    #[cfg(test)]
    pub fn with_ffmpeg_check(mut self, has_ffmpeg: fn() -> bool) -> Self {
        self.has_ffmpeg = has_ffmpeg;
        self
    }

    fn run(&self, args: &[String]) -> Result<Output, GrabError> {
        debug!(binary = %self.binary.display(), ?args, "running extractor");

        Command::new(&self.binary)
            .args(args)
            .output()
            .map_err(|source| GrabError::Spawn {
                binary: self.binary.display().to_string(),
                source,
            })
    }

    fn fetch(&self, request: &DownloadRequest, target_dir: &Path) -> Result<DownloadStatus> {
        let before = list_files(target_dir)?;

        let args = build_args(request, target_dir, self.user_agent.as_deref());
        let output = self.run(&args)?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        if !output.status.success() {
            let error_message = summarize_error(&stderr, &output.status.to_string());
            warn!(url = %request.url, %error_message, "download failed");

            return Ok(DownloadStatus::DownloadFailed { error_message });
        }

        let files = match request.mode {
            DownloadMode::Video => parse_saved_media(&stdout),
            DownloadMode::Photos => {
                let printed = parse_printed_info(&stdout).into_iter().next();
                let id = printed.as_ref().and_then(|p| p.id.clone());
                let uploader = printed.and_then(|p| p.uploader);

                let fresh: Vec<PathBuf> = list_files(target_dir)?
                    .into_iter()
                    .filter(|path| !before.contains(path))
                    .collect();

                number_slides(fresh, id.as_deref())?
                    .into_iter()
                    .map(|path| SavedMedia {
                        path,
                        id: id.clone(),
                        uploader: uploader.clone(),
                    })
                    .collect()
            }
        };

        info!(url = %request.url, count = files.len(), "download finished");

        Ok(DownloadStatus::DownloadFinished { files })
    }
}

impl Extractor for YtDlp {
    fn download(&self, request: &DownloadRequest, output_dir: &Path) -> Result<DownloadStatus> {
        if request.mode == DownloadMode::Video
            && request.quality == Some(Quality::Audio)
            && !(self.has_ffmpeg)()
        {
            return Err(GrabError::FfmpegMissing.into());
        }

        let target_dir = target_dir(request.mode, output_dir);
        let created = missing_dirs(&target_dir);

        fs::create_dir_all(&target_dir).map_err(|source| GrabError::OutputDir {
            path: target_dir.clone(),
            source,
        })?;

        let result = self.fetch(request, &target_dir);

        if !matches!(result, Ok(DownloadStatus::DownloadFinished { .. })) {
            remove_empty_dirs(&created);
        }

        result
    }

    fn update(&self) -> Result<String> {
        let output = self.run(&["-U".to_string()])?;

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        let stderr = String::from_utf8_lossy(&output.stderr);

        if output.status.success() {
            Ok(stdout)
        } else {
            Err(GrabError::Extraction(summarize_error(&stderr, &output.status.to_string())).into())
        }
    }
}

pub fn target_dir(mode: DownloadMode, output_dir: &Path) -> PathBuf {
    match mode {
        DownloadMode::Video => output_dir.to_path_buf(),
        DownloadMode::Photos => output_dir.join(PHOTOS_DIR),
    }
}

/// Folders that `create_dir_all` would make for `path`, deepest first.
fn missing_dirs(path: &Path) -> Vec<PathBuf> {
    path.ancestors()
        .take_while(|dir| !dir.as_os_str().is_empty() && !dir.exists())
        .map(Path::to_path_buf)
        .collect()
}

fn remove_empty_dirs(dirs: &[PathBuf]) {
    for dir in dirs {
        // remove_dir refuses non-empty folders
        if fs::remove_dir(dir).is_ok() {
            debug!(path = %dir.display(), "removed folder left by failed download");
        }
    }
}

fn list_files(dir: &Path) -> Result<HashSet<PathBuf>> {
    let mut files = HashSet::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.insert(entry.path());
        }
    }

    Ok(files)
}

pub fn build_args(
    request: &DownloadRequest,
    target_dir: &Path,
    user_agent: Option<&str>,
) -> Vec<String> {
    let template = target_dir.join(MEDIA_TEMPLATE).display().to_string();
    let mut args = vec!["--no-warnings".to_string()];

    match request.mode {
        DownloadMode::Video => {
            let quality = request.quality.unwrap_or_default();

            args.push("--no-playlist".to_string());
            args.push("-f".to_string());
            args.push(quality.format_selector().to_string());
            args.push("-o".to_string());
            args.push(template);

            if quality == Quality::Audio {
                args.extend(
                    ["-x", "--audio-format", "mp3", "--audio-quality", "0"]
                        .iter()
                        .map(|a| a.to_string()),
                );
            }

            args.push("--no-simulate".to_string());
            args.push("--print".to_string());
            args.push("after_move:%()j".to_string());
        }
        DownloadMode::Photos => {
            // Slides are exposed as thumbnails of a single audio entry.
            args.push("--yes-playlist".to_string());
            args.push("--skip-download".to_string());
            args.push("--write-all-thumbnails".to_string());
            args.push("-o".to_string());
            args.push(template.clone());
            args.push("-o".to_string());
            args.push(format!("thumbnail:{}", template));
            args.push("--no-simulate".to_string());
            args.push("--print".to_string());
            args.push("video:%()j".to_string());
        }
    }

    if let Some(agent) = user_agent {
        args.push("--add-header".to_string());
        args.push(format!("User-Agent:{}", agent));
    }

    args.push("--".to_string());
    args.push(request.url.to_string());

    args
}

#[derive(Deserialize)]
pub struct PrintedInfo {
    pub id: Option<String>,
    pub uploader: Option<String>,
    filepath: Option<String>,
    #[serde(rename = "_filename")]
    filename: Option<String>,
}

/// Info JSON lines printed by `--print ...:%()j`.
pub fn parse_printed_info(stdout: &str) -> Vec<PrintedInfo> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with('{'))
        .filter_map(|line| match serde_json::from_str::<PrintedInfo>(line) {
            Ok(info) => Some(info),
            Err(e) => {
                debug!(error = %e, "skipping unparsable extractor line");
                None
            }
        })
        .collect()
}

/// Reads the info JSON lines printed after each file is moved into place.
pub fn parse_saved_media(stdout: &str) -> Vec<SavedMedia> {
    parse_printed_info(stdout)
        .into_iter()
        .filter_map(|info| {
            info.filepath.or(info.filename).map(|path| SavedMedia {
                path: PathBuf::from(path),
                id: info.id,
                uploader: info.uploader,
            })
        })
        .collect()
}

/// Splits `<uploader>_<id>.<thumbnail id>.<ext>` into its three parts.
fn split_slide_name(file_name: &str, id: &str) -> Option<(String, String, String)> {
    let marker = format!("_{}.", id);
    let dot = file_name.rfind(&marker)? + marker.len() - 1;

    let base = &file_name[..dot];
    let rest = &file_name[dot + 1..];
    let (slide, ext) = rest.rsplit_once('.').unwrap_or(("", rest));

    Some((base.to_string(), slide.to_string(), ext.to_string()))
}

/// Renames fresh slide images to `<uploader>_<id>_<n>.<ext>`, numbered from 1
/// in the extractor's thumbnail order. Files that do not match are kept as
/// they are, after the numbered ones.
pub fn number_slides(files: Vec<PathBuf>, id: Option<&str>) -> Result<Vec<PathBuf>> {
    let mut slides = Vec::new();
    let mut others = Vec::new();

    for path in files {
        let parts = path
            .file_name()
            .and_then(|name| name.to_str())
            .zip(id)
            .and_then(|(name, id)| split_slide_name(name, id));

        match parts {
            Some(parts) => slides.push((path, parts)),
            None => others.push(path),
        }
    }

    slides.sort_by(|(_, (_, a, _)), (_, (_, b, _))| {
        let key = |slide: &String| (slide.parse::<u64>().unwrap_or(u64::MAX), slide.clone());
        key(a).cmp(&key(b))
    });
    others.sort();

    let mut numbered = Vec::with_capacity(slides.len() + others.len());

    for (index, (path, (base, _, ext))) in slides.into_iter().enumerate() {
        let target = path.with_file_name(format!("{}_{}.{}", base, index + 1, ext));

        if target != path {
            fs::rename(&path, &target)?;
        }
        numbered.push(target);
    }

    numbered.extend(others);

    Ok(numbered)
}

/// One line of the extractor's own error text, left untranslated.
pub fn summarize_error(stderr: &str, status: &str) -> String {
    let lines: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    lines
        .iter()
        .rev()
        .find(|line| line.starts_with("ERROR:"))
        .or_else(|| lines.last())
        .map(|line| line.to_string())
        .unwrap_or_else(|| format!("extractor exited with {}", status))
}
