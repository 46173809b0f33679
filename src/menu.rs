use std::{
    io::{BufRead, Write},
    path::Path,
    time::Instant,
};

use anyhow::Result;
use tracing::{debug, warn};

use crate::{
    config::store::{parse_folder_input, OutputStore},
    downloader::{DownloadStatus, Extractor},
    history_repository::{HistoryRecord, HistoryRepository},
    link::parse_media_url,
    tools,
    types::{DownloadMode, DownloadRequest, HistoryState, Quality},
    ui::{self, Theme},
};

const HISTORY_LIMIT: usize = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    DownloadVideo,
    DownloadPhotos,
    ChangeFolder,
    Exit,
    History,
    UpdateExtractor,
    ToggleTheme,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Option<MenuChoice> {
        match input.trim() {
            "1" => Some(MenuChoice::DownloadVideo),
            "2" => Some(MenuChoice::DownloadPhotos),
            "3" => Some(MenuChoice::ChangeFolder),
            "4" => Some(MenuChoice::Exit),
            "5" => Some(MenuChoice::History),
            "6" => Some(MenuChoice::UpdateExtractor),
            "7" => Some(MenuChoice::ToggleTheme),
            _ => None,
        }
    }
}

pub struct Menu<R, W, E> {
    input: R,
    output: W,
    extractor: E,
    store: OutputStore,
    history: Option<HistoryRepository>,
    quality: Quality,
    stealth: bool,
    theme: Theme,
    open_folder: bool,
    status: &'static str,
}

impl<R: BufRead, W: Write, E: Extractor> Menu<R, W, E> {
    pub fn new(input: R, output: W, extractor: E, store: OutputStore) -> Self {
        Menu {
            input,
            output,
            extractor,
            store,
            history: None,
            quality: Quality::Best,
            stealth: false,
            theme: Theme::fire(),
            open_folder: false,
            status: "Ready",
        }
    }

    pub fn with_history(mut self, history: Option<HistoryRepository>) -> Self {
        self.history = history;
        self
    }

    pub fn with_quality(mut self, quality: Quality) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_stealth(mut self, stealth: bool) -> Self {
        self.stealth = stealth;
        self.theme = Theme::for_mode(stealth);
        self
    }

    pub fn with_open_folder(mut self, open_folder: bool) -> Self {
        self.open_folder = open_folder;
        self
    }

    pub fn output_dir(&self) -> &Path {
        self.store.get()
    }

    /// Runs until the user picks "Exit" or input ends. Only terminal I/O
    /// errors escape; download problems are reported and the loop goes on.
    pub fn run(&mut self) -> Result<()> {
        ui::draw_banner(&mut self.output, &self.theme)?;

        loop {
            ui::draw_menu(
                &mut self.output,
                &self.theme,
                self.store.get(),
                self.status,
                self.stealth,
            )?;

            let Some(line) = self.read_line()? else {
                debug!("input closed, leaving menu");
                break;
            };

            self.status = "Ready";

            match MenuChoice::parse(&line) {
                Some(MenuChoice::DownloadVideo) => self.download(DownloadMode::Video)?,
                Some(MenuChoice::DownloadPhotos) => self.download(DownloadMode::Photos)?,
                Some(MenuChoice::ChangeFolder) => self.change_folder()?,
                Some(MenuChoice::Exit) => {
                    ui::print_info(&mut self.output, &self.theme, "Later!")?;
                    break;
                }
                Some(MenuChoice::History) => self.show_history()?,
                Some(MenuChoice::UpdateExtractor) => self.update_extractor()?,
                Some(MenuChoice::ToggleTheme) => {
                    self.stealth = !self.stealth;
                    self.theme = Theme::for_mode(self.stealth);
                    self.status = "Theme toggled";
                }
                None => {
                    self.status = "Invalid option";
                    ui::print_error(&mut self.output, &self.theme, "Invalid option. Pick 1-7.")?;
                }
            }
        }

        Ok(())
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let mut buffer = String::new();

        if self.input.read_line(&mut buffer)? == 0 {
            return Ok(None);
        }

        Ok(Some(buffer.trim().to_string()))
    }

    fn ask(&mut self, label: &str) -> Result<Option<String>> {
        ui::prompt(&mut self.output, &self.theme, label)?;
        self.read_line()
    }

    fn download(&mut self, mode: DownloadMode) -> Result<()> {
        let label = match mode {
            DownloadMode::Video => "Paste the video URL",
            DownloadMode::Photos => "Paste the slideshow URL",
        };

        let input = self.ask(label)?.unwrap_or_default();

        let url = match parse_media_url(&input) {
            Ok(url) => url,
            Err(e) => {
                self.status = "Download failed";
                return ui::print_error(&mut self.output, &self.theme, &e.to_string());
            }
        };

        let quality = match mode {
            DownloadMode::Video => Some(self.ask_quality()?),
            DownloadMode::Photos => None,
        };

        let request = DownloadRequest { url, mode, quality };
        let output_dir = self.store.get().to_path_buf();

        ui::print_info(&mut self.output, &self.theme, "Downloading...")?;
        let started = Instant::now();

        let result = self.extractor.download(&request, &output_dir);
        let output_dir_text = output_dir.display().to_string();
        let url_text = request.url.to_string();
        let quality_label = request.quality_label();

        match result {
            Ok(DownloadStatus::DownloadFinished { files }) => {
                self.status = "Ready";
                ui::print_success(
                    &mut self.output,
                    &self.theme,
                    &format!("Done in {:.1}s.", started.elapsed().as_secs_f64()),
                )?;

                for file in &files {
                    debug!(path = %file.path.display(), uploader = ?file.uploader, id = ?file.id, "saved media");
                    ui::print_success(
                        &mut self.output,
                        &self.theme,
                        &format!("Saved file: {}", file.path.display()),
                    )?;
                }

                ui::print_success(
                    &mut self.output,
                    &self.theme,
                    &format!("Output folder: {}", output_dir_text),
                )?;

                let saved = files.first().map(|f| f.path.display().to_string());
                self.record(HistoryRecord {
                    url: &url_text,
                    mode: mode.as_str(),
                    quality: quality_label,
                    state: HistoryState::Finished,
                    output: saved.as_deref(),
                    output_dir: &output_dir_text,
                    error: None,
                });

                if self.open_folder {
                    tools::open_folder(&output_dir);
                }
            }
            Ok(DownloadStatus::DownloadFailed { error_message }) => {
                self.report_failure(&url_text, mode, quality_label, &output_dir_text, &error_message)?;
            }
            Err(e) => {
                let error_message = e.to_string();
                self.report_failure(&url_text, mode, quality_label, &output_dir_text, &error_message)?;
            }
        }

        Ok(())
    }

    fn report_failure(
        &mut self,
        url: &str,
        mode: DownloadMode,
        quality: &str,
        output_dir: &str,
        error_message: &str,
    ) -> Result<()> {
        self.status = "Download failed";
        ui::print_error(
            &mut self.output,
            &self.theme,
            &format!("Download failed: {}", error_message),
        )?;
        ui::print_info(
            &mut self.output,
            &self.theme,
            "Tip: make sure the URL is correct and the account is public.",
        )?;

        self.record(HistoryRecord {
            url,
            mode: mode.as_str(),
            quality,
            state: HistoryState::Failed,
            output: None,
            output_dir,
            error: Some(error_message),
        });

        Ok(())
    }

    fn record(&self, record: HistoryRecord) {
        if let Some(history) = &self.history {
            if let Err(e) = history.record(&record) {
                warn!(error = %e, "cannot write download history");
            }
        }
    }

    fn ask_quality(&mut self) -> Result<Quality> {
        ui::print_info(
            &mut self.output,
            &self.theme,
            "[1] Best  [2] 1080p max  [3] 720p max  [4] 480p max  [5] Audio only",
        )?;

        if !tools::has_ffmpeg() {
            ui::print_info(
                &mut self.output,
                &self.theme,
                "FFmpeg not found: audio only will fail until it is installed.",
            )?;
        }

        let label = format!("Quality (Enter = {})", self.quality.label());
        let answer = self.ask(&label)?.unwrap_or_default();

        if answer.is_empty() {
            return Ok(self.quality);
        }

        match Quality::from_choice(&answer) {
            Some(quality) => Ok(quality),
            None => {
                ui::print_info(
                    &mut self.output,
                    &self.theme,
                    &format!("Unknown quality, using {}.", self.quality.label()),
                )?;
                Ok(self.quality)
            }
        }
    }

    fn change_folder(&mut self) -> Result<()> {
        let current = format!("Current folder: {}", self.store.get().display());
        ui::print_info(&mut self.output, &self.theme, &current)?;

        let answer = self
            .ask("Enter new folder path (Enter keeps current)")?
            .unwrap_or_default();

        match parse_folder_input(&answer) {
            Ok(Some(path)) => {
                let message = format!("Output folder set to: {}", path.display());
                self.store.set(path);
                ui::print_success(&mut self.output, &self.theme, &message)?;
            }
            Ok(None) => {
                ui::print_info(&mut self.output, &self.theme, "Output folder unchanged.")?;
            }
            Err(e) => {
                ui::print_error(&mut self.output, &self.theme, &e.to_string())?;
            }
        }

        Ok(())
    }

    fn show_history(&mut self) -> Result<()> {
        let Some(history) = &self.history else {
            return ui::print_info(
                &mut self.output,
                &self.theme,
                "Download history is disabled in the config file.",
            );
        };

        match history.latest(HISTORY_LIMIT) {
            Ok(entries) => ui::draw_history(&mut self.output, &self.theme, &entries),
            Err(e) => ui::print_error(
                &mut self.output,
                &self.theme,
                &format!("Cannot read history: {}", e),
            ),
        }
    }

    fn update_extractor(&mut self) -> Result<()> {
        ui::print_info(&mut self.output, &self.theme, "Updating extractor...")?;

        match self.extractor.update() {
            Ok(message) => {
                let message = if message.is_empty() {
                    "Extractor updated.".to_string()
                } else {
                    message
                };
                ui::print_success(&mut self.output, &self.theme, &message)
            }
            Err(e) => {
                self.status = "Update failed";
                ui::print_error(
                    &mut self.output,
                    &self.theme,
                    &format!("Update failed: {}", e),
                )
            }
        }
    }
}
