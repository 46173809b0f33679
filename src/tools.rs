use std::{
    path::{Path, PathBuf},
    process::Command,
};

use tracing::{debug, warn};

use crate::errors::GrabError;

#[derive(Debug)]
pub struct ExtractorInfo {
    pub path: PathBuf,
    pub version: String,
}

/// Startup precondition: the extractor must resolve and answer `--version`.
/// Nothing is installed on the user's behalf.
pub fn ensure_extractor(binary: &str) -> Result<ExtractorInfo, GrabError> {
    let path = which::which(binary).map_err(|e| {
        debug!(binary, error = %e, "extractor lookup failed");
        GrabError::ExtractorMissing(binary.to_string())
    })?;

    let output = Command::new(&path)
        .arg("--version")
        .output()
        .map_err(|e| GrabError::ExtractorBroken {
            binary: binary.to_string(),
            reason: e.to_string(),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        return Err(GrabError::ExtractorBroken {
            binary: binary.to_string(),
            reason: if stderr.is_empty() {
                format!("`--version` exited with {}", output.status)
            } else {
                stderr
            },
        });
    }

    let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
    debug!(path = %path.display(), %version, "extractor found");

    Ok(ExtractorInfo { path, version })
}

pub fn has_ffmpeg() -> bool {
    which::which("ffmpeg").is_ok() && which::which("ffprobe").is_ok()
}

pub fn open_folder(path: &Path) {
    let opener = if cfg!(target_os = "windows") {
        "explorer"
    } else if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    };

    if let Err(e) = Command::new(opener).arg(path).spawn() {
        warn!(opener, path = %path.display(), error = %e, "cannot open output folder");
    }
}

#[cfg(test)]
mod tests {
    use crate::{errors::GrabError, test_support};

    use super::ensure_extractor;

    #[test]
    fn it_fails_for_missing_binary() {
        let result = ensure_extractor("tt-grab-no-such-extractor");
        assert!(matches!(result, Err(GrabError::ExtractorMissing(name)) if name == "tt-grab-no-such-extractor"));
    }

    #[cfg(unix)]
    #[test]
    fn it_reports_version_of_working_binary() {
        let _guard = test_support::lock();
        let dir = tempfile::tempdir().unwrap();
        let binary = test_support::fake_extractor(dir.path(), test_support::SUCCEEDING_EXTRACTOR);

        let info = ensure_extractor(binary.to_str().unwrap()).unwrap();

        assert!(info.path.ends_with("yt-dlp"));
        assert_eq!(info.version, "2024.01.01");
    }

    #[cfg(unix)]
    #[test]
    fn it_fails_for_broken_binary() {
        let _guard = test_support::lock();
        let dir = tempfile::tempdir().unwrap();
        let binary = test_support::fake_extractor(
            dir.path(),
            "echo 'ModuleNotFoundError: No module named yt_dlp' >&2\nexit 1\n",
        );

        let result = ensure_extractor(binary.to_str().unwrap());

        assert!(
            matches!(result, Err(GrabError::ExtractorBroken { reason, .. }) if reason.contains("yt_dlp"))
        );
    }
}
