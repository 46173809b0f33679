use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GrabError {
    #[error(
        "`{0}` was not found. Install yt-dlp (for example `pip install -U yt-dlp`) \
         or set `extractor` in the config file, then start again"
    )]
    ExtractorMissing(String),

    #[error("`{binary}` is installed but cannot be run: {reason}")]
    ExtractorBroken { binary: String, reason: String },

    #[error("could not start `{binary}`: {source}")]
    Spawn {
        binary: String,
        #[source]
        source: io::Error,
    },

    #[error("no URL given")]
    EmptyUrl,

    #[error("\"{0}\" is not a valid http(s) URL")]
    MalformedUrl(String),

    #[error("cannot use output folder \"{}\": {source}", path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("audio-only downloads need ffmpeg and ffprobe on PATH")]
    FfmpegMissing,

    #[error("cannot resolve home directory in \"{0}\"")]
    HomeDir(String),

    #[error("{0}")]
    Extraction(String),
}
