use std::path::{Path, PathBuf};

use anyhow::Result;
use home_dir::HomeDirExt;

use crate::errors::GrabError;

/// Output folder for the running session. Never written back to the config
/// file.
pub struct OutputStore {
    output_dir: PathBuf,
}

impl OutputStore {
    pub fn new(output_dir: PathBuf) -> Self {
        OutputStore { output_dir }
    }

    pub fn get(&self) -> &Path {
        &self.output_dir
    }

    pub fn set(&mut self, output_dir: PathBuf) {
        self.output_dir = output_dir;
    }
}

/// Turns the "change folder" answer into a path. `None` keeps the current
/// folder. The path is not checked here; a bad folder fails the next download.
pub fn parse_folder_input(input: &str) -> Result<Option<PathBuf>> {
    let trimmed = input.trim().trim_matches('"').trim();

    if trimmed.is_empty() {
        return Ok(None);
    }

    let path = PathBuf::from(trimmed);
    let expanded = path
        .expand_home()
        .map_err(|_| GrabError::HomeDir(trimmed.to_string()))?;

    if expanded.is_absolute() {
        Ok(Some(expanded))
    } else {
        Ok(Some(std::env::current_dir()?.join(expanded)))
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{parse_folder_input, OutputStore};

    #[test]
    fn it_overwrites_output_dir() {
        let mut store = OutputStore::new(PathBuf::from("/tmp/old"));
        store.set(PathBuf::from("/tmp/new"));

        assert_eq!(store.get(), PathBuf::from("/tmp/new").as_path());
    }

    #[test]
    fn it_keeps_folder_on_empty_input() {
        assert_eq!(parse_folder_input("").unwrap(), None);
        assert_eq!(parse_folder_input("   \n").unwrap(), None);
    }

    #[test]
    fn it_strips_quotes() {
        let result = parse_folder_input("\"/tmp/My Clips\"\n").unwrap();
        assert_eq!(result, Some(PathBuf::from("/tmp/My Clips")));
    }

    #[test]
    fn it_resolves_relative_paths_against_working_dir() {
        let result = parse_folder_input("clips").unwrap().unwrap();

        assert!(result.is_absolute());
        assert_eq!(result, std::env::current_dir().unwrap().join("clips"));
    }

    #[test]
    fn it_does_not_require_folder_to_exist() {
        let result = parse_folder_input("/definitely/not/here").unwrap();
        assert_eq!(result, Some(PathBuf::from("/definitely/not/here")));
    }

    #[test]
    fn it_expands_home() {
        if std::env::var_os("HOME").is_none() {
            return;
        }

        let result = parse_folder_input("~/clips").unwrap().unwrap();

        assert!(!result.starts_with("~"));
        assert!(result.ends_with("clips"));
    }
}
