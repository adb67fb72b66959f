use anyhow::{Result, Context};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use chrono::Local;

use crate::app_config::PathsConfig;

// @module: File and directory utilities

/// Video container extensions picked up from the video directory
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "avi", "mkv", "flv", "wmv"];

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    // @creates: Every directory of the working layout
    pub fn ensure_layout(paths: &PathsConfig) -> Result<()> {
        for dir in paths.all_dirs() {
            Self::ensure_dir(dir)?;
        }
        Ok(())
    }

    /// Check the extension against the supported video containers
    pub fn is_video_file<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref()
            .extension()
            .map(|ext| {
                let ext = ext.to_string_lossy().to_lowercase();
                VIDEO_EXTENSIONS.contains(&ext.as_str())
            })
            .unwrap_or(false)
    }

    /// Video files directly inside `dir`, sorted by file name
    pub fn find_video_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).min_depth(1).max_depth(1).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() && Self::is_video_file(path) {
                result.push(path.to_path_buf());
            }
        }

        result.sort();
        Ok(result)
    }

    /// Size of a file in megabytes, if it exists
    pub fn size_mb<P: AsRef<Path>>(path: P) -> Option<f64> {
        fs::metadata(path.as_ref())
            .ok()
            .filter(|meta| meta.is_file())
            .map(|meta| meta.len() as f64 / (1024.0 * 1024.0))
    }
}

/// Timestamped artifact paths for one run
#[derive(Debug, Clone, PartialEq)]
pub struct RunPaths {
    pub audio: PathBuf,
    pub subtitles: PathBuf,
    pub output: PathBuf,
}

impl RunPaths {
    /// Paths stamped with the current local time
    pub fn now(paths: &PathsConfig) -> Self {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
        Self::with_timestamp(paths, &timestamp)
    }

    // @generates: audio_<ts>.wav, subtitles_<ts>.ass, output_with_sub_<ts>.mp4
    pub fn with_timestamp(paths: &PathsConfig, timestamp: &str) -> Self {
        Self {
            audio: paths.audio_dir.join(format!("audio_{}.wav", timestamp)),
            subtitles: paths.subtitle_dir.join(format!("subtitles_{}.ass", timestamp)),
            output: paths.output_dir.join(format!("output_with_sub_{}.mp4", timestamp)),
        }
    }
}
