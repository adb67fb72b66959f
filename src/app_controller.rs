use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::app_config::{Config, SegmentSourceKind};
use crate::errors::PipelineError;
use crate::file_utils::{FileManager, RunPaths};
use crate::media;
use crate::sources;
use crate::style::StyleResolver;
use crate::subtitle_processor::{AssDocument, TranscriptSegment};

// @module: Application controller for the subtitle pipeline

/// Artifacts and counts from one pipeline run
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Source video, if one was used
    pub video: Option<PathBuf>,
    /// Generated ASS document
    pub subtitles: PathBuf,
    /// Rendered video, unless burning was skipped
    pub output: Option<PathBuf>,
    /// Segments received from the source
    pub segment_count: usize,
    /// Dialogue lines written
    pub cue_count: usize,
    /// Wall-clock time of the run
    pub elapsed: Duration,
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the whole pipeline: pick the video, load segments, write the ASS
    /// document and burn it in (unless `ass_only`).
    pub async fn run(&self, video_selector: Option<&str>, ass_only: bool) -> Result<RunSummary> {
        let start_time = Instant::now();
        let paths = &self.config.paths;

        FileManager::ensure_layout(paths)?;
        let run_paths = RunPaths::now(paths);

        // Importing a subtitle file into a document needs no video at all
        let needs_video =
            !(ass_only && self.config.transcription.source == SegmentSourceKind::SubtitleFile);
        let video = if needs_video {
            let candidates = FileManager::find_video_files(&paths.video_dir)?;
            Some(select_video(&candidates, video_selector, &paths.video_dir)?)
        } else {
            None
        };

        if let Some(video) = &video {
            info!("Using video: {:?}", video);
        }

        let spinner = Self::spinner();

        spinner.set_message(format!(
            "Loading segments ({})",
            self.config.transcription.source.display_name()
        ));
        let source = sources::from_config(
            &self.config.transcription,
            video.as_deref().unwrap_or(Path::new("")),
            &run_paths.audio,
        )?;
        debug!("Segment source: {}", source.name());
        let segments = source.load_segments().await?;

        spinner.set_message("Creating subtitle file");
        let cue_count = self.write_document(&segments, &run_paths.subtitles)?;
        info!("Wrote {} subtitle lines to {:?}", cue_count, run_paths.subtitles);

        let output = match (&video, ass_only) {
            (Some(video), false) => {
                spinner.set_message("Burning subtitles into video");
                media::burn_subtitles(video, &run_paths.subtitles, &paths.fonts_dir, &run_paths.output)
                    .await?;
                Some(run_paths.output.clone())
            }
            _ => None,
        };

        spinner.finish_and_clear();

        let elapsed = start_time.elapsed();
        match &output {
            Some(output) => info!("Done in {}. Output saved to {:?}", Self::format_duration(elapsed), output),
            None => info!("Done in {}. Subtitles saved to {:?}", Self::format_duration(elapsed), run_paths.subtitles),
        }

        Ok(RunSummary {
            video,
            subtitles: run_paths.subtitles,
            output,
            segment_count: segments.len(),
            cue_count,
            elapsed,
        })
    }

    /// Synthesize cues from `segments` and persist the ASS document at `path`.
    ///
    /// Returns the number of dialogue lines written.
    pub fn write_document(&self, segments: &[TranscriptSegment], path: &Path) -> Result<usize> {
        let (settings, style) = StyleResolver::resolve(&self.config.style)?;

        let document = AssDocument::from_segments(segments, &settings, style);
        if document.cues.is_empty() {
            warn!("No words found in {} segments; the subtitle track is empty", segments.len());
        }

        document.write_to_file(path)?;
        Ok(document.cues.len())
    }

    fn spinner() -> ProgressBar {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        spinner.set_style(style);
        spinner.enable_steady_tick(Duration::from_millis(120));
        spinner
    }

    fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}

/// Choose the video to process.
///
/// With no candidates the input is exhausted. A selector may be a 1-based index
/// into `candidates`, a file name from the list, or a path to any video file.
/// Without a selector a single candidate is taken as is and several are ambiguous.
pub fn select_video(candidates: &[PathBuf], selector: Option<&str>, dir: &Path) -> Result<PathBuf> {
    if let Some(selector) = selector {
        let selector = selector.trim();

        if let Ok(index) = selector.parse::<usize>() {
            if (1..=candidates.len()).contains(&index) {
                return Ok(candidates[index - 1].clone());
            }
            return Err(anyhow!(
                "Video index {} is out of range (1-{})",
                index,
                candidates.len()
            ));
        }

        let as_path = Path::new(selector);
        if FileManager::file_exists(as_path) {
            return Ok(as_path.to_path_buf());
        }

        return candidates
            .iter()
            .find(|c| c.file_name().is_some_and(|name| name.to_string_lossy() == selector))
            .cloned()
            .ok_or_else(|| anyhow!("No video named '{}' in {:?}", selector, dir));
    }

    match candidates {
        [] => Err(PipelineError::InputExhausted { dir: dir.to_path_buf() }.into()),
        [only] => Ok(only.clone()),
        many => {
            for (idx, path) in many.iter().enumerate() {
                info!("  {}: {}", idx + 1, path.display());
            }
            Err(PipelineError::AmbiguousInput {
                count: many.len(),
                dir: dir.to_path_buf(),
            }
            .into())
        }
    }
}
