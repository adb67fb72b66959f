/*!
 * End-to-end subtitle generation through the controller
 */

use anyhow::Result;
use std::fs;
use std::path::Path;
use subburn::app_config::{Config, SegmentSourceKind};
use subburn::app_controller::Controller;
use subburn::errors::PipelineError;
use subburn::subtitle_processor::parse_ass_string;

use crate::common;

fn import_config(root: &Path, subtitle_file: &Path) -> Config {
    let mut config = Config::default();
    config.paths = common::paths_in(root);
    config.transcription.source = SegmentSourceKind::SubtitleFile;
    config.transcription.subtitle_file = Some(subtitle_file.to_path_buf());
    config
}

/// Importing an SRT file without burning writes a restyled ASS document
#[test]
fn test_run_withSubtitleFileAndAssOnly_shouldWriteDocument() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    let srt = common::create_test_subtitle(root, "talk.srt")?;

    let mut config = import_config(root, &srt);
    config.style.words_per_line = 3;
    config.style.color = "cyan".to_string();
    config.style.position = "slightly-above-bottom".to_string();
    config.style.bounce = true;

    let controller = Controller::with_config(config)?;
    let summary = tokio_test::block_on(controller.run(None, true))?;

    assert!(summary.video.is_none());
    assert!(summary.output.is_none());
    assert_eq!(summary.segment_count, 3);
    // 5 + 8 + 3 words at three per line
    assert_eq!(summary.cue_count, 2 + 3 + 1);

    // Every folder of the layout exists after the run
    for dir in controller.config().paths.all_dirs() {
        assert!(dir.is_dir());
    }

    assert!(summary.subtitles.starts_with(root.join("subtitles")));
    let content = fs::read_to_string(&summary.subtitles)?;
    assert!(content.contains(
        "Style: Default,Playfair Display,48,&H00FFFF00,400,0,0,0,100,100,0,0,1,2,1.0,5,10,10,180,1"
    ));
    assert_eq!(content.matches("Dialogue:").count(), summary.cue_count);
    assert!(content.contains("Dialogue: 0,0:00:01.00,"));
    assert!(content.contains(",0,0,0,,{\\fscx30\\fscy30\\t(0,75,"));

    let words: Vec<String> = parse_ass_string(&content)?
        .iter()
        .flat_map(|s| s.words().into_iter().map(str::to_string).collect::<Vec<_>>())
        .collect();
    assert_eq!(words.first().map(String::as_str), Some("This"));
    assert_eq!(words.last().map(String::as_str), Some("purposes."));
    assert_eq!(words.len(), 16);
    Ok(())
}

/// An ASS file can be imported and restyled as well
#[test]
fn test_run_withAssInput_shouldRestyleDocument() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    let ass = common::create_test_file(
        root,
        "input.ass",
        "[Events]\nDialogue: 0,0:00:00.00,0:00:02.00,Old,,0,0,0,,{\\i1}first second{\\i0}\n",
    )?;

    let mut config = import_config(root, &ass);
    config.style.words_per_line = 1;

    let controller = Controller::with_config(config)?;
    let summary = tokio_test::block_on(controller.run(None, true))?;

    let content = fs::read_to_string(&summary.subtitles)?;
    assert!(content.contains("Dialogue: 0,0:00:00.00,0:00:01.00,Default,,0,0,0,,first\n"));
    assert!(content.contains("Dialogue: 0,0:00:01.00,0:00:02.00,Default,,0,0,0,,second\n"));
    Ok(())
}

/// Transcription with an empty video folder stops before any tool runs
#[test]
fn test_run_withNoVideos_shouldReturnInputExhausted() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let mut config = Config::default();
    config.paths = common::paths_in(temp_dir.path());

    let controller = Controller::with_config(config)?;
    let err = tokio_test::block_on(controller.run(None, false)).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<PipelineError>(),
        Some(PipelineError::InputExhausted { .. })
    ));
    assert!(fs::read_dir(temp_dir.path().join("subtitles"))?.next().is_none());
    Ok(())
}

/// Several videos without a selection are ambiguous
#[test]
fn test_run_withSeveralVideosAndNoSelection_shouldReturnAmbiguousInput() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    let paths = common::paths_in(root);
    fs::create_dir_all(&paths.video_dir)?;
    common::create_test_file(&paths.video_dir, "one.mp4", "")?;
    common::create_test_file(&paths.video_dir, "two.mov", "")?;

    let srt = common::create_test_subtitle(root, "talk.srt")?;
    let controller = Controller::with_config(import_config(root, &srt))?;
    let err = tokio_test::block_on(controller.run(None, false)).unwrap_err();

    match err.downcast_ref::<PipelineError>() {
        Some(PipelineError::AmbiguousInput { count, .. }) => assert_eq!(*count, 2),
        other => panic!("expected AmbiguousInput, got {:?}", other),
    }
    Ok(())
}

/// A broken subtitle file aborts the run without writing a document
#[test]
fn test_run_withUnparseableSubtitleFile_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    let broken = common::create_test_file(root, "broken.srt", "no timestamps here\n")?;

    let controller = Controller::with_config(import_config(root, &broken))?;
    let result = tokio_test::block_on(controller.run(None, true));

    assert!(result.is_err());
    assert!(fs::read_dir(root.join("subtitles"))?.next().is_none());
    Ok(())
}
