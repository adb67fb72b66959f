// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use subburn::app_config::{self, Config, SegmentSourceKind};
use subburn::app_controller::Controller;

/// CLI Wrapper for SegmentSourceKind to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliSource {
    Transcribe,
    SubtitleFile,
}

impl From<CliSource> for SegmentSourceKind {
    fn from(cli_source: CliSource) -> Self {
        match cli_source {
            CliSource::Transcribe => SegmentSourceKind::Transcribe,
            CliSource::SubtitleFile => SegmentSourceKind::SubtitleFile,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate shell completions for subburn
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Video to process: 1-based index into the video folder, file name, or path
    #[arg(short, long)]
    video: Option<String>,

    /// Maximum words per subtitle line
    #[arg(short, long)]
    words_per_line: Option<usize>,

    /// Subtitle color: a name (white, yellow, ...) or hex (#RRGGBB)
    #[arg(long)]
    color: Option<String>,

    /// Font weight (100-900)
    #[arg(long)]
    font_weight: Option<i32>,

    /// Font size in points
    #[arg(long)]
    font_size: Option<u32>,

    /// Shadow strength (0 = none, 1 = normal, 3 = thick)
    #[arg(long)]
    shadow: Option<f64>,

    /// Scale-in bounce effect on every line
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    bounce: Option<bool>,

    /// Position: bottom, middle, top, slightly-above-bottom (or 1-4)
    #[arg(long)]
    position: Option<String>,

    /// Where segments come from
    #[arg(long, value_enum)]
    source: Option<CliSource>,

    /// Existing .srt or .ass file to import instead of transcribing
    #[arg(long, value_name = "PATH")]
    subtitle_file: Option<PathBuf>,

    /// Spoken language code (e.g., 'en', 'th', 'ja', 'zh')
    #[arg(short, long)]
    language: Option<String>,

    /// Speech-to-text model name
    #[arg(short, long)]
    model: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Only write the .ass file, do not burn it into the video
    #[arg(long)]
    ass_only: bool,
}

/// subburn - styled subtitles from speech, burned into video
#[derive(Parser, Debug)]
#[command(name = "subburn")]
#[command(version)]
#[command(about = "Transcribe a video and burn styled ASS subtitles into it")]
#[command(args_conflicts_with_subcommands = true)]
#[command(long_about = "subburn transcribes the audio of a video (or imports an existing subtitle file),
splits the transcript into short styled lines and burns them into the video with ffmpeg.

EXAMPLES:
    subburn                                      # Process the only video in ./videos
    subburn -v 2                                 # Pick the second video in ./videos
    subburn -w 3 --color yellow --bounce         # Three words per line, yellow, animated
    subburn --position top --font-size 56        # Larger subtitles at the top
    subburn --subtitle-file talk.srt --ass-only  # Restyle an existing .srt into .ass
    subburn completions bash > subburn.bash      # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. If the file doesn't exist,
    a default one is created. Command line options override the file.

EXTERNAL TOOLS:
    ffmpeg               - audio extraction and subtitle burning
    whisper-ctranslate2  - speech-to-text (configurable)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    run: RunArgs,
}

// @struct: Colored stderr logger
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger { level }))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color and emoji for a level
    fn decoration(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("1;31", "❌ "),
            Level::Warn => ("1;33", "🚧 "),
            Level::Info => ("1;32", ""),
            Level::Debug => ("1;36", "🔍 "),
            Level::Trace => ("1;35", "📋 "),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (color, emoji) = Self::decoration(record.level());
            let _ = writeln!(
                std::io::stderr(),
                "\x1B[{}m{} {}{}\x1B[0m",
                color, now, emoji, record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // The logger accepts every level; log::set_max_level does the filtering
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "subburn", &mut std::io::stdout());
            Ok(())
        }
        None => run(cli.run).await,
    }
}

async fn run(options: RunArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        log::set_max_level(level_filter(&cmd_log_level.clone().into()));
    }

    let mut config = load_or_create_config(&options.config_path)?;
    apply_overrides(&mut config, &options);

    if options.log_level.is_none() {
        log::set_max_level(level_filter(&config.log_level));
    }

    let controller = Controller::with_config(config)?;
    controller.run(options.video.as_deref(), options.ass_only).await?;

    Ok(())
}

fn load_or_create_config(config_path: &str) -> Result<Config> {
    if Path::new(config_path).exists() {
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?;

        Ok(config)
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        Ok(config)
    }
}

fn apply_overrides(config: &mut Config, options: &RunArgs) {
    let style = &mut config.style;
    if let Some(words) = options.words_per_line {
        style.words_per_line = words;
    }
    if let Some(color) = &options.color {
        style.color = color.clone();
    }
    if let Some(weight) = options.font_weight {
        style.font_weight = weight;
    }
    if let Some(size) = options.font_size {
        style.font_size = size;
    }
    if let Some(shadow) = options.shadow {
        style.shadow_strength = shadow;
    }
    if let Some(bounce) = options.bounce {
        style.bounce = bounce;
    }
    if let Some(position) = &options.position {
        style.position = position.clone();
    }

    let transcription = &mut config.transcription;
    if let Some(path) = &options.subtitle_file {
        transcription.subtitle_file = Some(path.clone());
        transcription.source = SegmentSourceKind::SubtitleFile;
    }
    if let Some(source) = &options.source {
        transcription.source = source.clone().into();
    }
    if let Some(language) = &options.language {
        transcription.language = language.clone();
    }
    if let Some(model) = &options.model {
        transcription.model = model.clone();
    }
    if let Some(level) = &options.log_level {
        config.log_level = level.clone().into();
    }
}
