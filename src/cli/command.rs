use std::path::PathBuf;

use clap::{Args, Parser as ClapParser, Subcommand, ValueEnum};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (h264nal ",
    env!("H264NAL_VERSION"),
    ", built ",
    env!("BUILD_TIMESTAMP"),
    ")"
);

#[derive(Debug, ClapParser)]
#[command(
    name         = "h264nal",
    version      = env!("CARGO_PKG_VERSION"),
    long_version = LONG_VERSION,
    author       = env!("CARGO_PKG_AUTHORS"),
    about        = "Tools for generating and inspecting H.264 parameter set NAL units",
    long_about   = None,
)]
pub struct Cli {
    /// Set the log level
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Info)]
    pub loglevel: LogLevel,

    /// Treat warnings as fatal errors (fail on first warning).
    #[arg(long, global = true)]
    pub strict: bool,

    /// Log output format.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Choose an operation to perform.
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Write an SPS followed by a PPS as an Annex B byte stream.
    Write(WriteArgs),

    /// Print the field layout and bytes of the SPS and PPS.
    Inspect(InspectArgs),

    /// Print the default YAML configuration.
    Config,
}

#[derive(Debug, Args)]
pub struct StreamArgs {
    /// YAML stream configuration (see the `config` command).
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Picture width in luma samples (multiple of 16).
    #[arg(long, value_name = "PIXELS")]
    pub width: Option<u32>,

    /// Picture height in luma samples (multiple of 16).
    #[arg(long, value_name = "PIXELS")]
    pub height: Option<u32>,

    /// profile_idc, e.g. 66 (Baseline), 77 (Main) or 100 (High).
    #[arg(long, value_name = "IDC")]
    pub profile: Option<u8>,

    /// level_idc, e.g. 30 for level 3 or 31 for level 3.1.
    #[arg(long, value_name = "IDC")]
    pub level: Option<u8>,

    /// Use the three-byte start code `00 00 01`.
    #[arg(long)]
    pub short_start_code: bool,

    /// Insert emulation prevention bytes after the NAL header.
    #[arg(long)]
    pub emulation_prevention: bool,
}

#[derive(Debug, Args)]
pub struct WriteArgs {
    #[command(flatten)]
    pub stream: StreamArgs,

    /// Output file (use "-" for stdout).
    #[arg(long, short, value_name = "PATH", default_value = "out.264")]
    pub output: PathBuf,
}

#[derive(Debug, Args)]
pub struct InspectArgs {
    #[command(flatten)]
    pub stream: StreamArgs,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    /// Disable logging output.
    Off,
    /// No output except errors.
    Error,
    /// Show warnings and errors.
    Warn,
    /// Show info, warnings and errors (default).
    Info,
    /// Show debug, info, warnings and errors.
    Debug,
    /// Show all log messages including per-field traces.
    Trace,
}

impl LogLevel {
    /// Convert LogLevel to log::LevelFilter
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormat {
    /// Human-readable text.
    Plain,
    /// Structured JSON per log record.
    Json,
}

impl Cli {
    /// Level at which conformance warnings abort the command.
    pub fn fail_level(&self) -> log::Level {
        if self.strict {
            log::Level::Warn
        } else {
            log::Level::Error
        }
    }
}
