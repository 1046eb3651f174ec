// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Logging initialisation shared by the better-autocomplete binaries.
//!
//! Everything goes through `tracing-subscriber` with an `EnvFilter`:
//! `RUST_LOG` wins when set, otherwise the level passed at init applies to
//! every target. Terminal front ends always log to a file so log lines never
//! land on the screen they draw.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub use clap;
pub use tracing::Level;

const APP_DIR: &str = "better-autocomplete";

/// Output format for log records
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Plaintext,
    Json,
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Plaintext => write!(f, "plaintext"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

/// Log level as accepted on the command line
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CliLogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for Level {
    fn from(level: CliLogLevel) -> Self {
        match level {
            CliLogLevel::Error => Level::ERROR,
            CliLogLevel::Warn => Level::WARN,
            CliLogLevel::Info => Level::INFO,
            CliLogLevel::Debug => Level::DEBUG,
            CliLogLevel::Trace => Level::TRACE,
        }
    }
}

/// Where log records are written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LogTarget {
    Console,
    File(PathBuf),
}

/// Logging arguments for `#[command(flatten)]`.
#[derive(Clone, Debug, Default, clap::Args, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CliLoggingArgs {
    /// Log verbosity level
    #[arg(long, value_enum, help = "Log verbosity level (default: info)")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<CliLogLevel>,

    /// Log output format
    #[arg(long, value_enum, help = "Log output format (default: plaintext)")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_format: Option<LogFormat>,

    /// Directory for log files
    #[arg(long, help = "Directory for log files (default: platform specific)")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,

    /// Log filename or path
    #[arg(long, help = "Log filename or path")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

impl CliLoggingArgs {
    /// Initialise the global subscriber for `component`.
    pub fn init(&self, component: &str, is_tui: bool) -> anyhow::Result<()> {
        let level = self.log_level.unwrap_or_default().into();
        let format = self.log_format.unwrap_or_default();
        match self.target(component, is_tui) {
            LogTarget::Console => init(component, level, format),
            LogTarget::File(path) => init_to_file(component, level, format, &path),
        }
    }

    /// Terminal front ends always log to a file; other binaries log to the
    /// console unless a file or directory was given.
    pub fn target(&self, component: &str, is_tui: bool) -> LogTarget {
        if !is_tui && self.log_file.is_none() && self.log_dir.is_none() {
            return LogTarget::Console;
        }
        LogTarget::File(self.resolve_log_path(component))
    }

    fn resolve_log_path(&self, component: &str) -> PathBuf {
        let file_name = PathBuf::from(format!("{component}.log"));
        match (&self.log_dir, &self.log_file) {
            (_, Some(file)) if file.is_absolute() => file.clone(),
            (Some(dir), Some(file)) => dir.join(file),
            (None, Some(file)) if file.parent().is_some_and(|p| !p.as_os_str().is_empty()) => {
                file.clone()
            }
            (None, Some(file)) => standard_log_dir().join(file),
            (Some(dir), None) => dir.join(file_name),
            (None, None) => get_standard_log_path_for_component(component),
        }
    }
}

fn standard_log_dir() -> PathBuf {
    get_standard_log_path()
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(std::env::temp_dir)
}

/// Platform log location for `component`, next to [`get_standard_log_path`].
pub fn get_standard_log_path_for_component(component: &str) -> PathBuf {
    standard_log_dir().join(format!("{component}.log"))
}

/// Platform log file location:
/// - macOS: `~/Library/Logs/better-autocomplete/better-autocomplete.log`
/// - elsewhere: `<data dir>/better-autocomplete/better-autocomplete.log`
pub fn get_standard_log_path() -> PathBuf {
    #[cfg(target_os = "macos")]
    let base = dirs::home_dir()
        .map(|home| home.join("Library").join("Logs"))
        .unwrap_or_else(std::env::temp_dir);

    #[cfg(not(target_os = "macos"))]
    let base = dirs::data_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(std::env::temp_dir);

    base.join(APP_DIR).join(format!("{APP_DIR}.log"))
}

/// Log to stdout.
pub fn init(component: &str, default_level: Level, format: LogFormat) -> anyhow::Result<()> {
    init_with_writer(component, default_level, format, io::stdout)
}

/// Log to `log_path`, creating parent directories and appending to an
/// existing file.
pub fn init_to_file(
    component: &str,
    default_level: Level,
    format: LogFormat,
    log_path: &Path,
) -> anyhow::Result<()> {
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let log_file = std::fs::OpenOptions::new().create(true).append(true).open(log_path)?;
    init_with_writer(component, default_level, format, std::sync::Mutex::new(log_file))
}

pub fn init_with_writer<W>(
    component: &str,
    default_level: Level,
    format: LogFormat,
    writer: W,
) -> anyhow::Result<()>
where
    W: for<'writer> tracing_subscriber::fmt::MakeWriter<'writer> + Send + Sync + 'static,
{
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{default_level},{}={default_level}", component.replace('-', "_"))));

    match format {
        LogFormat::Json => {
            let layer = tracing_subscriber::fmt::layer().with_writer(writer).with_ansi(false).json();
            tracing_subscriber::registry().with(filter).with(layer).try_init()?;
        }
        LogFormat::Plaintext => {
            let layer = tracing_subscriber::fmt::layer().with_writer(writer);
            #[cfg(debug_assertions)]
            let layer = layer.with_file(true).with_line_number(true);
            tracing_subscriber::registry().with(filter).with(layer).try_init()?;
        }
    }
    Ok(())
}
