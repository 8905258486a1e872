// SPDX-License-Identifier: MIT OR Apache-2.0

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{fmt, fmt::writer::BoxMakeWriter, EnvFilter};

use crate::cfg::config::{LogFileConfig, LogOutput, LogRotation, LoggerSection};

/// Initializes the global `tracing` subscriber from a [`LoggerSection`].
/// Returns a [`WorkerGuard`] that must stay alive for the process lifetime
/// to keep the non-blocking writer flushing.
pub fn init_logger(cfg: &LoggerSection) -> Result<WorkerGuard> {
    let env_filter = EnvFilter::try_new(&cfg.level)
        .or_else(|_| EnvFilter::try_from_default_env())
        .context("failed to parse log level from config or env")?;

    let (writer, guard) = make_writer(cfg)?;

    let subscriber = fmt()
        .with_env_filter(env_filter)
        .with_writer(writer)
        .with_ansi(matches!(cfg.output, LogOutput::Stdout | LogOutput::Stderr))
        .json()
        .finish();

    tracing::subscriber::set_global_default(subscriber).context("failed to set global default subscriber")?;

    Ok(guard)
}

fn make_writer(cfg: &LoggerSection) -> Result<(BoxMakeWriter, WorkerGuard)> {
    Ok(match cfg.output {
        LogOutput::Stdout => {
            let (w, g) = tracing_appender::non_blocking(std::io::stdout());
            (BoxMakeWriter::new(w), g)
        }
        LogOutput::Stderr => {
            let (w, g) = tracing_appender::non_blocking(std::io::stderr());
            (BoxMakeWriter::new(w), g)
        }
        LogOutput::File => {
            let file_cfg: &LogFileConfig = cfg.file.as_ref().context("logger.file is required for output=file")?;
            let path = PathBuf::from(&file_cfg.path);
            let dir = path.parent().unwrap_or_else(|| Path::new("."));

            let rotation = match file_cfg.rotation.as_ref().unwrap_or(&LogRotation::Never) {
                LogRotation::Hourly => Rotation::HOURLY,
                LogRotation::Daily => Rotation::DAILY,
                LogRotation::Never => Rotation::NEVER,
            };

            let file_appender = RollingFileAppender::new(rotation, dir, path.file_name().unwrap_or_default());
            let (w, g) = tracing_appender::non_blocking(file_appender);
            (BoxMakeWriter::new(w), g)
        }
    })
}
