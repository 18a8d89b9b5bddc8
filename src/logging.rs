// src/logging.rs

use crate::errors::{MedmapError, MedmapResult};
use flexi_logger::{detailed_format, FileSpec, Logger, LoggerHandle};
use std::path::{Path, PathBuf};

/// Where log files go when nothing else is configured.
pub fn default_log_dir() -> MedmapResult<PathBuf> {
    let data_dir = dirs::data_local_dir()
        .or_else(dirs::home_dir)
        .ok_or_else(|| MedmapError::config_error("Could not determine a data directory"))?;
    Ok(data_dir.join("medmap").join("logs"))
}

/// Starts file logging. The terminal belongs to the UI, so nothing is ever
/// written to stdout or stderr. `RUST_LOG` wins over the configured level.
/// Keep the returned handle alive for the lifetime of the program.
pub fn init_logging(level: &str, log_dir: &Path) -> MedmapResult<LoggerHandle> {
    std::fs::create_dir_all(log_dir)?;

    let handle = Logger::try_with_env_or_str(level)?
        .log_to_file(
            FileSpec::default()
                .directory(log_dir)
                .basename("medmap"),
        )
        .append()
        .format(detailed_format)
        .start()?;

    log::info!("Logging to {}", log_dir.display());
    Ok(handle)
}
