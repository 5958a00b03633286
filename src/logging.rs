//! Logging configuration for tagkit
//!
//! Logs are written to both the terminal and a file at:
//! `<local data dir>/tagkit/logs/tagkit.log`
//!
//! The terminal only shows warnings and errors unless `--verbose` is given;
//! the file always keeps debug output.

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};
use std::fs::{self, OpenOptions};
use std::path::PathBuf;

const LOG_FILE: &str = "tagkit.log";
const MAX_LOG_SIZE: u64 = 10 * 1024 * 1024;

/// Get the log directory path
pub fn get_log_directory() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("tagkit").join("logs"))
}

/// Get the current log file path
pub fn get_log_file_path() -> Option<PathBuf> {
    get_log_directory().map(|d| d.join(LOG_FILE))
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_thread_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .build()
}

/// Terminal level for the given verbosity
pub fn terminal_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    }
}

/// Initialize the logging system
///
/// Returns the path to the log file on success
pub fn init_logging(verbose: bool) -> Option<PathBuf> {
    let term_level = terminal_level(verbose);

    let log_dir = match get_log_directory() {
        Some(d) => d,
        None => {
            init_terminal_only(term_level);
            return None;
        }
    };

    if let Err(e) = fs::create_dir_all(&log_dir) {
        eprintln!("Warning: Could not create log directory: {}", e);
        init_terminal_only(term_level);
        return None;
    }

    let log_path = log_dir.join(LOG_FILE);

    // Rotate old log if it's too large
    if let Ok(metadata) = fs::metadata(&log_path) {
        if metadata.len() > MAX_LOG_SIZE {
            let backup_path = log_dir.join(format!("{}.old", LOG_FILE));
            let _ = fs::rename(&log_path, &backup_path);
        }
    }

    let log_file = match OpenOptions::new().create(true).append(true).open(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not open log file: {}", e);
            init_terminal_only(term_level);
            return None;
        }
    };

    let config = build_config();
    let loggers: Vec<Box<dyn SharedLogger>> = vec![
        TermLogger::new(term_level, config.clone(), TerminalMode::Stderr, ColorChoice::Auto),
        WriteLogger::new(LevelFilter::Debug, config, log_file),
    ];

    if CombinedLogger::init(loggers).is_err() {
        eprintln!("Warning: Logger already initialized");
    }

    log::info!("=== tagkit session started ===");
    log::debug!("Log file: {}", log_path.display());

    Some(log_path)
}

/// Initialize terminal-only logging (fallback if file logging fails)
fn init_terminal_only(level: LevelFilter) {
    let term_logger = TermLogger::new(level, build_config(), TerminalMode::Stderr, ColorChoice::Auto);
    let _ = CombinedLogger::init(vec![term_logger]);
}
