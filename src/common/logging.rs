//! Minimal colored console logger.

use colored::Colorize;

/// Severity of a log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Prints a timestamped, colored log line to stdout.
pub fn log(level: LogLevel, message: &str) {
    let timestamp = chrono::Local::now().format("%H:%M:%S%.3f");
    let tag = match level {
        LogLevel::Info => "INFO".blue(),
        LogLevel::Success => "OK".green(),
        LogLevel::Warning => "WARN".yellow(),
        LogLevel::Error => "ERROR".red(),
    };
    println!("[{timestamp}] [{tag}] {message}");
}
