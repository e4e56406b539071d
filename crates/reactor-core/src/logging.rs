//! Logging configuration.
//!
//! The subscriber itself is installed by the host binary; this module only
//! describes where and how much to log, and manages the log directory.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::level_filters::LevelFilter;

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Minimum level ("error", "warn", "info", "debug", "trace")
    pub level: String,
    /// Log to stderr
    pub console_output: bool,
    /// Log to a file in `log_directory`
    pub file_output: bool,
    /// Directory for log files
    pub log_directory: PathBuf,
    /// Number of rotated log files kept besides the current one
    pub max_log_files: usize,
    /// File name prefix of log files
    pub file_prefix: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            console_output: true,
            file_output: false,
            log_directory: PathBuf::from("logs"),
            max_log_files: 5,
            file_prefix: "reactor".to_string(),
        }
    }
}

impl LogConfig {
    /// Parsed level, `INFO` if the configured string is not a level
    pub fn parse_level(&self) -> LevelFilter {
        self.level.trim().parse().unwrap_or(LevelFilter::INFO)
    }

    /// Create the log directory if needed
    pub fn ensure_log_directory(&self) -> io::Result<()> {
        fs::create_dir_all(&self.log_directory)
    }

    /// Path of the log file for the current session
    pub fn current_log_path(&self) -> PathBuf {
        self.log_directory.join(format!("{}.log", self.file_prefix))
    }

    fn rotated_path(&self, index: usize) -> PathBuf {
        self.log_directory
            .join(format!("{}.{}.log", self.file_prefix, index))
    }

    /// Shift previous logs (`prefix.log` -> `prefix.1.log` -> ...) and delete
    /// those beyond `max_log_files`.
    pub fn cleanup_old_logs(&self) -> io::Result<()> {
        if !self.log_directory.is_dir() {
            return Ok(());
        }

        for index in self.rotated_indices()? {
            if index >= self.max_log_files {
                fs::remove_file(self.rotated_path(index))?;
            }
        }

        if self.max_log_files == 0 {
            return remove_if_exists(&self.current_log_path());
        }

        for index in (1..self.max_log_files).rev() {
            rename_if_exists(&self.rotated_path(index), &self.rotated_path(index + 1))?;
        }
        rename_if_exists(&self.current_log_path(), &self.rotated_path(1))
    }

    fn rotated_indices(&self) -> io::Result<Vec<usize>> {
        let prefix = format!("{}.", self.file_prefix);
        let mut indices = Vec::new();
        for entry in fs::read_dir(&self.log_directory)? {
            let name = entry?.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            let index = name
                .strip_prefix(&prefix)
                .and_then(|rest| rest.strip_suffix(".log"))
                .and_then(|n| n.parse::<usize>().ok());
            if let Some(index) = index {
                indices.push(index);
            }
        }
        Ok(indices)
    }
}

fn rename_if_exists(from: &Path, to: &Path) -> io::Result<()> {
    if from.exists() {
        fs::rename(from, to)?;
    }
    Ok(())
}

fn remove_if_exists(path: &Path) -> io::Result<()> {
    if path.exists() {
        fs::remove_file(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_in(dir: &Path, max_log_files: usize) -> LogConfig {
        LogConfig {
            log_directory: dir.to_path_buf(),
            max_log_files,
            ..LogConfig::default()
        }
    }

    #[test]
    fn test_parse_level() {
        let mut config = LogConfig::default();
        assert_eq!(config.parse_level(), LevelFilter::INFO);
        config.level = "debug".to_string();
        assert_eq!(config.parse_level(), LevelFilter::DEBUG);
        config.level = "loud".to_string();
        assert_eq!(config.parse_level(), LevelFilter::INFO);
    }

    #[test]
    fn test_rotation_keeps_max_files() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), 2);
        config.ensure_log_directory().unwrap();

        for session in 0..4 {
            config.cleanup_old_logs().unwrap();
            fs::write(config.current_log_path(), format!("session {}", session)).unwrap();
        }

        assert_eq!(
            fs::read_to_string(config.current_log_path()).unwrap(),
            "session 3"
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("reactor.1.log")).unwrap(),
            "session 2"
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("reactor.2.log")).unwrap(),
            "session 1"
        );
        assert!(!dir.path().join("reactor.3.log").exists());
    }

    #[test]
    fn test_cleanup_missing_directory_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir.path().join("absent"), 3);
        assert!(config.cleanup_old_logs().is_ok());
    }

    #[test]
    fn test_deserialize_partial() {
        let config: LogConfig = serde_json::from_str(r#"{"level":"warn"}"#).unwrap();
        assert_eq!(config.level, "warn");
        assert_eq!(config.max_log_files, 5);
    }
}
