//! Logging configuration.

use crate::config::LoggingSettings;
use std::path::PathBuf;

/// Filter used when nothing else is configured.
pub const DEFAULT_FILTER: &str = "wordvault=info,warn";

/// Filter used with `--verbose`.
pub const VERBOSE_FILTER: &str = "wordvault=debug,info";

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable text lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

impl LogFormat {
    /// Parses a format name, defaulting to pretty output.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Pretty,
        }
    }
}

/// Resolved logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Output format.
    pub format: LogFormat,
    /// `EnvFilter` directive.
    pub filter: String,
    /// Log file; stderr when `None`.
    pub file: Option<PathBuf>,
}

impl LoggingConfig {
    /// Builds logging configuration from config settings with env overrides.
    ///
    /// The filter is taken from the first of `WORDVAULT_LOG`, `RUST_LOG`,
    /// `--verbose`, the config file, and [`DEFAULT_FILTER`].
    #[must_use]
    pub fn from_settings(settings: Option<&LoggingSettings>, verbose: bool) -> Self {
        Self::from_lookup(settings, verbose, |key| std::env::var(key).ok())
    }

    /// Same as [`Self::from_settings`], reading variables through `lookup`.
    #[must_use]
    pub fn from_lookup(
        settings: Option<&LoggingSettings>,
        verbose: bool,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let env = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let format = env("WORDVAULT_LOG_FORMAT")
            .or_else(|| settings.and_then(|s| s.format.clone()))
            .map_or(LogFormat::default(), |f| LogFormat::parse(&f));

        let filter = env("WORDVAULT_LOG")
            .or_else(|| env("RUST_LOG"))
            .or_else(|| verbose.then(|| VERBOSE_FILTER.to_string()))
            .or_else(|| settings.and_then(|s| s.filter.clone()))
            .unwrap_or_else(|| DEFAULT_FILTER.to_string());

        let file = env("WORDVAULT_LOG_FILE")
            .or_else(|| settings.and_then(|s| s.file.clone()))
            .map(PathBuf::from);

        Self {
            format,
            filter,
            file,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            filter: DEFAULT_FILTER.to_string(),
            file: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> LoggingSettings {
        LoggingSettings {
            format: Some("json".to_string()),
            filter: Some("wordvault=trace".to_string()),
            file: Some("/tmp/wordvault.log".to_string()),
        }
    }

    #[test]
    fn test_defaults_without_settings() {
        let config = LoggingConfig::from_lookup(None, false, |_| None);
        assert_eq!(config, LoggingConfig::default());
    }

    #[test]
    fn test_settings_are_used() {
        let config = LoggingConfig::from_lookup(Some(&settings()), false, |_| None);
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.filter, "wordvault=trace");
        assert_eq!(config.file, Some(PathBuf::from("/tmp/wordvault.log")));
    }

    #[test]
    fn test_verbose_beats_settings_but_not_env() {
        let config = LoggingConfig::from_lookup(Some(&settings()), true, |_| None);
        assert_eq!(config.filter, VERBOSE_FILTER);

        let config = LoggingConfig::from_lookup(Some(&settings()), true, |key| {
            (key == "RUST_LOG").then(|| "error".to_string())
        });
        assert_eq!(config.filter, "error");
    }

    #[test]
    fn test_env_overrides_format_and_file() {
        let config = LoggingConfig::from_lookup(Some(&settings()), false, |key| match key {
            "WORDVAULT_LOG_FORMAT" => Some("pretty".to_string()),
            "WORDVAULT_LOG_FILE" => Some("/var/log/w.log".to_string()),
            "WORDVAULT_LOG" => Some("  ".to_string()),
            _ => None,
        });
        assert_eq!(config.format, LogFormat::Pretty);
        assert_eq!(config.file, Some(PathBuf::from("/var/log/w.log")));
        assert_eq!(config.filter, "wordvault=trace");
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::parse("pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::parse("other"), LogFormat::Pretty);
    }
}
