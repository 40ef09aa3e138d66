//! Declarative logger configuration
//!
//! ```
//! use json_logger::LoggerConfig;
//!
//! let config = LoggerConfig::from_json(r#"{"levels": ["info", "error"], "output": "discard"}"#)?;
//! let logger = config.build()?;
//! assert!(!logger.is_enabled(json_logger::LogLevel::Debug));
//! # Ok::<(), json_logger::LoggerError>(())
//! ```

use super::error::{LoggerError, Result};
use super::log_level::{LevelMask, LogLevel};
use super::logger::Logger;
use super::registry::LevelRegistry;
use crate::sinks::Sink;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Logger settings, usually loaded from a JSON document.
///
/// `output` is `"stdout"`, `"stderr"`, `"discard"` or a file path opened in
/// append mode. Key and level name overrides apply to the registry the
/// logger is built against, the global one by default.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggerConfig {
    pub levels: Vec<String>,
    pub output: String,
    pub context_name: Option<String>,
    pub level_key: Option<String>,
    pub message_key: Option<String>,
    pub level_names: BTreeMap<String, String>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            levels: LevelMask::ALL.levels().map(|l| l.to_str().to_string()).collect(),
            output: "stdout".to_string(),
            context_name: None,
            level_key: None,
            message_key: None,
            level_names: BTreeMap::new(),
        }
    }
}

impl LoggerConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Enabled levels as a mask.
    pub fn level_mask(&self) -> Result<LevelMask> {
        self.levels.iter().map(|name| name.parse::<LogLevel>()).collect()
    }

    /// Build a logger against the global registry.
    pub fn build(&self) -> Result<Logger> {
        self.build_with_registry(LevelRegistry::global())
    }

    /// Build a logger, applying key and name overrides to `registry`.
    ///
    /// Every setting is validated before anything is applied, so a bad
    /// config leaves the registry untouched.
    pub fn build_with_registry(&self, registry: &std::sync::Arc<LevelRegistry>) -> Result<Logger> {
        let levels = self.level_mask()?;
        let renames = self
            .level_names
            .iter()
            .map(|(level, text)| Ok((level.parse::<LogLevel>()?, text.clone())))
            .collect::<Result<Vec<_>>>()?;
        for (field, key) in [("level_key", &self.level_key), ("message_key", &self.message_key)] {
            if matches!(key.as_deref(), Some("")) {
                return Err(LoggerError::config(field, "key must not be empty"));
            }
        }
        let sink = self.open_sink()?;

        if let Some(key) = &self.level_key {
            registry.set_level_key(key.clone());
        }
        if let Some(key) = &self.message_key {
            registry.set_message_key(key.clone());
        }
        for (level, text) in renames {
            registry.set_level_text(level, text);
        }

        let mut builder = Logger::builder()
            .sink(sink)
            .levels(levels)
            .registry(std::sync::Arc::clone(registry));
        if let Some(name) = &self.context_name {
            builder = builder.context_name(name.clone());
        }
        Ok(builder.build())
    }

    fn open_sink(&self) -> Result<Sink> {
        match self.output.as_str() {
            "stdout" => Ok(Sink::stdout()),
            "stderr" => Ok(Sink::stderr()),
            "discard" => Ok(Sink::discard()),
            "" => Err(LoggerError::config("output", "output must not be empty")),
            path => Sink::file(path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_defaults() {
        let config = LoggerConfig::from_json("{}").unwrap();
        assert_eq!(config, LoggerConfig::default());
        assert_eq!(config.level_mask().unwrap(), LevelMask::ALL);
        assert_eq!(config.output, "stdout");
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = LoggerConfig::from_json(r#"{"lvls": ["info"]}"#).unwrap_err();
        assert!(matches!(err, LoggerError::JsonError(_)));
    }

    #[test]
    fn test_bad_level_rejected_before_registry_changes() {
        let registry = Arc::new(LevelRegistry::new());
        let config = LoggerConfig::from_json(
            r#"{"output": "discard", "message_key": "msg", "level_names": {"loud": "x"}}"#,
        )
        .unwrap();
        let err = config.build_with_registry(&registry).unwrap_err();
        assert!(matches!(err, LoggerError::InvalidLevel(_)));
        assert_eq!(registry.message_key(), "message");
    }

    #[test]
    fn test_build_applies_overrides() {
        let registry = Arc::new(LevelRegistry::new());
        let config = LoggerConfig::from_json(
            r#"{
                "levels": ["warn", "error"],
                "output": "discard",
                "context_name": "params",
                "level_key": "severity",
                "message_key": "msg",
                "level_names": {"warn": "WARNING"}
            }"#,
        )
        .unwrap();
        let logger = config.build_with_registry(&registry).unwrap();

        assert_eq!(logger.levels(), LogLevel::Warn | LogLevel::Error);
        assert_eq!(logger.context_name(), Some("params"));
        assert_eq!(logger.sink().name(), "discard");
        assert_eq!(
            registry.prefix(LogLevel::Warn),
            br#"{"severity":"WARNING","msg":"#.to_vec()
        );
    }

    #[test]
    fn test_empty_key_rejected() {
        let registry = Arc::new(LevelRegistry::new());
        let config = LoggerConfig::from_json(r#"{"output": "discard", "level_key": ""}"#).unwrap();
        let err = config.build_with_registry(&registry).unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_file_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.log");
        let config = LoggerConfig {
            output: path.display().to_string(),
            ..LoggerConfig::default()
        };
        let logger = config
            .build_with_registry(&Arc::new(LevelRegistry::new()))
            .unwrap();
        logger.info("to file");
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "{\"level\":\"info\",\"message\":\"to file\"}\n"
        );
    }
}
