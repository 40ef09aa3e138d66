//! Log level definitions
//!
//! Every level is a distinct bit so that a logger can enable any
//! combination of them through a [`LevelMask`].

use super::error::LoggerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum LogLevel {
    Info = 0x01,
    Debug = 0x02,
    #[serde(alias = "warning")]
    Warn = 0x04,
    Error = 0x08,
    Fatal = 0x10,
}

impl LogLevel {
    /// All levels, in bit order.
    pub const ALL: [LogLevel; 5] = [
        LogLevel::Info,
        LogLevel::Debug,
        LogLevel::Warn,
        LogLevel::Error,
        LogLevel::Fatal,
    ];

    #[inline]
    pub const fn bit(self) -> u8 {
        self as u8
    }

    /// Canonical lowercase name, used until a registry renames the level.
    pub fn to_str(&self) -> &'static str {
        match self {
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Fatal => "fatal",
        }
    }

    /// Dense index in `0..5`, used for per-level tables.
    #[inline]
    pub(crate) const fn index(self) -> usize {
        match self {
            LogLevel::Info => 0,
            LogLevel::Debug => 1,
            LogLevel::Warn => 2,
            LogLevel::Error => 3,
            LogLevel::Fatal => 4,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

impl FromStr for LogLevel {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            "fatal" => Ok(LogLevel::Fatal),
            _ => Err(LoggerError::invalid_level(s)),
        }
    }
}

/// Set of enabled levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LevelMask(u8);

impl LevelMask {
    pub const NONE: LevelMask = LevelMask(0);
    pub const ALL: LevelMask = LevelMask(0x1f);

    /// Build a mask from raw bits; bits outside the five levels are dropped.
    pub const fn from_bits(bits: u8) -> Self {
        LevelMask(bits & Self::ALL.0)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn contains(self, level: LogLevel) -> bool {
        self.0 & level.bit() != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn with(self, level: LogLevel) -> Self {
        LevelMask(self.0 | level.bit())
    }

    #[must_use]
    pub const fn without(self, level: LogLevel) -> Self {
        LevelMask(self.0 & !level.bit())
    }

    /// Levels present in the mask, in bit order.
    pub fn levels(self) -> impl Iterator<Item = LogLevel> {
        LogLevel::ALL.into_iter().filter(move |l| self.contains(*l))
    }
}

impl From<LogLevel> for LevelMask {
    fn from(level: LogLevel) -> Self {
        LevelMask(level.bit())
    }
}

impl BitOr for LogLevel {
    type Output = LevelMask;

    fn bitor(self, rhs: LogLevel) -> LevelMask {
        LevelMask(self.bit() | rhs.bit())
    }
}

impl BitOr<LogLevel> for LevelMask {
    type Output = LevelMask;

    fn bitor(self, rhs: LogLevel) -> LevelMask {
        self.with(rhs)
    }
}

impl BitOr for LevelMask {
    type Output = LevelMask;

    fn bitor(self, rhs: LevelMask) -> LevelMask {
        LevelMask(self.0 | rhs.0)
    }
}

impl BitOrAssign<LogLevel> for LevelMask {
    fn bitor_assign(&mut self, rhs: LogLevel) {
        self.0 |= rhs.bit();
    }
}

impl FromIterator<LogLevel> for LevelMask {
    fn from_iter<I: IntoIterator<Item = LogLevel>>(iter: I) -> Self {
        iter.into_iter().fold(LevelMask::NONE, |mask, l| mask | l)
    }
}

impl fmt::Display for LevelMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for level in self.levels() {
            if !first {
                f.write_str("|")?;
            }
            f.write_str(level.to_str())?;
            first = false;
        }
        Ok(())
    }
}

/// Parses `"info|warn"`, `"info,warn"`, `"all"` or `"none"` (an empty string is `none`).
impl FromStr for LevelMask {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("none") {
            return Ok(LevelMask::NONE);
        }
        if s.eq_ignore_ascii_case("all") {
            return Ok(LevelMask::ALL);
        }
        s.split(['|', ','])
            .map(str::parse::<LogLevel>)
            .collect::<Result<LevelMask, _>>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bits_are_distinct() {
        let combined = LogLevel::ALL.iter().fold(0u8, |acc, l| {
            assert_eq!(acc & l.bit(), 0);
            acc | l.bit()
        });
        assert_eq!(combined, LevelMask::ALL.bits());
    }

    #[test]
    fn test_mask_contains() {
        let mask = LogLevel::Info | LogLevel::Warn;
        assert!(mask.contains(LogLevel::Info));
        assert!(mask.contains(LogLevel::Warn));
        assert!(!mask.contains(LogLevel::Debug));
        assert!(!LevelMask::NONE.contains(LogLevel::Fatal));
        assert_eq!(mask.without(LogLevel::Info), LevelMask::from(LogLevel::Warn));
    }

    #[test]
    fn test_level_parse() {
        assert_eq!("INFO".parse::<LogLevel>().unwrap(), LogLevel::Info);
        assert_eq!("Warning".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert!(matches!(
            "trace".parse::<LogLevel>(),
            Err(LoggerError::InvalidLevel(_))
        ));
    }

    #[test]
    fn test_mask_parse_and_display() {
        let mask: LevelMask = "info|warn,error".parse().unwrap();
        assert_eq!(mask, LogLevel::Info | LogLevel::Warn | LogLevel::Error);
        assert_eq!(mask.to_string(), "info|warn|error");
        assert_eq!("all".parse::<LevelMask>().unwrap(), LevelMask::ALL);
        assert_eq!("".parse::<LevelMask>().unwrap(), LevelMask::NONE);
        assert!("info|loud".parse::<LevelMask>().is_err());
    }

    #[test]
    fn test_from_bits_drops_unknown() {
        assert_eq!(LevelMask::from_bits(0xff), LevelMask::ALL);
    }

    #[test]
    fn test_serde_names() {
        let level: LogLevel = serde_json::from_str("\"warning\"").unwrap();
        assert_eq!(level, LogLevel::Warn);
        assert_eq!(serde_json::to_string(&LogLevel::Fatal).unwrap(), "\"fatal\"");
    }
}
