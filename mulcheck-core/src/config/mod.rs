//! harness configuration
//!
//! loaded from yaml; every field has a default matching the reference
//! board, so an empty document is a valid configuration:
//!
//! ```yaml
//! guard:
//!   policy: escalate
//!   pattern: [0xCAFEF00D, 0x7250D00D, 0xD000000D, 0x1000000D,
//!             0x42424242, 0xCAAAAAAA, 0xC0DE0042, 0x08675309]
//! banner: true
//! board:
//!   clock-hz: 1024
//!   run-period: 512
//!   idle-period: 4096
//!   baud: 115200
//!   max-print-len: 2048
//! ```

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::guard::{Guard, GuardPolicy, RegisterSnapshot};

pub mod error;
pub use error::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[derive(Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct GuardConfig {
    pub policy: GuardPolicy,
    pub pattern: RegisterSnapshot,
}

impl From<GuardConfig> for Guard {
    fn from(config: GuardConfig) -> Self {
        Guard::new(config.pattern, config.policy)
    }
}

/// timing and transport parameters of the board collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[derive(Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct BoardConfig {
    /// rtc input clock frequency
    pub clock_hz: u32,
    /// rtc compare value while vectors are being run, in clock ticks
    pub run_period: u64,
    /// rtc compare value once the first pass has completed
    pub idle_period: u64,
    pub baud: u32,
    /// size of the transmit buffer; longer reports are truncated
    pub max_print_len: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            clock_hz: 1024,
            run_period: 512,
            idle_period: 4096,
            baud: 115200,
            max_print_len: 2048,
        }
    }
}

impl BoardConfig {
    /// bytes the serial line moves per rtc clock tick (8N1 framing)
    pub fn bytes_per_tick(&self) -> usize {
        ((self.baud / 10) / self.clock_hz.max(1)).max(1) as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[derive(Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct HarnessConfig {
    pub guard: GuardConfig,
    /// emit the start-up banner on the first tick
    pub banner: bool,
    pub board: BoardConfig,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            guard: GuardConfig::default(),
            banner: true,
            board: BoardConfig::default(),
        }
    }
}

impl HarnessConfig {
    pub fn from_str(input: impl AsRef<str>) -> Result<Self, Error> {
        let config: Self = serde_yaml::from_str(input.as_ref()).map_err(Error::Parse)?;
        config.validate()
    }

    pub fn from_reader(reader: impl Read) -> Result<Self, Error> {
        let config: Self = serde_yaml::from_reader(reader).map_err(Error::Parse)?;
        config.validate()
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let file = BufReader::new(
            File::open(path).map_err(|e| Error::ReadFile(path.to_owned(), e))?,
        );
        let config: Self = serde_yaml::from_reader(file)
            .map_err(|e| Error::ParseFile(path.to_owned(), e))?;
        config.validate()
    }

    pub fn to_yaml(&self) -> Result<String, Error> {
        serde_yaml::to_string(self).map_err(Error::Parse)
    }

    fn validate(self) -> Result<Self, Error> {
        let board = &self.board;
        if board.clock_hz == 0 {
            return Err(Error::Invalid("clock-hz must be non-zero".into()));
        }
        if board.run_period == 0 || board.idle_period == 0 {
            return Err(Error::Invalid("rtc periods must be non-zero".into()));
        }
        if board.baud == 0 {
            return Err(Error::Invalid("baud must be non-zero".into()));
        }
        if board.max_print_len == 0 {
            return Err(Error::Invalid("max-print-len must be non-zero".into()));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guard::DEFAULT_PATTERN;
    use std::io::Cursor;

    const CONFIG: &str = r#"
guard:
  policy: record
  pattern: [1, 2, 3, 4, 5, 6, 7, 8]
banner: false
board:
  run-period: 256
  baud: 9600
"#;

    #[test]
    fn test_yaml_parse() -> anyhow::Result<()> {
        let config = HarnessConfig::from_str(CONFIG)?;

        assert_eq!(config.guard.policy, GuardPolicy::Record);
        assert_eq!(config.guard.pattern, RegisterSnapshot::new([1, 2, 3, 4, 5, 6, 7, 8]));
        assert!(!config.banner);
        assert_eq!(config.board.run_period, 256);
        assert_eq!(config.board.baud, 9600);
        // untouched fields keep their defaults
        assert_eq!(config.board.idle_period, 4096);
        assert_eq!(config.board.clock_hz, 1024);

        let v = HarnessConfig::from_reader(Cursor::new(config.to_yaml()?))?;
        assert_eq!(v, config);

        Ok(())
    }

    #[test]
    fn test_empty_document_is_default() -> anyhow::Result<()> {
        let config = HarnessConfig::from_str("{}")?;
        assert_eq!(config, HarnessConfig::default());
        assert_eq!(config.guard.policy, GuardPolicy::Escalate);
        assert_eq!(*config.guard.pattern.values(), DEFAULT_PATTERN);
        Ok(())
    }

    #[test]
    fn test_invalid_config() {
        let err = HarnessConfig::from_str("board: { run-period: 0 }").unwrap_err();
        assert!(matches!(err, Error::Invalid(_)));

        let err = HarnessConfig::from_str("guard: { policy: ignore }").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));

        let err = HarnessConfig::from_file("/nonexistent/mulcheck.yaml").unwrap_err();
        assert!(matches!(err, Error::ReadFile(..)));
    }

    #[test]
    fn test_bytes_per_tick() {
        let board = BoardConfig::default();
        assert_eq!(board.bytes_per_tick(), 11);

        let slow = BoardConfig { baud: 300, ..BoardConfig::default() };
        assert_eq!(slow.bytes_per_tick(), 1);
    }
}
