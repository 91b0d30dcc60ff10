//! configuration errors

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot parse configuration: {0}")]
    Parse(serde_yaml::Error),
    #[error("cannot parse configuration from `{0}`: {1}")]
    ParseFile(PathBuf, serde_yaml::Error),
    #[error("cannot read configuration from `{0}`: {1}")]
    ReadFile(PathBuf, io::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
