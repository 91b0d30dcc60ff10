//! channel error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// the receiving end hung up
    #[error("{0} channel emit error: {1}")]
    Emit(&'static str, String),
    #[error("{0} channel: {1} not connected")]
    Disconnected(&'static str, String),
    #[error("{0} channel: no free device slot")]
    Full(&'static str),
}

impl Error {
    pub fn emit(kind: &'static str, err: impl std::fmt::Debug) -> Self {
        Self::Emit(kind, format!("{:?}", err))
    }

    pub fn disconnected(kind: &'static str, end: impl Into<String>) -> Self {
        Self::Disconnected(kind, end.into())
    }
}
