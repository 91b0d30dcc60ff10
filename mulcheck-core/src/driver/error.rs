//! driver errors

use thiserror::Error;

/// the verification logic itself never fails; the only errors a step
/// can produce come from the report collaborator
#[derive(Debug, Error)]
pub enum Error {
    #[error("report transport error: {0}")]
    Transport(anyhow::Error),
}

impl Error {
    /// wrap a sink failure
    pub fn transport<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Transport(anyhow::Error::new(err))
    }
}
