use std::path::PathBuf;

use marquee_input::InputError;
use marquee_style::StyleError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Style(#[from] StyleError),

    #[error("Unable to write to output: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed command name or alias.
    #[error("{0}")]
    InvalidArgument(String),

    #[error("invalid command manifest: {0}")]
    Manifest(#[from] serde_json::Error),

    #[error("failed to read command manifest {}: {source}", path.display())]
    ManifestIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failure reported by a command's own logic.
    #[error("{0}")]
    Failed(String),
}

impl Error {
    pub fn failed(msg: impl Into<String>) -> Self {
        Self::Failed(msg.into())
    }
}
