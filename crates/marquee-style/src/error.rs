use std::path::PathBuf;

use thiserror::Error;

pub type StyleResult<T> = Result<T, StyleError>;

#[derive(Debug, Error)]
pub enum StyleError {
    /// Unknown color, option or style name.
    #[error("{0}")]
    InvalidArgument(String),

    #[error("invalid style sheet: {0}")]
    Config(#[from] serde_json::Error),

    #[error("failed to read style sheet {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
