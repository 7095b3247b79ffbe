use std::path::PathBuf;

/// Errors raised while loading levels or configuration
#[derive(thiserror::Error, Debug)]
pub enum BloxorzError {
    /// Level data is structurally inconsistent; no usable board can be built
    #[error("malformed level: {0}")]
    MalformedLevel(String),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl BloxorzError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        BloxorzError::MalformedLevel(msg.into())
    }
}

/// Why a move was refused. The previous block state stays valid.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejected {
    #[error("block would leave the board")]
    OutOfBounds,
    #[error("block would rest on an empty cell")]
    NoFloor,
    #[error("soft floor cannot hold a standing block")]
    SoftFloorBroke,
    #[error("swap is only possible while the block is detached")]
    SwapNotDetached,
}
