use std::path::PathBuf;
use thiserror::Error;

/// Errors that can happen outside the frame loop. Nothing in the scheduler,
/// lighting or vignette core is fallible.
#[derive(Error, Debug)]
pub enum Error {
    #[error("sound '{name}' is unavailable: {reason}")]
    ResourceUnavailable { name: String, reason: String },

    #[error("invalid config file {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
