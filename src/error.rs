use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid suffix format: {0:?}")]
    InvalidSuffixFormat(String),

    #[error("Invalid log level: {0:?}")]
    InvalidLevel(String),

    /// The live log file could not be opened after its directory was secured.
    /// The write path treats this as fatal.
    #[error("Unable to open log file {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
