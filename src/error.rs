use std::io;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("invalid frame on line {line}: {reason}")]
    InvalidFrame { line: usize, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
