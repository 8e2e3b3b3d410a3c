//! Error types for yCheck2 processing.

use thiserror::Error;

/// Primary error type for archive extraction, command interpretation and
/// PDF serialization.
#[derive(Error, Debug)]
pub enum YCheckError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("archive contains no extractable member")]
    EmptyArchive,

    #[error("malformed command file: {0}")]
    CommandFile(#[from] csv::Error),

    #[error("{opcode}: expected a numeric argument, got {value:?}")]
    InvalidNumber { opcode: String, value: String },

    #[error("{opcode}: missing argument {index}")]
    MissingArgument { opcode: String, index: usize },

    #[error("font family not registered: {0}")]
    UnknownFont(String),

    #[error("no font selected before drawing")]
    NoFontSelected,

    #[error("failed to load font {family:?}: {reason}")]
    FontLoad { family: String, reason: String },

    #[error("pdf error: {0}")]
    Pdf(#[from] lopdf::Error),
}

/// Convenience Result type alias for YCheckError.
pub type Result<T> = std::result::Result<T, YCheckError>;
