use thiserror::Error;

/// Everything that can go wrong while measuring palette coverage.
///
/// None of these are transient, so nothing in the crate retries.
#[derive(Debug, Error)]
pub enum CoverageError {
    #[error("Invalid palette: {0}")]
    InvalidPalette(String),

    #[error("Palette has no entries")]
    EmptyPalette,

    #[error("Image has no pixels")]
    EmptyImage,

    #[error("Unable to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Invalid color {input:?}: {reason}")]
    ParseColor { input: String, reason: String },

    #[error("Invalid palette config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, CoverageError>;
