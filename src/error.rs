use thiserror::Error;

/// All errors that the crate can generate
#[derive(Error, Debug)]
pub enum PlacardError {
    #[error(transparent)]
    /// An I/O error occurred
    Io(#[from] std::io::Error),

    #[error(transparent)]
    /// [owned_ttf_parser] failed to parse a user font
    FaceParsing(#[from] owned_ttf_parser::FaceParsingError),

    #[error(transparent)]
    /// [image] failed to decode or encode an image
    Image(#[from] image::ImageError),

    #[error(transparent)]
    /// A style, profile or record file was not valid JSON
    Json(#[from] serde_json::Error),

    #[error("unsupported input format: {0}")]
    /// The tabular reader does not know how to read this file
    UnsupportedFormat(String),

    #[error("missing required column: {0}")]
    /// The input file has no column mapping to a required record field
    MissingColumn(&'static str),

    #[error("no valid records to render")]
    /// Every record in a batch failed validation
    NoValidRecords,

    #[error("record index {index} is out of range ({total} records)")]
    IndexOutOfRange { index: usize, total: usize },

    #[error("invalid colour: {0}")]
    InvalidColour(String),

    #[error("profile not found: {0}")]
    ProfileNotFound(String),

    #[error("invalid profile name: {0:?}")]
    InvalidProfileName(String),

    #[error("page missing from document")]
    PageMissing,
}

/// Result type for placard operations
pub type Result<T> = std::result::Result<T, PlacardError>;
