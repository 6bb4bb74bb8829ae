use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Converter is not implemented: {0}")]
    NoSuchConverter(String),

    #[error("Image provided must resolve to an image with positive width and height: {0}")]
    IncorrectImageFormat(String),

    #[error("Input data provided must be a mapping: {0}")]
    IncorrectInputDataFormat(String),

    #[error("Input data looks empty. Did you provide the correct data?")]
    EmptyInputData,

    #[error("Input data incorrectly formatted: {0}")]
    IncorrectlyFormattedInputData(String),

    #[error("A specified URL must be a string, got {0}")]
    IncorrectURLFormat(String),

    #[error("Cannot handle multi-page ABBYY results ({0} pages)")]
    MultipageAbbyy(usize),

    #[error("Paragraph {paragraph} references {references} blocks, expected exactly one")]
    MultipleBlocks { paragraph: usize, references: usize },

    #[error("per_level should be an integer, got {0}")]
    PerLevelIncorrect(String),

    #[error("Incorrect Tesseract level provided: {0}")]
    InvalidLevel(i64),

    #[error("Invalid conversion options: {0}")]
    InvalidOptions(String),

    #[error("Field `{field}` is not an integer: {value}")]
    NotAnInteger { field: String, value: String },

    #[error("Expected text to be a string in `{field}`, got {value}")]
    NonStringText { field: String, value: String },

    #[error("Invalid confidence value at row {row}: {value}")]
    InvalidConfidence { row: usize, value: String },

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("{url} returned status code {status}")]
    HttpStatus { url: String, status: u16 },
}

pub type Result<T> = std::result::Result<T, ConvertError>;

impl ConvertError {
    /// Shorthand for structural problems found while walking a document
    pub fn malformed(message: impl Into<String>) -> Self {
        ConvertError::IncorrectlyFormattedInputData(message.into())
    }

    /// Whether the error comes from input validation rather than from a collaborator
    pub fn is_validation(&self) -> bool {
        !matches!(
            self,
            ConvertError::Io(_) | ConvertError::Http(_) | ConvertError::HttpStatus { .. }
        )
    }
}
