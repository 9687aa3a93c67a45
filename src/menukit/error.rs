use thiserror::Error;

#[derive(Error, Debug)]
pub enum MenuError {
    /// The raw document text is not a well-formed menu document.
    #[error("Invalid menu document: {0}")]
    Format(String),

    #[error("Duplicate section name: {0}")]
    DuplicateName(String),

    #[error("Section not found: {0}")]
    SectionNotFound(String),

    /// Save was requested while no file path is bound to the document.
    #[error("No file path is bound to the document")]
    NoPath,

    #[error("Transfer error: {0}")]
    Transfer(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MenuError>;
