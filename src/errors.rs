use thiserror::Error;

#[derive(Error, Debug)]
pub enum TensorizerError {
    #[error("column not found in row: {0}")]
    MissingColumn(String),

    #[error("column {column} is not {expected}")]
    InvalidColumn {
        column: String,
        expected: &'static str,
    },

    #[error("vocabulary has not been initialized")]
    VocabNotInitialized,

    #[error("cannot tensorize an empty batch")]
    EmptyBatch,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Tokenizers error: {0}")]
    TokenizersError(#[from] tokenizers::Error),

    #[error("serde_json error: {0}")]
    SerdeJsonError(#[from] serde_json::Error),

    #[error("NdArray error: {0}")]
    NdArrayError(#[from] ndarray::ShapeError),

    #[error("Regex error: {0}")]
    RegexError(#[from] regex::Error),

    #[error("Value error: {0}")]
    ValueError(String),
}

pub type Result<T> = std::result::Result<T, TensorizerError>;
