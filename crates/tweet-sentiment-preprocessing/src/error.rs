use thiserror::Error;

#[derive(Debug, Error)]
pub enum PreprocessingError {
    #[error("no stopword corpus available for language '{0}'")]
    UnsupportedLanguage(String),
    #[error("invalid vectorizer state: {0}")]
    InvalidVectorizer(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[cfg(feature = "serde")]
    #[error("failed to decode vectorizer JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[cfg(feature = "bincode")]
    #[error("failed to decode vectorizer bytes: {0}")]
    Decode(#[from] bincode::error::DecodeError),
    #[cfg(feature = "bincode")]
    #[error("failed to encode vectorizer: {0}")]
    Encode(#[from] bincode::error::EncodeError),
}
