use std::path::PathBuf;

use thiserror::Error;
use tweet_sentiment_preprocessing::PreprocessingError;

#[derive(Debug, Error)]
pub enum SentimentError {
    /// The classifier produced a label outside the trained `{0, 1}` encoding.
    #[error("classifier returned label {0}, expected 0 (Negative) or 1 (Positive)")]
    InvalidModelOutput(i64),
    #[error("classifier returned no label for the input")]
    EmptyModelOutput,
    #[error("feature vector has {found} columns but the classifier expects {expected}")]
    FeatureMismatch { expected: usize, found: usize },
    #[error("invalid classifier artifact: {0}")]
    InvalidClassifier(String),
    #[error("failed to read artifact '{}': {source}", path.display())]
    Artifact {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Preprocessing(#[from] PreprocessingError),
    #[error("failed to decode classifier JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0} classifier support is not compiled in")]
    Unsupported(&'static str),
    #[error("classifier session is unavailable: {0}")]
    SessionUnavailable(String),
    #[cfg(feature = "onnx")]
    #[error(transparent)]
    Onnx(#[from] ort::Error),
}

impl SentimentError {
    /// True for failures caused by the model's output rather than by loading or I/O.
    #[must_use]
    pub fn is_model_output(&self) -> bool {
        matches!(
            self,
            Self::InvalidModelOutput(_) | Self::EmptyModelOutput | Self::FeatureMismatch { .. }
        )
    }
}
