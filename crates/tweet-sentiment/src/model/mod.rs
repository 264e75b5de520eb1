use sprs::CsMat;
use tweet_sentiment_preprocessing::pre_processor::TfidfVectorizer;

use crate::SentimentError;

mod artifacts;
mod linear;
#[cfg(feature = "onnx")]
mod onnx;

pub use artifacts::{
    ArtifactPaths, ClassifierKind, DEFAULT_MODEL_DIR, LINEAR_MODEL_FILENAME, ONNX_MODEL_FILENAME,
    VECTORIZER_BINARY_FILENAME, VECTORIZER_JSON_FILENAME, load_classifier, load_vectorizer,
};
pub use linear::LinearClassifier;
#[cfg(feature = "onnx")]
pub use onnx::OnnxClassifier;

/// A pre-fitted transform from documents to a sparse feature batch.
pub trait Vectorizer {
    /// One CSR row per document, in input order.
    fn transform(&self, documents: &[&str]) -> CsMat<f64>;
}

impl Vectorizer for TfidfVectorizer {
    fn transform(&self, documents: &[&str]) -> CsMat<f64> {
        TfidfVectorizer::transform(self, documents)
    }
}

/// A pre-trained binary model producing one raw label per feature row.
pub trait Classifier {
    fn predict(&self, features: &CsMat<f64>) -> Result<Vec<i64>, SentimentError>;
}
