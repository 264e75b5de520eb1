use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::debug;
use tweet_sentiment_preprocessing::pre_processor::TfidfVectorizer;

use super::{Classifier, LinearClassifier};
use crate::SentimentError;

/// Directory the artifacts are read from unless overridden.
pub const DEFAULT_MODEL_DIR: &str = "models";

pub const LINEAR_MODEL_FILENAME: &str = "model.json";
pub const ONNX_MODEL_FILENAME: &str = "model.onnx";
pub const VECTORIZER_JSON_FILENAME: &str = "vectorizer.json";
pub const VECTORIZER_BINARY_FILENAME: &str = "vectorizer.bin";

/// Which classifier artifact to load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum ClassifierKind {
    /// Linear model weights in JSON (`model.json`)
    #[default]
    Linear,
    /// Exported ONNX graph (`model.onnx`)
    Onnx,
}

/// Resolves the fixed artifact file names inside a model directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    dir: PathBuf,
}

impl ArtifactPaths {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn linear_model(&self) -> PathBuf {
        self.dir.join(LINEAR_MODEL_FILENAME)
    }

    pub fn onnx_model(&self) -> PathBuf {
        self.dir.join(ONNX_MODEL_FILENAME)
    }

    pub fn classifier(&self, kind: ClassifierKind) -> PathBuf {
        match kind {
            ClassifierKind::Linear => self.linear_model(),
            ClassifierKind::Onnx => self.onnx_model(),
        }
    }

    /// The JSON vectorizer, or the binary one when only that exists.
    pub fn vectorizer(&self) -> PathBuf {
        let json = self.dir.join(VECTORIZER_JSON_FILENAME);
        let binary = self.dir.join(VECTORIZER_BINARY_FILENAME);
        if !json.exists() && binary.exists() {
            binary
        } else {
            json
        }
    }
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL_DIR)
    }
}

fn read_artifact(path: &Path) -> Result<Vec<u8>, SentimentError> {
    fs::read(path).map_err(|source| SentimentError::Artifact {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_vectorizer(paths: &ArtifactPaths) -> Result<TfidfVectorizer, SentimentError> {
    let path = paths.vectorizer();
    debug!(path = %path.display(), "Loading vectorizer");
    let bytes = read_artifact(&path)?;
    let is_binary = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("bin"));
    let vectorizer = if is_binary {
        TfidfVectorizer::from_bytes(&bytes)?
    } else {
        TfidfVectorizer::from_json_slice(&bytes)?
    };
    Ok(vectorizer)
}

pub fn load_classifier(
    paths: &ArtifactPaths,
    kind: ClassifierKind,
) -> Result<Box<dyn Classifier + Send + Sync>, SentimentError> {
    let path = paths.classifier(kind);
    debug!(path = %path.display(), ?kind, "Loading classifier");
    match kind {
        ClassifierKind::Linear => Ok(Box::new(LinearClassifier::from_json_slice(
            &read_artifact(&path)?,
        )?)),
        #[cfg(feature = "onnx")]
        ClassifierKind::Onnx => {
            let bytes = read_artifact(&path)?;
            Ok(Box::new(super::OnnxClassifier::from_memory(&bytes)?))
        }
        #[cfg(not(feature = "onnx"))]
        ClassifierKind::Onnx => Err(SentimentError::Unsupported("onnx")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        let paths = ArtifactPaths::default();
        assert_eq!(paths.dir(), Path::new("models"));
        assert_eq!(paths.linear_model(), Path::new("models/model.json"));
        assert_eq!(
            paths.classifier(ClassifierKind::Onnx),
            Path::new("models/model.onnx")
        );
    }

    #[test]
    fn test_vectorizer_prefers_json() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ArtifactPaths::new(dir.path());
        assert_eq!(paths.vectorizer(), dir.path().join(VECTORIZER_JSON_FILENAME));

        fs::write(dir.path().join(VECTORIZER_BINARY_FILENAME), b"").unwrap();
        assert_eq!(
            paths.vectorizer(),
            dir.path().join(VECTORIZER_BINARY_FILENAME)
        );

        fs::write(dir.path().join(VECTORIZER_JSON_FILENAME), b"{}").unwrap();
        assert_eq!(paths.vectorizer(), dir.path().join(VECTORIZER_JSON_FILENAME));
    }

    #[test]
    fn test_missing_artifacts() {
        let paths = ArtifactPaths::new("/no/such/dir");
        assert!(matches!(
            load_vectorizer(&paths),
            Err(SentimentError::Artifact { .. })
        ));
        assert!(matches!(
            load_classifier(&paths, ClassifierKind::Linear),
            Err(SentimentError::Artifact { .. })
        ));
    }

    #[cfg(not(feature = "onnx"))]
    #[test]
    fn test_onnx_not_compiled_in() {
        let paths = ArtifactPaths::new("/no/such/dir");
        assert!(matches!(
            load_classifier(&paths, ClassifierKind::Onnx),
            Err(SentimentError::Unsupported("onnx"))
        ));
    }
}
