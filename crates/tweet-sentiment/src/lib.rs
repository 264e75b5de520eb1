//! # tweet-sentiment
//!
//! Binary sentiment classification (Positive / Negative) for short texts and
//! social media posts.
//!
//! Text is normalized down to the negation words the model was trained on,
//! vectorized with a frozen TF-IDF transform, and classified with a pre-trained
//! linear model. The artifacts are loaded once and shared by every request.
//!
//! ## Quick Start
//!
//! ```no_run
//! use tweet_sentiment::{ArtifactPaths, ClassifierKind, Predictor};
//!
//! let predictor = Predictor::load(&ArtifactPaths::default(), ClassifierKind::Linear)?;
//!
//! let sentiment = predictor.classify("This movie was not good")?;
//! println!("Sentiment: {sentiment}");
//! # Ok::<(), tweet_sentiment::SentimentError>(())
//! ```
//!
//! ## Batch Processing
//!
//! ```no_run
//! use tweet_sentiment::{ArtifactPaths, ClassifierKind, Predictor};
//!
//! let predictor = Predictor::load(&ArtifactPaths::new("models"), ClassifierKind::Linear)?;
//! for result in predictor.analyze_batch(&["I do NOT like this", "Never again"]) {
//!     let analysis = result?;
//!     println!("{} -> {}", analysis.text, analysis.sentiment);
//! }
//! # Ok::<(), tweet_sentiment::SentimentError>(())
//! ```

#[cfg(feature = "cli")]
pub mod cli;

mod error;
pub mod model;
pub mod pipeline;
pub mod posts;
pub mod render;

pub use error::SentimentError;
pub use model::{ArtifactPaths, Classifier, ClassifierKind, LinearClassifier, Vectorizer};
pub use pipeline::{Analysis, Sentiment, decode};
pub use tweet_sentiment_preprocessing::pre_processor::{
    ImportantWords, Stopwords, TextNormalizer, TfidfVectorizer,
};

/// Holds the process-lifetime collaborators and runs the pipeline over them.
///
/// Build one at startup and pass it by reference; nothing in it is mutated
/// after construction.
pub struct Predictor {
    normalizer: TextNormalizer,
    vectorizer: Box<dyn Vectorizer + Send + Sync>,
    classifier: Box<dyn Classifier + Send + Sync>,
}

impl Predictor {
    /// Assemble a predictor from already-loaded parts.
    pub fn new(
        normalizer: TextNormalizer,
        vectorizer: impl Vectorizer + Send + Sync + 'static,
        classifier: impl Classifier + Send + Sync + 'static,
    ) -> Self {
        Self {
            normalizer,
            vectorizer: Box::new(vectorizer),
            classifier: Box::new(classifier),
        }
    }

    /// Load the vectorizer and classifier from `paths` and pair them with the
    /// English normalizer.
    pub fn load(paths: &ArtifactPaths, kind: ClassifierKind) -> Result<Self, SentimentError> {
        let vectorizer = model::load_vectorizer(paths)?;
        let classifier = model::load_classifier(paths, kind)?;
        Ok(Self {
            normalizer: TextNormalizer::english(),
            vectorizer: Box::new(vectorizer),
            classifier,
        })
    }

    /// Replace the normalizer, e.g. with one built from a custom stopword corpus.
    #[must_use]
    pub fn with_normalizer(mut self, normalizer: TextNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    #[must_use]
    pub fn normalizer(&self) -> &TextNormalizer {
        &self.normalizer
    }

    /// Run one text through the pipeline, keeping the intermediate filtered text.
    pub fn analyze<T: AsRef<str>>(&self, text: T) -> Result<Analysis, SentimentError> {
        pipeline::classify(
            &self.normalizer,
            self.vectorizer.as_ref(),
            self.classifier.as_ref(),
            text.as_ref(),
        )
    }

    /// Analyze every text independently; one failure does not affect the others.
    pub fn analyze_batch<T: AsRef<str>>(
        &self,
        texts: &[T],
    ) -> Vec<Result<Analysis, SentimentError>> {
        pipeline::classify_batch(
            &self.normalizer,
            self.vectorizer.as_ref(),
            self.classifier.as_ref(),
            texts,
        )
    }

    /// Classify a single text.
    pub fn classify<T: AsRef<str>>(&self, text: T) -> Result<Sentiment, SentimentError> {
        self.analyze(text).map(|analysis| analysis.sentiment)
    }

    /// Classify multiple texts, failing on the first invalid model output.
    pub fn classify_batch<T: AsRef<str>>(
        &self,
        texts: &[T],
    ) -> Result<Vec<Sentiment>, SentimentError> {
        self.analyze_batch(texts)
            .into_iter()
            .map(|result| result.map(|analysis| analysis.sentiment))
            .collect()
    }
}
