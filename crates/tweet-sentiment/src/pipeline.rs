use core::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;
use tweet_sentiment_preprocessing::pre_processor::TextNormalizer;

use crate::{
    SentimentError,
    model::{Classifier, Vectorizer},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    Negative,
    Positive,
}

impl Sentiment {
    #[must_use]
    pub fn is_positive(&self) -> bool {
        matches!(self, Self::Positive)
    }

    #[must_use]
    pub fn is_negative(&self) -> bool {
        matches!(self, Self::Negative)
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Negative => "Negative",
            Self::Positive => "Positive",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The label encoding is fixed by the trained model: 0 is Negative, 1 is Positive.
impl TryFrom<i64> for Sentiment {
    type Error = SentimentError;

    fn try_from(label: i64) -> Result<Self, Self::Error> {
        match label {
            0 => Ok(Self::Negative),
            1 => Ok(Self::Positive),
            other => Err(SentimentError::InvalidModelOutput(other)),
        }
    }
}

impl From<Sentiment> for i64 {
    fn from(sentiment: Sentiment) -> Self {
        match sentiment {
            Sentiment::Negative => 0,
            Sentiment::Positive => 1,
        }
    }
}

/// Map a raw classifier label to a [`Sentiment`].
pub fn decode(label: i64) -> Result<Sentiment, SentimentError> {
    Sentiment::try_from(label)
}

/// Result of running one text through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    /// The input as supplied
    pub text: String,
    /// What reached the vectorizer after normalization and filtering
    pub filtered: String,
    pub sentiment: Sentiment,
}

/// Normalize, vectorize, predict and decode a single text.
///
/// An empty filtered string is still classified; the model's answer for an
/// all-zero feature row is returned as-is.
pub fn classify<V, C>(
    normalizer: &TextNormalizer,
    vectorizer: &V,
    classifier: &C,
    text: &str,
) -> Result<Analysis, SentimentError>
where
    V: Vectorizer + ?Sized,
    C: Classifier + ?Sized,
{
    let filtered = normalizer.normalize_and_filter(text);
    debug!(filtered = %filtered, "Normalized input text");

    let features = vectorizer.transform(&[filtered.as_str()]);
    let label = classifier
        .predict(&features)?
        .first()
        .copied()
        .ok_or(SentimentError::EmptyModelOutput)?;

    Ok(Analysis {
        text: text.to_owned(),
        filtered,
        sentiment: decode(label)?,
    })
}

/// Run every text through [`classify`] independently, preserving input order.
/// A failure affects only its own entry.
pub fn classify_batch<V, C, T>(
    normalizer: &TextNormalizer,
    vectorizer: &V,
    classifier: &C,
    texts: &[T],
) -> Vec<Result<Analysis, SentimentError>>
where
    V: Vectorizer + ?Sized,
    C: Classifier + ?Sized,
    T: AsRef<str>,
{
    texts
        .iter()
        .map(|text| classify(normalizer, vectorizer, classifier, text.as_ref()))
        .collect()
}
