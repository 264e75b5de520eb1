use std::{fs, path::Path};

use ahash::HashSet;
use tracing::debug;

use super::words::ImportantWords;
use crate::PreprocessingError;

/// Language tag of the embedded corpus.
pub const DEFAULT_LANGUAGE: &str = "english";

/// NLTK English stopword list, one word per line.
static ENGLISH_CORPUS: &str = include_str!("corpora/english");

/// Immutable set of common low-information words.
#[derive(Clone, Debug, Default)]
pub struct Stopwords {
    words: HashSet<String>,
}

impl Stopwords {
    /// Stopwords for a language tag. Only `"english"` ships with the crate.
    pub fn for_language(language: &str) -> Result<Self, PreprocessingError> {
        match language.trim().to_ascii_lowercase().as_str() {
            DEFAULT_LANGUAGE => Ok(Self::english()),
            _ => Err(PreprocessingError::UnsupportedLanguage(language.to_owned())),
        }
    }

    /// The full embedded English corpus, negations included.
    #[must_use]
    pub fn english() -> Self {
        Self::from_corpus(ENGLISH_CORPUS)
    }

    /// Parse a corpus with one word per line. Blank lines are skipped.
    #[must_use]
    pub fn from_corpus(corpus: &str) -> Self {
        let words = corpus
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_lowercase)
            .collect::<HashSet<_>>();
        debug!(num_words = words.len(), "Loaded stopword corpus");
        Self { words }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, PreprocessingError> {
        let corpus = fs::read_to_string(path.as_ref())?;
        Ok(Self::from_corpus(&corpus))
    }

    /// Drop every important word from the set.
    ///
    /// The embedded corpus lists `not`, `no`, `nor` and most negation stems, which
    /// the filter must let through.
    #[must_use]
    pub fn excluding(mut self, important_words: &ImportantWords) -> Self {
        self.words.retain(|word| !important_words.contains(word));
        self
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
