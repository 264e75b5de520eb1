mod stopwords;
mod words;

pub use stopwords::{DEFAULT_LANGUAGE, Stopwords};
pub use words::{IMPORTANT_WORDS, ImportantWords};

/// Normalizes raw text and filters it down to the words the classifier sees.
///
/// Both word sets are built once and then only read, so a single normalizer can
/// be shared by every request.
#[derive(Clone, Debug)]
pub struct TextNormalizer {
    stopwords: Stopwords,
    important_words: ImportantWords,
}

impl TextNormalizer {
    #[must_use]
    pub fn new(stopwords: Stopwords, important_words: ImportantWords) -> Self {
        Self {
            stopwords,
            important_words,
        }
    }

    /// English stopwords with the important words taken out.
    #[must_use]
    pub fn english() -> Self {
        let important_words = ImportantWords::new();
        Self::new(
            Stopwords::english().excluding(&important_words),
            important_words,
        )
    }

    /// Split text into lowercase ASCII-alphabetic tokens, in input order.
    ///
    /// Every other character becomes a separator, so `"can't"` yields `"can"` and `"t"`.
    #[must_use]
    pub fn tokenize(text: &str) -> Vec<String> {
        text.chars()
            .map(|c| if c.is_ascii_alphabetic() { c } else { ' ' })
            .collect::<String>()
            .to_ascii_lowercase()
            .split_whitespace()
            .map(str::to_owned)
            .collect()
    }

    /// Produce the space-joined token string that gets vectorized.
    ///
    /// Total over every input; returns an empty string when nothing survives.
    #[must_use]
    pub fn normalize_and_filter(&self, text: &str) -> String {
        Self::tokenize(text)
            .into_iter()
            .filter(|token| self.keep(token))
            .collect::<Vec<_>>()
            .join(" ")
    }

    // Both conditions are kept on purpose. With the default sets the stopword
    // check never rejects anything, but a custom corpus that lists an important
    // word still suppresses it. Confirm with the model owners before collapsing.
    #[inline]
    fn keep(&self, token: &str) -> bool {
        !self.stopwords.contains(token) && self.important_words.contains(token)
    }

    #[must_use]
    pub fn stopwords(&self) -> &Stopwords {
        &self.stopwords
    }

    #[must_use]
    pub fn important_words(&self) -> &ImportantWords {
        &self.important_words
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::english()
    }
}
