use ahash::HashSet;

/// Negations and other sentiment-bearing function words that survive filtering.
///
/// Most of these are ordinary stopwords. This table decides which of them still
/// reach the classifier, so it has to match the list the model was trained with.
pub const IMPORTANT_WORDS: &[&str] = &[
    "no", "not", "nor", "don't", "doesn't", "didn't", "hadn't", "hasn't", "haven't", "isn't",
    "mightn't", "mustn't", "needn't", "shan't", "shouldn't", "wasn't", "weren't", "won't",
    "wouldn't", "can't", "couldn't", "ain", "aren", "doesn", "didn", "hadn", "hasn", "haven",
    "isn", "mightn", "mustn", "needn", "shan", "shouldn", "wasn", "weren", "won", "wouldn",
    "cannot", "never",
];

/// Immutable lookup set over [`IMPORTANT_WORDS`].
#[derive(Clone, Debug)]
pub struct ImportantWords(HashSet<&'static str>);

impl ImportantWords {
    #[must_use]
    pub fn new() -> Self {
        Self(IMPORTANT_WORDS.iter().copied().collect())
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, word: &str) -> bool {
        self.0.contains(word)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for ImportantWords {
    fn default() -> Self {
        Self::new()
    }
}
