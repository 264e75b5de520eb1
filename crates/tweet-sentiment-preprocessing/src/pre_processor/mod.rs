mod normalizer;
mod vectorizer;

pub use normalizer::{
    DEFAULT_LANGUAGE, IMPORTANT_WORDS, ImportantWords, Stopwords, TextNormalizer,
};
pub use vectorizer::{Norm, TfidfVectorizer, VectorizerParams};
