mod ngrams;
mod params;
mod tfidf_vectorizer;
mod tokenizer;

pub use params::{Norm, VectorizerParams};
pub use tfidf_vectorizer::TfidfVectorizer;
