//! Pre-processing for tweet-sentiment
//!
//! Turns raw text into the filtered token string the classifier was trained on,
//! and vectorizes it with a frozen TF-IDF transform.

mod error;
pub mod pre_processor;

pub use error::PreprocessingError;
