use std::sync::LazyLock;

use rayon::prelude::*;
use regex::Regex;
use tracing::debug;

/// Minimum number of texts to consider parallelization
const MIN_TEXTS_FOR_PARALLEL: usize = 100;

/// Minimum total character count to consider parallelization
const MIN_CHARS_FOR_PARALLEL: usize = 10_000;

/// Words of two or more word characters, matching the default pattern the
/// vectorizer was fitted with.
static TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("valid token pattern"));

fn tokenize_text(text: &str, lowercase: bool) -> Vec<String> {
    let words = TOKEN_PATTERN.find_iter(text).map(|m| m.as_str());
    if lowercase {
        words.map(str::to_lowercase).collect()
    } else {
        words.map(str::to_owned).collect()
    }
}

fn tokenize_texts_par<T: AsRef<str> + Sync>(texts: &[T], lowercase: bool) -> Vec<Vec<String>> {
    debug!(num_texts = texts.len(), "Using parallel tokenization");
    texts
        .par_iter()
        .map(|text| tokenize_text(text.as_ref(), lowercase))
        .collect()
}

fn tokenize_texts<T: AsRef<str>>(texts: &[T], lowercase: bool) -> Vec<Vec<String>> {
    texts
        .iter()
        .map(|text| tokenize_text(text.as_ref(), lowercase))
        .collect()
}

/// Determine if parallel processing should be used based on workload characteristics.
///
/// Parallelization is beneficial when:
/// - There are many texts (>= 100), OR
/// - The total character count is large (>= 10,000 chars)
#[inline]
fn should_use_parallel<T: AsRef<str>>(texts: &[T]) -> bool {
    let num_texts = texts.len();

    if num_texts >= MIN_TEXTS_FOR_PARALLEL {
        return true;
    }
    if num_texts <= 1 {
        return false;
    }

    let total_chars: usize = texts.iter().map(|s| s.as_ref().len()).sum();
    total_chars >= MIN_CHARS_FOR_PARALLEL
}

pub fn tokenize<T: AsRef<str> + Sync>(texts: &[T], lowercase: bool) -> Vec<Vec<String>> {
    if should_use_parallel(texts) {
        tokenize_texts_par(texts, lowercase)
    } else {
        tokenize_texts(texts, lowercase)
    }
}
