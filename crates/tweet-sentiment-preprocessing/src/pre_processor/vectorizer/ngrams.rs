use ahash::AHashMap as HashMap;

/// Count word n-grams for every `n` in `min_n..=max_n`. Multi-word n-grams are
/// keyed by their words joined with a single space.
pub fn count_ngrams(tokens: &[String], (min_n, max_n): (usize, usize)) -> HashMap<String, usize> {
    let mut ngram_counter = HashMap::new();

    for n in min_n.max(1)..=max_n {
        for window in tokens.windows(n) {
            *ngram_counter.entry(window.join(" ")).or_insert(0) += 1;
        }
    }
    ngram_counter
}
