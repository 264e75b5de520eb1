use ahash::{HashMap, HashSet};
use sprs::CsMat;
use tracing::debug;

use super::{
    ngrams,
    params::{Norm, VectorizerParams},
    tokenizer,
};
use crate::PreprocessingError;

/// A fitted TF-IDF transform restored from persisted state.
///
/// The vocabulary and IDF weights are frozen at training time; this type only
/// transforms, it never refits.
#[cfg_attr(feature = "bincode", derive(bincode::Encode, bincode::Decode))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug)]
pub struct TfidfVectorizer {
    #[cfg_attr(feature = "serde", serde(default))]
    params: VectorizerParams,
    /// Term (or space-joined n-gram) to feature index
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    pub fn from_parts(
        vocabulary: HashMap<String, usize>,
        idf: Vec<f64>,
        params: VectorizerParams,
    ) -> Result<Self, PreprocessingError> {
        let vectorizer = Self {
            params,
            vocabulary,
            idf,
        };
        vectorizer.validate()?;
        Ok(vectorizer)
    }

    #[cfg(feature = "serde")]
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, PreprocessingError> {
        let vectorizer: Self = serde_json::from_slice(bytes)?;
        vectorizer.validate()?;
        debug!(
            num_features = vectorizer.num_features(),
            "Loaded TfidfVectorizer from JSON"
        );
        Ok(vectorizer)
    }

    #[cfg(feature = "bincode")]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PreprocessingError> {
        let (vectorizer, _): (Self, usize) =
            bincode::decode_from_slice(bytes, bincode::config::standard())?;
        vectorizer.validate()?;
        debug!(
            num_features = vectorizer.num_features(),
            "Loaded TfidfVectorizer from bytes"
        );
        Ok(vectorizer)
    }

    #[cfg(feature = "bincode")]
    pub fn to_bytes(&self) -> Result<Vec<u8>, PreprocessingError> {
        Ok(bincode::encode_to_vec(self, bincode::config::standard())?)
    }

    fn validate(&self) -> Result<(), PreprocessingError> {
        self.params.validate()?;
        if self.vocabulary.is_empty() {
            return Err(PreprocessingError::InvalidVectorizer(
                "vocabulary is empty".to_owned(),
            ));
        }
        if self.idf.len() != self.vocabulary.len() {
            return Err(PreprocessingError::InvalidVectorizer(format!(
                "{} idf weights for a vocabulary of {} terms",
                self.idf.len(),
                self.vocabulary.len()
            )));
        }
        let mut seen = HashSet::default();
        for (term, &idx) in &self.vocabulary {
            if idx >= self.idf.len() {
                return Err(PreprocessingError::InvalidVectorizer(format!(
                    "term '{term}' maps to feature {idx}, outside 0..{}",
                    self.idf.len()
                )));
            }
            if !seen.insert(idx) {
                return Err(PreprocessingError::InvalidVectorizer(format!(
                    "term '{term}' maps to feature {idx}, which another term already uses"
                )));
            }
        }
        // Unique indices below idf.len() and equal counts mean 0..idf.len() is covered.
        if let Some(idx) = self.idf.iter().position(|w| !w.is_finite()) {
            return Err(PreprocessingError::InvalidVectorizer(format!(
                "idf weight for feature {idx} is not finite"
            )));
        }
        Ok(())
    }

    /// Transform documents into an L2-normalized (by default) TF-IDF matrix,
    /// one CSR row per document. Terms outside the vocabulary are ignored.
    pub fn transform<T: AsRef<str> + Sync>(&self, texts: &[T]) -> CsMat<f64> {
        debug!(
            num_texts = texts.len(),
            "Transforming texts using TfidfVectorizer"
        );
        let tokenized_texts = tokenizer::tokenize(texts, self.params.lowercase());

        let mut indptr = Vec::with_capacity(texts.len() + 1);
        let mut indices = Vec::new();
        let mut data = Vec::new();
        indptr.push(0);

        for tokens in &tokenized_texts {
            let ngrams = ngrams::count_ngrams(tokens, self.params.ngram_range());
            let mut row_entries = ngrams
                .iter()
                .filter_map(|(ngram, &count)| {
                    self.vocabulary
                        .get(ngram)
                        .map(|&col_idx| (col_idx, self.weight(col_idx, count)))
                })
                .collect::<Vec<_>>();
            row_entries.sort_by_key(|(col_idx, _)| *col_idx);
            self.normalize(&mut row_entries);

            for (col_idx, value) in row_entries {
                indices.push(col_idx);
                data.push(value);
            }
            indptr.push(indices.len());
        }

        debug!(non_zero_entries = data.len(), "Text transformation complete");
        CsMat::new((texts.len(), self.num_features()), indptr, indices, data)
    }

    #[allow(clippy::cast_precision_loss)]
    fn weight(&self, col_idx: usize, count: usize) -> f64 {
        let tf = count as f64;
        let tf = if self.params.sublinear_tf() {
            1.0 + tf.ln()
        } else {
            tf
        };
        tf * self.idf[col_idx]
    }

    fn normalize(&self, row: &mut [(usize, f64)]) {
        let norm = match self.params.norm() {
            Some(Norm::L2) => row.iter().map(|(_, v)| v * v).sum::<f64>().sqrt(),
            Some(Norm::L1) => row.iter().map(|(_, v)| v.abs()).sum::<f64>(),
            None => return,
        };
        if norm > 0.0 {
            for (_, value) in row.iter_mut() {
                *value /= norm;
            }
        }
    }

    pub fn num_features(&self) -> usize {
        self.idf.len()
    }

    pub fn vocabulary(&self) -> &HashMap<String, usize> {
        &self.vocabulary
    }

    pub fn idf(&self) -> &[f64] {
        &self.idf
    }

    pub fn params(&self) -> &VectorizerParams {
        &self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TERMS: [&str; 4] = ["cannot", "never", "no", "not"];
    const IDF: [f64; 4] = [2.0, 1.5, 1.2, 1.0];

    fn vectorizer(params: VectorizerParams) -> TfidfVectorizer {
        let vocabulary = TERMS
            .iter()
            .enumerate()
            .map(|(idx, term)| ((*term).to_owned(), idx))
            .collect();
        TfidfVectorizer::from_parts(vocabulary, IDF.to_vec(), params).unwrap()
    }

    fn row(matrix: &CsMat<f64>, idx: usize) -> Vec<(usize, f64)> {
        matrix
            .outer_view(idx)
            .unwrap()
            .iter()
            .map(|(col, &v)| (col, v))
            .collect()
    }

    #[test]
    fn test_single_term_is_unit_length() {
        let matrix = vectorizer(VectorizerParams::default()).transform(&["not"]);
        assert_eq!(matrix.shape(), (1, 4));
        assert_eq!(row(&matrix, 0), vec![(3, 1.0)]);
    }

    #[test]
    fn test_l2_weighting() {
        let matrix = vectorizer(VectorizerParams::default()).transform(&["never not not"]);
        let entries = row(&matrix, 0);
        // never: 1 * 1.5, not: 2 * 1.0, norm 2.5
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0, 1);
        assert!((entries[0].1 - 0.6).abs() < 1e-12);
        assert_eq!(entries[1].0, 3);
        assert!((entries[1].1 - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_l1_and_unnormalized() {
        let l1 = vectorizer(VectorizerParams::new(1..=1, true, false, Some(Norm::L1)));
        let entries = row(&l1.transform(&["never not not"]), 0);
        assert!((entries[0].1 - 1.5 / 3.5).abs() < 1e-12);
        assert!((entries[1].1 - 2.0 / 3.5).abs() < 1e-12);

        let raw = vectorizer(VectorizerParams::new(1..=1, true, false, None));
        assert_eq!(
            row(&raw.transform(&["never not not"]), 0),
            vec![(1, 1.5), (3, 2.0)]
        );
    }

    #[test]
    fn test_sublinear_tf() {
        let raw = vectorizer(VectorizerParams::new(1..=1, true, true, None));
        let entries = row(&raw.transform(&["not not not"]), 0);
        assert!((entries[0].1 - (1.0 + 3.0_f64.ln())).abs() < 1e-12);
    }

    #[test]
    fn test_empty_and_unknown_documents_give_empty_rows() {
        let matrix = vectorizer(VectorizerParams::default()).transform(&["", "good movie", "NOT"]);
        assert_eq!(matrix.shape(), (3, 4));
        assert_eq!(matrix.nnz(), 1);
        assert!(row(&matrix, 0).is_empty());
        assert!(row(&matrix, 1).is_empty());
        assert_eq!(row(&matrix, 2), vec![(3, 1.0)]);
    }

    #[test]
    fn test_bigrams() {
        let vocabulary = [("not", 0), ("not good", 1), ("good", 2)]
            .into_iter()
            .map(|(term, idx)| (term.to_owned(), idx))
            .collect();
        let vectorizer = TfidfVectorizer::from_parts(
            vocabulary,
            vec![1.0, 1.0, 1.0],
            VectorizerParams::new(1..=2, true, false, None),
        )
        .unwrap();
        let entries = row(&vectorizer.transform(&["not good"]), 0);
        assert_eq!(entries, vec![(0, 1.0), (1, 1.0), (2, 1.0)]);
    }

    #[test]
    fn test_batch_rows_match_single_transforms() {
        let vectorizer = vectorizer(VectorizerParams::default());
        let texts = (0..120)
            .map(|i| match i % 3 {
                0 => "not never".to_owned(),
                1 => "no no cannot".to_owned(),
                _ => String::new(),
            })
            .collect::<Vec<_>>();
        let batch = vectorizer.transform(&texts);
        assert_eq!(batch.rows(), texts.len());
        for (idx, text) in texts.iter().enumerate() {
            assert_eq!(row(&batch, idx), row(&vectorizer.transform(&[text]), 0));
        }
    }

    #[test]
    fn test_rejects_inconsistent_state() {
        let vocabulary: HashMap<String, usize> =
            [("not".to_owned(), 0), ("never".to_owned(), 1)].into_iter().collect();

        let short_idf =
            TfidfVectorizer::from_parts(vocabulary.clone(), vec![1.0], VectorizerParams::default());
        assert!(matches!(
            short_idf,
            Err(PreprocessingError::InvalidVectorizer(_))
        ));

        let mut out_of_range = vocabulary;
        out_of_range.insert("never".to_owned(), 5);
        let result =
            TfidfVectorizer::from_parts(out_of_range, vec![1.0, 1.0], VectorizerParams::default());
        assert!(matches!(result, Err(PreprocessingError::InvalidVectorizer(_))));

        let empty = TfidfVectorizer::from_parts(
            HashMap::default(),
            Vec::new(),
            VectorizerParams::default(),
        );
        assert!(empty.is_err());

        let non_finite = TfidfVectorizer::from_parts(
            vocabulary_of(&[("not", 0), ("never", 1)]),
            vec![1.0, f64::NAN],
            VectorizerParams::default(),
        );
        assert!(matches!(
            non_finite,
            Err(PreprocessingError::InvalidVectorizer(_))
        ));
    }

    fn vocabulary_of(entries: &[(&str, usize)]) -> HashMap<String, usize> {
        entries
            .iter()
            .map(|&(term, idx)| (term.to_owned(), idx))
            .collect()
    }

    #[test]
    fn test_rejects_duplicate_indices() {
        let shared = TfidfVectorizer::from_parts(
            vocabulary_of(&[("not", 0), ("never", 0)]),
            vec![1.0, 1.0],
            VectorizerParams::default(),
        );
        assert!(matches!(shared, Err(PreprocessingError::InvalidVectorizer(_))));

        let infinite = TfidfVectorizer::from_parts(
            vocabulary_of(&[("not", 0)]),
            vec![f64::INFINITY],
            VectorizerParams::default(),
        );
        assert!(infinite.is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_json_with_shared_column_fails_to_load() {
        let json = br#"{"vocabulary": {"not": 0, "never": 0}, "idf": [1.0, 1.0]}"#;
        assert!(matches!(
            TfidfVectorizer::from_json_slice(json),
            Err(PreprocessingError::InvalidVectorizer(_))
        ));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_from_json_slice() {
        let json = br#"{
            "vocabulary": {"not": 1, "never": 0},
            "idf": [1.5, 1.0],
            "params": {"ngram_range": [1, 1], "norm": "l2"}
        }"#;
        let vectorizer = TfidfVectorizer::from_json_slice(json).unwrap();
        assert_eq!(vectorizer.num_features(), 2);
        assert_eq!(row(&vectorizer.transform(&["not"]), 0), vec![(1, 1.0)]);

        let bad = br#"{"vocabulary": {"not": 3}, "idf": [1.0]}"#;
        assert!(TfidfVectorizer::from_json_slice(bad).is_err());
    }

    #[cfg(feature = "bincode")]
    #[test]
    fn test_bytes_restore_the_same_transform() {
        let original = vectorizer(VectorizerParams::new(1..=2, true, true, Some(Norm::L1)));
        let restored = TfidfVectorizer::from_bytes(&original.to_bytes().unwrap()).unwrap();
        assert_eq!(restored.params(), original.params());
        assert_eq!(
            row(&restored.transform(&["no not never"]), 0),
            row(&original.transform(&["no not never"]), 0)
        );
    }
}
