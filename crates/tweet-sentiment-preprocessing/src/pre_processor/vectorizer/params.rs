use std::ops::RangeInclusive;

use crate::PreprocessingError;

/// Row normalization applied after IDF weighting.
#[cfg_attr(feature = "bincode", derive(bincode::Encode, bincode::Decode))]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Norm {
    L1,
    #[default]
    L2,
}

#[cfg_attr(feature = "bincode", derive(bincode::Encode, bincode::Decode))]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
#[derive(Clone, Debug, PartialEq)]
pub struct VectorizerParams {
    ngram_range: (usize, usize),
    /// Lowercase documents before tokenizing.
    lowercase: bool,
    /// Apply sublinear tf scaling: replace term frequency `tf` with `1 + ln(tf)`.
    sublinear_tf: bool,
    /// `None` leaves rows unnormalized.
    norm: Option<Norm>,
}

impl VectorizerParams {
    pub fn new(
        ngram_range: impl Into<RangeInclusive<usize>>,
        lowercase: bool,
        sublinear_tf: bool,
        norm: Option<Norm>,
    ) -> Self {
        let range = ngram_range.into();
        assert!(
            *range.start() >= 1 && range.start() <= range.end(),
            "ngram_range must be non-empty and start at 1 or above"
        );
        Self {
            ngram_range: (*range.start(), *range.end()),
            lowercase,
            sublinear_tf,
            norm,
        }
    }

    /// Check parameters that arrived through deserialization.
    pub fn validate(&self) -> Result<(), PreprocessingError> {
        let (min_n, max_n) = self.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(PreprocessingError::InvalidVectorizer(format!(
                "ngram_range ({min_n}, {max_n}) is empty or starts at zero"
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn ngram_range(&self) -> (usize, usize) {
        self.ngram_range
    }

    #[must_use]
    pub fn lowercase(&self) -> bool {
        self.lowercase
    }

    #[must_use]
    pub fn sublinear_tf(&self) -> bool {
        self.sublinear_tf
    }

    #[must_use]
    pub fn norm(&self) -> Option<Norm> {
        self.norm
    }
}

impl Default for VectorizerParams {
    fn default() -> Self {
        Self {
            ngram_range: (1, 1),
            lowercase: true,
            sublinear_tf: false,
            norm: Some(Norm::L2),
        }
    }
}
