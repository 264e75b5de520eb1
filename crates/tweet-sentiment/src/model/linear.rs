use std::{borrow::Cow, fs, path::Path};

use serde::{Deserialize, Serialize};
use sprs::CsMat;
use tracing::debug;

use super::Classifier;
use crate::SentimentError;

/// Binary linear model: `label = classes[1]` when `intercept + coef · x > 0`,
/// otherwise `classes[0]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LinearModelState", into = "LinearModelState")]
pub struct LinearClassifier {
    coef: Vec<f64>,
    intercept: f64,
    classes: [i64; 2],
}

/// On-disk layout, shaped like an exported scikit-learn binary linear model:
/// `coef` has one row and `intercept` one value.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct LinearModelState {
    coef: Vec<Vec<f64>>,
    intercept: Vec<f64>,
    #[serde(default = "default_classes")]
    classes: Vec<i64>,
}

fn default_classes() -> Vec<i64> {
    vec![0, 1]
}

impl TryFrom<LinearModelState> for LinearClassifier {
    type Error = SentimentError;

    fn try_from(state: LinearModelState) -> Result<Self, Self::Error> {
        let LinearModelState {
            mut coef,
            intercept,
            classes,
        } = state;
        if coef.len() != 1 {
            return Err(SentimentError::InvalidClassifier(format!(
                "expected one coefficient row for a binary model, found {}",
                coef.len()
            )));
        }
        let [intercept] = intercept[..] else {
            return Err(SentimentError::InvalidClassifier(format!(
                "expected one intercept, found {}",
                intercept.len()
            )));
        };
        let [negative, positive] = classes[..] else {
            return Err(SentimentError::InvalidClassifier(format!(
                "expected two classes, found {}",
                classes.len()
            )));
        };
        Self::new(coef.remove(0), intercept, [negative, positive])
    }
}

impl From<LinearClassifier> for LinearModelState {
    fn from(model: LinearClassifier) -> Self {
        Self {
            coef: vec![model.coef],
            intercept: vec![model.intercept],
            classes: model.classes.to_vec(),
        }
    }
}

impl LinearClassifier {
    pub fn new(coef: Vec<f64>, intercept: f64, classes: [i64; 2]) -> Result<Self, SentimentError> {
        if coef.is_empty() {
            return Err(SentimentError::InvalidClassifier(
                "coefficient row is empty".to_owned(),
            ));
        }
        if coef.iter().chain([&intercept]).any(|w| !w.is_finite()) {
            return Err(SentimentError::InvalidClassifier(
                "weights must be finite".to_owned(),
            ));
        }
        Ok(Self {
            coef,
            intercept,
            classes,
        })
    }

    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, SentimentError> {
        let model: Self = serde_json::from_slice(bytes)?;
        debug!(
            num_features = model.num_features(),
            "Loaded LinearClassifier from JSON"
        );
        Ok(model)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SentimentError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| SentimentError::Artifact {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_slice(&bytes)
    }

    /// Signed distance to the decision boundary for every row.
    pub fn decision_function(&self, features: &CsMat<f64>) -> Result<Vec<f64>, SentimentError> {
        if features.cols() != self.coef.len() {
            return Err(SentimentError::FeatureMismatch {
                expected: self.coef.len(),
                found: features.cols(),
            });
        }
        let rows = if features.is_csr() {
            Cow::Borrowed(features)
        } else {
            Cow::Owned(features.to_csr())
        };
        Ok(rows
            .outer_iterator()
            .map(|row| {
                row.iter()
                    .fold(self.intercept, |acc, (col, &value)| {
                        acc + self.coef[col] * value
                    })
            })
            .collect())
    }

    pub fn num_features(&self) -> usize {
        self.coef.len()
    }

    pub fn classes(&self) -> [i64; 2] {
        self.classes
    }
}

impl Classifier for LinearClassifier {
    fn predict(&self, features: &CsMat<f64>) -> Result<Vec<i64>, SentimentError> {
        let [negative, positive] = self.classes;
        let labels = self
            .decision_function(features)?
            .into_iter()
            .map(|score| if score > 0.0 { positive } else { negative })
            .collect::<Vec<_>>();
        debug!(num_rows = labels.len(), "Linear classifier prediction complete");
        Ok(labels)
    }
}

#[cfg(test)]
mod tests {
    use sprs::TriMat;

    use super::*;

    fn features(rows: usize, cols: usize, entries: &[(usize, usize, f64)]) -> CsMat<f64> {
        let mut triplets = TriMat::new((rows, cols));
        for &(row, col, value) in entries {
            triplets.add_triplet(row, col, value);
        }
        triplets.to_csr()
    }

    fn model() -> LinearClassifier {
        LinearClassifier::new(vec![-1.0, 2.0, 0.5], 0.25, [0, 1]).unwrap()
    }

    #[test]
    fn test_decision_function() {
        let x = features(3, 3, &[(0, 0, 1.0), (1, 1, 0.5), (1, 2, 0.5)]);
        let scores = model().decision_function(&x).unwrap();
        assert_eq!(scores, vec![-0.75, 1.5, 0.25]);
    }

    #[test]
    fn test_predict_labels() {
        let x = features(3, 3, &[(0, 0, 1.0), (1, 1, 0.5)]);
        assert_eq!(model().predict(&x).unwrap(), vec![0, 1, 1]);
    }

    #[test]
    fn test_zero_score_is_negative_class() {
        let model = LinearClassifier::new(vec![1.0], 0.0, [0, 1]).unwrap();
        assert_eq!(model.predict(&features(1, 1, &[])).unwrap(), vec![0]);
    }

    #[test]
    fn test_csc_input() {
        let x = features(2, 3, &[(0, 1, 1.0), (1, 0, 1.0)]).to_csc();
        assert_eq!(model().predict(&x).unwrap(), vec![1, 0]);
    }

    #[test]
    fn test_feature_mismatch() {
        let err = model().predict(&features(1, 2, &[])).unwrap_err();
        assert!(matches!(
            err,
            SentimentError::FeatureMismatch {
                expected: 3,
                found: 2
            }
        ));
        assert!(err.is_model_output());
    }

    #[test]
    fn test_from_json() {
        let json = br#"{"coef": [[-1.0, 2.0, 0.5]], "intercept": [0.25], "classes": [0, 1]}"#;
        assert_eq!(LinearClassifier::from_json_slice(json).unwrap(), model());

        let without_classes = br#"{"coef": [[1.0]], "intercept": [0.0]}"#;
        let parsed = LinearClassifier::from_json_slice(without_classes).unwrap();
        assert_eq!(parsed.classes(), [0, 1]);
    }

    #[test]
    fn test_from_json_rejects_multiclass_shapes() {
        for json in [
            br#"{"coef": [[1.0], [2.0]], "intercept": [0.0]}"#.as_slice(),
            br#"{"coef": [[1.0]], "intercept": [0.0, 1.0]}"#.as_slice(),
            br#"{"coef": [[1.0]], "intercept": [0.0], "classes": [0, 1, 2]}"#.as_slice(),
            br#"{"coef": [[]], "intercept": [0.0]}"#.as_slice(),
        ] {
            assert!(LinearClassifier::from_json_slice(json).is_err());
        }
    }

    #[test]
    fn test_serialize_uses_exported_layout() {
        let value = serde_json::to_value(model()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"coef": [[-1.0, 2.0, 0.5]], "intercept": [0.25], "classes": [0, 1]})
        );
    }

    #[test]
    fn test_missing_file() {
        let err = LinearClassifier::from_path("/no/such/model.json").unwrap_err();
        assert!(matches!(err, SentimentError::Artifact { .. }));
    }
}
