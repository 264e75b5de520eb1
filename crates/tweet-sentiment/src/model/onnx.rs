use std::{path::Path, sync::Mutex};

use ort::{
    session::{Session, builder::GraphOptimizationLevel},
    value::{Tensor, TensorValueType, Value},
};
use sprs::CsMat;
use tracing::debug;

use super::Classifier;
use crate::SentimentError;

/// A classifier exported to ONNX, run through ONNX Runtime.
///
/// The first model output must hold the int64 class labels, which is what
/// exported scikit-learn linear models produce.
pub struct OnnxClassifier {
    session: Mutex<Session>,
}

impl OnnxClassifier {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SentimentError> {
        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(1)?
            .commit_from_file(path.as_ref())?;
        debug!(path = %path.as_ref().display(), "Loaded ONNX classifier");
        Ok(Self {
            session: Mutex::new(session),
        })
    }

    pub fn from_memory(bytes: &[u8]) -> Result<Self, SentimentError> {
        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(1)?
            .commit_from_memory(bytes)?;
        Ok(Self {
            session: Mutex::new(session),
        })
    }
}

#[allow(clippy::cast_possible_truncation)]
fn prepare_input_for_inference(
    features: &CsMat<f64>,
) -> ort::Result<Value<TensorValueType<f32>>> {
    // Exported models take f32 inputs
    let dense = features.map(|x| *x as f32).to_dense();
    let shape = dense.shape().to_vec();
    let data = dense.into_raw_vec_and_offset().0.into_boxed_slice();

    Tensor::from_array((shape, data))
}

fn first_input_name(session: &Session) -> Result<String, SentimentError> {
    session
        .inputs
        .first()
        .map(|input| input.name.clone())
        .ok_or_else(|| SentimentError::InvalidClassifier("ONNX model has no inputs".to_owned()))
}

impl Classifier for OnnxClassifier {
    fn predict(&self, features: &CsMat<f64>) -> Result<Vec<i64>, SentimentError> {
        let input = prepare_input_for_inference(features)?;
        let mut session = self
            .session
            .lock()
            .map_err(|e| SentimentError::SessionUnavailable(e.to_string()))?;
        let input_name = first_input_name(&session)?;
        let outputs = session.run(ort::inputs![input_name => input])?;
        let labels = outputs[0]
            .try_extract_array::<i64>()?
            .iter()
            .copied()
            .collect::<Vec<_>>();
        debug!(num_rows = labels.len(), "ONNX classifier prediction complete");
        Ok(labels)
    }
}
