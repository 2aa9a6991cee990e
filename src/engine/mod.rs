use serde::Serialize;

use crate::{
    knowledge::TextList,
    model::{top_class, Classifier},
    scoring::{ActionPriority, HealthStatus},
};

pub mod leaf;
pub mod palm;

pub use leaf::{LeafAdvisory, LeafEngine};
pub use palm::{PalmAdvisory, PalmEngine};

/// One photo received from a client.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub filename: String,
    pub data: Vec<u8>,
}

impl UploadedImage {
    pub fn new(filename: impl Into<String>, data: Vec<u8>) -> Self {
        UploadedImage {
            filename: filename.into(),
            data,
        }
    }
}

/// Per-image votes that survived classification.
#[derive(Debug, Default)]
pub struct Votes {
    pub labels: Vec<&'static str>,
    pub confidences: Vec<f64>,
}

/// Runs every image through the classifier. Images that fail to decode or
/// classify, and indices outside `classes`, are skipped.
pub fn classify_all(
    classifier: &dyn Classifier,
    classes: &[&'static str],
    images: &[UploadedImage],
) -> Votes {
    let mut votes = Votes::default();

    for image in images {
        let probabilities = match classifier.predict(&image.data) {
            Ok(probabilities) => probabilities,
            Err(err) => {
                tracing::warn!(filename = %image.filename, error = %err, "skipping image");
                continue;
            }
        };

        let Some((index, confidence)) = top_class(&probabilities) else {
            tracing::warn!(filename = %image.filename, "classifier returned no scores");
            continue;
        };

        let Some(label) = classes.get(index).copied() else {
            tracing::warn!(filename = %image.filename, index, "class index out of range");
            continue;
        };

        tracing::debug!(filename = %image.filename, label, confidence, "image classified");
        votes.labels.push(label);
        votes.confidences.push(f64::from(confidence));
    }

    votes
}

/// Advisory for a batch where no image could be classified.
#[derive(Debug, Serialize)]
pub struct UnclearImages {
    pub status: HealthStatus,
    pub message: &'static str,
    pub health_score: u32,
    pub action_priority: ActionPriority,
    pub recommendations: TextList,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disclaimer: Option<&'static str>,
}

#[cfg(test)]
pub(crate) mod testing {
    use std::{collections::VecDeque, sync::Mutex};

    use crate::{error::ModelError, model::Classifier};

    /// Replays scripted outputs in call order; `None` simulates a failure.
    pub struct StubClassifier {
        outputs: Mutex<VecDeque<Option<Vec<f32>>>>,
    }

    impl StubClassifier {
        pub fn new(outputs: Vec<Option<Vec<f32>>>) -> Self {
            StubClassifier {
                outputs: Mutex::new(outputs.into()),
            }
        }
    }

    impl Classifier for StubClassifier {
        fn predict(&self, _image_data: &[u8]) -> Result<Vec<f32>, ModelError> {
            self.outputs
                .lock()
                .unwrap()
                .pop_front()
                .flatten()
                .ok_or_else(|| ModelError::MissingOperation("stub".into()))
        }
    }

    /// Probability vector putting `p` on `index` and spreading the rest.
    pub fn one_hot(index: usize, p: f32, classes: usize) -> Vec<f32> {
        let rest = (1.0 - p) / (classes - 1) as f32;
        (0..classes).map(|i| if i == index { p } else { rest }).collect()
    }
}
