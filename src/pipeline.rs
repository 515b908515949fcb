//! Prediction and lookup pipeline.
//!
//! Orchestrates one request end to end: encode the selection, run a single
//! forward inference, decode the class index to a disease name, and fetch the
//! precaution row. Strictly sequential, no retries, no suspension; every
//! failure is a typed [`PredictError`] and the pipeline itself never logs or
//! prints.

use crate::encode::{self, EncodeError};
use crate::labels::DiseaseLabels;
use crate::model::Classifier;
use crate::precautions::PrecautionTable;
use crate::vocabulary::SymptomVocabulary;

/// Error type for prediction requests.
///
/// The variants separate user-input conditions (recoverable, re-prompt) from
/// artifact faults (hard errors for the request).
#[derive(Debug, thiserror::Error)]
pub enum PredictError {
    /// Empty selection. A user-input condition, not a fault; the classifier
    /// is never invoked.
    #[error("no symptoms selected")]
    NoSymptomsSelected,

    /// A selected name is not a vocabulary member. The presentation layer
    /// owns membership, so through a well-behaved caller this indicates a
    /// vocabulary desync.
    #[error("unknown symptom {name:?}: not a vocabulary member")]
    UnknownSymptom { name: String },

    /// The classifier emitted an index the label codec cannot decode. The
    /// model and codec were trained together, so this means mismatched
    /// artifacts.
    #[error("classifier emitted class index {index} but only {num_labels} labels are known")]
    UnknownClassIndex { index: usize, num_labels: usize },

    /// The decoded disease has no precaution row. Incomplete reference data;
    /// recoverable at the UI level.
    #[error("no precaution data on file for disease {disease:?}")]
    DiseaseNotFound { disease: String },
}

impl From<EncodeError> for PredictError {
    fn from(err: EncodeError) -> Self {
        match err {
            EncodeError::UnknownSymptom { name } => PredictError::UnknownSymptom { name },
        }
    }
}

/// A successful prediction: the decoded disease and its present precautions
/// in table column order.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub disease: String,
    pub precautions: Vec<String>,
}

/// The assembled read-only pipeline.
///
/// Holds the four load-once artifacts for the process lifetime and exposes
/// [`Pipeline::predict`]. Artifact consistency (vocabulary width vs. model
/// features, label count vs. model classes) is the loader's responsibility;
/// an inconsistent in-memory assembly surfaces as request-time errors rather
/// than panics.
#[derive(Debug)]
pub struct Pipeline<C: Classifier> {
    vocabulary: SymptomVocabulary,
    classifier: C,
    labels: DiseaseLabels,
    precautions: PrecautionTable,
}

impl<C: Classifier> Pipeline<C> {
    pub fn new(
        vocabulary: SymptomVocabulary,
        classifier: C,
        labels: DiseaseLabels,
        precautions: PrecautionTable,
    ) -> Self {
        Self {
            vocabulary,
            classifier,
            labels,
            precautions,
        }
    }

    /// The symptom vocabulary this pipeline encodes against.
    pub fn vocabulary(&self) -> &SymptomVocabulary {
        &self.vocabulary
    }

    /// The disease label codec.
    pub fn labels(&self) -> &DiseaseLabels {
        &self.labels
    }

    /// The precaution table.
    pub fn precautions(&self) -> &PrecautionTable {
        &self.precautions
    }

    /// The classifier.
    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// Predict a disease and its precautions for a symptom selection.
    ///
    /// The selection is a set: iteration order and repeats do not affect the
    /// result. An empty selection is rejected before any inference work.
    pub fn predict<'a, I>(&self, selection: I) -> Result<Prediction, PredictError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let selection: Vec<&str> = selection.into_iter().collect();
        if selection.is_empty() {
            return Err(PredictError::NoSymptomsSelected);
        }

        let features = encode::encode(selection.iter().copied(), &self.vocabulary)?;

        let index = self.classifier.predict_index(&features);

        let disease = self
            .labels
            .decode(index)
            .ok_or(PredictError::UnknownClassIndex {
                index,
                num_labels: self.labels.len(),
            })?;

        let row = self
            .precautions
            .get(disease)
            .ok_or_else(|| PredictError::DiseaseNotFound {
                disease: disease.to_string(),
            })?;

        Ok(Prediction {
            disease: disease.to_string(),
            precautions: row.present().map(str::to_string).collect(),
        })
    }
}
