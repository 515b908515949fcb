//! Testing utilities for sympred.
//!
//! Artifact builders and classifier stubs shared by unit tests, integration
//! tests, and benches. Not part of the stable API.
//!
//! ```ignore
//! use sympred::testing::{vocabulary, FixedClassifier};
//! ```

use std::cell::Cell;

use crate::encode::FeatureVector;
use crate::labels::DiseaseLabels;
use crate::model::{Classifier, LinearClassifier};
use crate::precautions::PrecautionRecord;
use crate::vocabulary::SymptomVocabulary;

// =============================================================================
// Artifact builders
// =============================================================================

/// Build a vocabulary from string literals.
///
/// # Panics
///
/// Panics on invalid input; test data is expected to be well-formed.
pub fn vocabulary(names: &[&str]) -> SymptomVocabulary {
    SymptomVocabulary::new(names.iter().map(|s| s.to_string()).collect())
        .unwrap_or_else(|e| panic!("invalid test vocabulary: {e}"))
}

/// Build a label set from string literals.
///
/// # Panics
///
/// Panics on invalid input; test data is expected to be well-formed.
pub fn labels(names: &[&str]) -> DiseaseLabels {
    DiseaseLabels::new(names.iter().map(|s| s.to_string()).collect())
        .unwrap_or_else(|e| panic!("invalid test labels: {e}"))
}

/// Build a precaution record from four slot literals; `""` marks an absent
/// slot.
pub fn record(disease: &str, slots: [&str; 4]) -> PrecautionRecord {
    PrecautionRecord::new(
        disease,
        slots.map(|s| {
            if s.is_empty() {
                None
            } else {
                Some(s.to_string())
            }
        }),
    )
}

/// Generated symptom names (`symptom_000`, `symptom_001`, ...) for
/// bench-scale vocabularies.
pub fn symptom_names(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("symptom_{i:03}")).collect()
}

/// Linear classifier with deterministic patterned weights, for benches and
/// hand-checkable tests.
pub fn patterned_linear(num_features: usize, num_classes: usize) -> LinearClassifier {
    let mut weights = Vec::with_capacity((num_features + 1) * num_classes);
    for feature in 0..=num_features {
        for class in 0..num_classes {
            // Small, varied, and stable across runs.
            weights.push(((feature * 7 + class * 3) % 11) as f32 * 0.1 - 0.5);
        }
    }
    LinearClassifier::new(weights.into_boxed_slice(), num_features, num_classes)
}

// =============================================================================
// Classifier stubs
// =============================================================================

/// Classifier stub reporting a fixed shape and always predicting one index.
///
/// The index may be out of range for the label set to exercise defensive
/// decode paths. Invocations are counted so tests can assert the pipeline
/// short-circuits before inference.
#[derive(Debug)]
pub struct FixedClassifier {
    num_features: usize,
    num_classes: usize,
    index: usize,
    calls: Cell<usize>,
}

impl FixedClassifier {
    pub fn new(num_features: usize, num_classes: usize, index: usize) -> Self {
        Self {
            num_features,
            num_classes,
            index,
            calls: Cell::new(0),
        }
    }

    /// Number of inference calls made against this stub.
    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl Classifier for FixedClassifier {
    fn num_features(&self) -> usize {
        self.num_features
    }

    fn num_classes(&self) -> usize {
        self.num_classes
    }

    fn scores(&self, _features: &FeatureVector) -> Vec<f32> {
        self.calls.set(self.calls.get() + 1);
        let mut scores = vec![0.0; self.num_classes];
        if let Some(s) = scores.get_mut(self.index) {
            *s = 1.0;
        }
        scores
    }

    fn predict_index(&self, _features: &FeatureVector) -> usize {
        self.calls.set(self.calls.get() + 1);
        self.index
    }
}
