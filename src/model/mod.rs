//! Classifier seam and loaded-model dispatch.
//!
//! The pipeline treats the classifier as an opaque function from an encoded
//! feature vector to a raw class index. [`Classifier`] is that seam;
//! [`SymptomClassifier`] dispatches over the model kinds loadable from a
//! model artifact. Test code can substitute stubs through the trait (see
//! [`crate::testing`]).

pub mod linear;
pub mod tree;

pub use linear::LinearClassifier;
pub use tree::{DecisionTree, TreeBuilder, TreeClassifier};

use crate::encode::FeatureVector;

// =============================================================================
// Classifier trait
// =============================================================================

/// Single-example inference over one-hot symptom features.
///
/// Implementations must be deterministic and side-effect free: repeated calls
/// with the same input yield the same output.
pub trait Classifier {
    /// Input width the model was trained on (must equal the vocabulary size).
    fn num_features(&self) -> usize;

    /// Number of class indices the model can emit (`0..num_classes`).
    fn num_classes(&self) -> usize;

    /// Raw per-class scores for one encoded example.
    ///
    /// Returns a vector of length `num_classes()`.
    fn scores(&self, features: &FeatureVector) -> Vec<f32>;

    /// Predicted class index: the argmax over [`Classifier::scores`].
    ///
    /// Ties resolve to the highest index among maximal scores, so repeated
    /// calls are deterministic.
    fn predict_index(&self, features: &FeatureVector) -> usize {
        argmax(&self.scores(features))
    }
}

// =============================================================================
// Loaded-model dispatch
// =============================================================================

/// A classifier loaded from a model artifact.
#[derive(Debug, Clone)]
pub enum SymptomClassifier {
    /// Dense linear scorer.
    Linear(LinearClassifier),
    /// Decision-tree ensemble.
    Trees(TreeClassifier),
}

impl Classifier for SymptomClassifier {
    fn num_features(&self) -> usize {
        match self {
            SymptomClassifier::Linear(m) => m.num_features(),
            SymptomClassifier::Trees(m) => m.num_features(),
        }
    }

    fn num_classes(&self) -> usize {
        match self {
            SymptomClassifier::Linear(m) => m.num_classes(),
            SymptomClassifier::Trees(m) => m.num_classes(),
        }
    }

    fn scores(&self, features: &FeatureVector) -> Vec<f32> {
        match self {
            SymptomClassifier::Linear(m) => m.scores(features),
            SymptomClassifier::Trees(m) => m.scores(features),
        }
    }
}

// =============================================================================
// Helper functions
// =============================================================================

/// Argmax: index of the maximum score. Ties resolve to the last maximal index.
fn argmax(scores: &[f32]) -> usize {
    scores
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(idx, _)| idx)
        .unwrap_or(0)
}
