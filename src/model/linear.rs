//! Dense linear classifier.

use crate::encode::FeatureVector;
use crate::model::Classifier;

/// Linear scorer over one-hot symptom features.
///
/// Weights are stored feature-major, class-minor, with one trailing bias row:
/// `weights[feature * num_classes + class]`, and the bias for a class at
/// `weights[num_features * num_classes + class]`. The buffer length is
/// therefore `(num_features + 1) * num_classes`.
#[derive(Debug, Clone)]
pub struct LinearClassifier {
    weights: Box<[f32]>,
    num_features: usize,
    num_classes: usize,
}

impl LinearClassifier {
    /// Creates a linear classifier from a flat weight buffer.
    ///
    /// # Panics
    ///
    /// Panics if `weights.len() != (num_features + 1) * num_classes`. Loaders
    /// validate buffer lengths before construction, so this only fires on
    /// programming errors.
    pub fn new(weights: Box<[f32]>, num_features: usize, num_classes: usize) -> Self {
        assert_eq!(
            weights.len(),
            (num_features + 1) * num_classes,
            "weight buffer must hold one row per feature plus a bias row"
        );
        LinearClassifier {
            weights,
            num_features,
            num_classes,
        }
    }

    /// Weight applied to `feature` when scoring `class`.
    #[inline]
    pub fn weight(&self, feature: usize, class: usize) -> f32 {
        debug_assert!(feature < self.num_features);
        debug_assert!(class < self.num_classes);
        self.weights[feature * self.num_classes + class]
    }

    /// Bias term for `class`.
    #[inline]
    pub fn bias(&self, class: usize) -> f32 {
        debug_assert!(class < self.num_classes);
        self.weights[self.num_features * self.num_classes + class]
    }

    /// The raw weight buffer, in storage order.
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }
}

impl Classifier for LinearClassifier {
    fn num_features(&self) -> usize {
        self.num_features
    }

    fn num_classes(&self) -> usize {
        self.num_classes
    }

    fn scores(&self, features: &FeatureVector) -> Vec<f32> {
        debug_assert_eq!(
            features.len(),
            self.num_features,
            "feature vector width must match the model"
        );
        let row = features.as_slice();
        let mut scores = Vec::with_capacity(self.num_classes);
        for class in 0..self.num_classes {
            let mut sum = self.bias(class);
            for (feature, &value) in row.iter().enumerate().take(self.num_features) {
                sum += value * self.weight(feature, class);
            }
            scores.push(sum);
        }
        scores
    }
}
