//! One-hot encoding of symptom selections.
//!
//! [`encode`] maps a set of selected symptom names onto the fixed feature
//! space defined by a [`SymptomVocabulary`]: the output always has length N
//! (the vocabulary size), with 1.0 at the index of each selected symptom and
//! 0.0 everywhere else. The empty selection encodes to an all-zero vector.
//!
//! A name outside the vocabulary is an error, never silently dropped:
//! dropping would mask a vocabulary desync between the encoder and the
//! classifier that was trained against it.

use crate::vocabulary::SymptomVocabulary;

/// Error type for symptom encoding.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("unknown symptom {name:?}: not a vocabulary member")]
    UnknownSymptom { name: String },
}

/// Fixed-length one-hot feature vector.
///
/// Values are `f32` over {0.0, 1.0}; the length always equals the vocabulary
/// size the vector was encoded against.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    values: Box<[f32]>,
}

impl FeatureVector {
    /// Create an all-zero vector of the given length.
    pub fn zeros(num_features: usize) -> Self {
        Self {
            values: vec![0.0; num_features].into_boxed_slice(),
        }
    }

    /// Number of features.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the vector has zero length.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Mark the feature at `index` as present.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[inline]
    pub fn set_hot(&mut self, index: usize) {
        self.values[index] = 1.0;
    }

    /// Whether the feature at `index` is present.
    ///
    /// Out-of-bounds indices read as absent.
    #[inline]
    pub fn is_hot(&self, index: usize) -> bool {
        self.values.get(index).is_some_and(|&v| v == 1.0)
    }

    /// Indices of present features, in ascending order.
    pub fn hot_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.values
            .iter()
            .enumerate()
            .filter(|(_, &v)| v == 1.0)
            .map(|(i, _)| i)
    }

    /// Raw values (classifier input layout).
    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }
}

/// One-hot encode a symptom selection against a vocabulary.
///
/// Deterministic: the output depends only on the set of names, not on the
/// iteration order of `selection`. Repeated names are idempotent.
///
/// Fails with [`EncodeError::UnknownSymptom`] on the first name that is not a
/// vocabulary member.
pub fn encode<'a, I>(
    selection: I,
    vocabulary: &SymptomVocabulary,
) -> Result<FeatureVector, EncodeError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut vector = FeatureVector::zeros(vocabulary.len());

    for name in selection {
        let index = vocabulary
            .index_of(name)
            .ok_or_else(|| EncodeError::UnknownSymptom {
                name: name.to_string(),
            })?;
        vector.set_hot(index);
    }

    Ok(vector)
}
