//! Fixed symptom vocabulary defining the one-hot feature space.
//!
//! The vocabulary is an ordered list of unique symptom names. The position of
//! a name is its feature index, and the loaded classifier was trained against
//! this exact ordering; it must remain stable for the lifetime of the model.

use std::collections::HashMap;

/// Error type for vocabulary construction.
#[derive(Debug, thiserror::Error)]
pub enum VocabularyError {
    #[error("symptom name at position {0} is empty")]
    EmptyName(usize),

    #[error("duplicate symptom name {name:?} at positions {first} and {second}")]
    DuplicateName {
        name: String,
        first: usize,
        second: usize,
    },
}

/// Ordered, immutable list of unique symptom names.
///
/// Construction validates that every name is non-empty and unique; after
/// construction the vocabulary is read-only.
///
/// # Example
///
/// ```
/// use sympred::vocabulary::SymptomVocabulary;
///
/// let vocab = SymptomVocabulary::new(vec![
///     "fever".to_string(),
///     "cough".to_string(),
///     "fatigue".to_string(),
/// ])
/// .unwrap();
///
/// assert_eq!(vocab.len(), 3);
/// assert_eq!(vocab.index_of("cough"), Some(1));
/// assert_eq!(vocab.name(2), Some("fatigue"));
/// ```
#[derive(Debug, Clone)]
pub struct SymptomVocabulary {
    /// Names in feature-index order.
    names: Vec<String>,
    /// Reverse lookup: name → feature index.
    index: HashMap<String, usize>,
}

impl SymptomVocabulary {
    /// Build a vocabulary from names in feature-index order.
    ///
    /// Fails if any name is empty or appears more than once.
    pub fn new(names: Vec<String>) -> Result<Self, VocabularyError> {
        let mut index = HashMap::with_capacity(names.len());

        for (pos, name) in names.iter().enumerate() {
            if name.is_empty() {
                return Err(VocabularyError::EmptyName(pos));
            }
            if let Some(first) = index.insert(name.clone(), pos) {
                return Err(VocabularyError::DuplicateName {
                    name: name.clone(),
                    first,
                    second: pos,
                });
            }
        }

        Ok(Self { names, index })
    }

    /// Number of symptoms (the one-hot feature count N).
    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the vocabulary is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Feature index of a symptom name, if it is a member.
    #[inline]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Whether a name is a vocabulary member.
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Symptom name at a feature index.
    #[inline]
    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    /// All names in feature-index order.
    #[inline]
    pub fn names(&self) -> &[String] {
        &self.names
    }
}
