//! Disease label codec.
//!
//! Maps raw classifier output (a class index) back to a disease name. The
//! label order mirrors the encoding the classifier was trained with, so like
//! the vocabulary it must stay stable for the lifetime of the model.

use std::collections::HashMap;

/// Error type for label-set construction.
#[derive(Debug, thiserror::Error)]
pub enum LabelError {
    #[error("disease label at class index {0} is empty")]
    EmptyName(usize),

    #[error("duplicate disease label {name:?} at class indices {first} and {second}")]
    DuplicateName {
        name: String,
        first: usize,
        second: usize,
    },
}

/// Ordered, immutable list of unique disease names, indexed by class.
#[derive(Debug, Clone)]
pub struct DiseaseLabels {
    /// Names in class-index order.
    names: Vec<String>,
    /// Reverse lookup: name → class index.
    index: HashMap<String, usize>,
}

impl DiseaseLabels {
    /// Build a label set from names in class-index order.
    ///
    /// Fails if any name is empty or appears more than once.
    pub fn new(names: Vec<String>) -> Result<Self, LabelError> {
        let mut index = HashMap::with_capacity(names.len());

        for (pos, name) in names.iter().enumerate() {
            if name.is_empty() {
                return Err(LabelError::EmptyName(pos));
            }
            if let Some(first) = index.insert(name.clone(), pos) {
                return Err(LabelError::DuplicateName {
                    name: name.clone(),
                    first,
                    second: pos,
                });
            }
        }

        Ok(Self { names, index })
    }

    /// Number of known classes.
    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the label set is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Disease name for a class index, or `None` if the index is out of range.
    #[inline]
    pub fn decode(&self, class_index: usize) -> Option<&str> {
        self.names.get(class_index).map(String::as_str)
    }

    /// Class index of a disease name, if it is a known label.
    #[inline]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// All names in class-index order.
    #[inline]
    pub fn names(&self) -> &[String] {
        &self.names
    }
}
