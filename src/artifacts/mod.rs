//! Artifact bundle loading and validation.
//!
//! [`load_bundle`] assembles the four startup artifacts from one directory
//! into a validated [`Pipeline`]: `vocabulary.json`, `model.json`,
//! `labels.json` and `precautions.csv`. All I/O happens here, once, outside
//! the request path; after loading, everything is read-only.
//!
//! Structural inconsistencies between artifacts are hard errors because the
//! encoder, classifier and label codec were produced together and silently
//! mismatched shapes corrupt predictions. Incomplete reference data (a label
//! with no precaution row, duplicate rows) is reported through warning logs
//! but does not fail the load; those conditions stay recoverable per request.

pub mod format;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::labels::{DiseaseLabels, LabelError};
use crate::model::{Classifier, DecisionTree, LinearClassifier, SymptomClassifier, TreeClassifier};
use crate::pipeline::Pipeline;
use crate::precautions::{PrecautionError, PrecautionTable};
use crate::vocabulary::{SymptomVocabulary, VocabularyError};

use format::{ModelDocument, TreeDocument};

/// File names expected inside a bundle directory.
pub const VOCABULARY_FILE: &str = "vocabulary.json";
pub const MODEL_FILE: &str = "model.json";
pub const LABELS_FILE: &str = "labels.json";
pub const PRECAUTIONS_FILE: &str = "precautions.csv";

/// Error type for bundle loading.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("failed to read {file}: {source}")]
    Io {
        file: &'static str,
        source: std::io::Error,
    },

    #[error("malformed {file}: {source}")]
    Json {
        file: &'static str,
        source: serde_json::Error,
    },

    #[error("invalid vocabulary: {0}")]
    Vocabulary(#[from] VocabularyError),

    #[error("invalid labels: {0}")]
    Labels(#[from] LabelError),

    #[error("invalid precaution table: {0}")]
    Precautions(#[from] PrecautionError),

    #[error("vocabulary has {vocabulary} symptoms but the model expects {model} features")]
    FeatureCountMismatch { vocabulary: usize, model: usize },

    #[error("label set has {labels} diseases but the model emits {model} classes")]
    ClassCountMismatch { labels: usize, model: usize },

    #[error("model declares no classes")]
    NoClasses,

    #[error("linear weight buffer has {got} values but {expected} are required")]
    WeightCountMismatch { got: usize, expected: usize },

    #[error("tree {0} has no nodes")]
    EmptyTree(usize),

    #[error(
        "mismatched node arrays in tree {tree}: {field} has {got} entries but the tree has {num_nodes} nodes"
    )]
    NodeArrayMismatch {
        tree: usize,
        field: &'static str,
        got: usize,
        num_nodes: usize,
    },

    #[error(
        "invalid node index in tree {tree}: node {node} references child {child} but the tree has {num_nodes} nodes"
    )]
    InvalidNodeIndex {
        tree: usize,
        node: usize,
        child: i32,
        num_nodes: usize,
    },

    #[error("tree {tree} is not in breadth-first order: node {node} references child {child}")]
    ChildBeforeParent {
        tree: usize,
        node: usize,
        child: i32,
    },

    #[error("model declares {trees} trees but {assignments} class assignments")]
    TreeAssignmentMismatch { trees: usize, assignments: usize },

    #[error(
        "tree {tree} is assigned to class {class} but the model declares {num_classes} classes"
    )]
    TreeClassOutOfRange {
        tree: usize,
        class: u32,
        num_classes: usize,
    },

    #[error("base score has {got} entries but the model declares {num_classes} classes")]
    BaseScoreMismatch { got: usize, num_classes: usize },
}

/// Load and validate a bundle directory into a ready pipeline.
pub fn load_bundle(dir: impl AsRef<Path>) -> Result<Pipeline<SymptomClassifier>, ArtifactError> {
    let dir = dir.as_ref();

    let names: format::VocabularyDocument = read_json(&dir.join(VOCABULARY_FILE), VOCABULARY_FILE)?;
    let vocabulary = SymptomVocabulary::new(names)?;

    let document: ModelDocument = read_json(&dir.join(MODEL_FILE), MODEL_FILE)?;
    let classifier = convert_model(document)?;

    let label_names: format::LabelsDocument = read_json(&dir.join(LABELS_FILE), LABELS_FILE)?;
    let labels = DiseaseLabels::new(label_names)?;

    let precautions = PrecautionTable::from_path(dir.join(PRECAUTIONS_FILE))?;

    validate_bundle(&vocabulary, &classifier, &labels, &precautions)?;

    tracing::debug!(
        "loaded bundle: {} symptoms, {} diseases, {} precaution rows",
        vocabulary.len(),
        labels.len(),
        precautions.len()
    );

    Ok(Pipeline::new(vocabulary, classifier, labels, precautions))
}

fn read_json<T>(path: &Path, file: &'static str) -> Result<T, ArtifactError>
where
    T: serde::de::DeserializeOwned,
{
    let handle = File::open(path).map_err(|source| ArtifactError::Io { file, source })?;
    serde_json::from_reader(BufReader::new(handle))
        .map_err(|source| ArtifactError::Json { file, source })
}

/// Cross-artifact consistency checks.
///
/// Shape mismatches are hard errors. Label/table coverage gaps are warnings:
/// `DiseaseNotFound` stays a recoverable request-time condition, but the
/// operator should hear about incomplete reference data once, at startup.
fn validate_bundle(
    vocabulary: &SymptomVocabulary,
    classifier: &SymptomClassifier,
    labels: &DiseaseLabels,
    precautions: &PrecautionTable,
) -> Result<(), ArtifactError> {
    if vocabulary.len() != classifier.num_features() {
        return Err(ArtifactError::FeatureCountMismatch {
            vocabulary: vocabulary.len(),
            model: classifier.num_features(),
        });
    }
    if labels.len() != classifier.num_classes() {
        return Err(ArtifactError::ClassCountMismatch {
            labels: labels.len(),
            model: classifier.num_classes(),
        });
    }

    let uncovered: Vec<&str> = labels
        .names()
        .iter()
        .map(String::as_str)
        .filter(|disease| !precautions.contains(disease))
        .collect();
    if !uncovered.is_empty() {
        tracing::warn!(
            "{} disease(s) have no precaution row: {}",
            uncovered.len(),
            uncovered.join(", ")
        );
    }

    Ok(())
}

// =============================================================================
// Document -> native conversion
// =============================================================================

/// Convert a parsed model document into a native classifier, validating the
/// payload shape.
pub fn convert_model(document: ModelDocument) -> Result<SymptomClassifier, ArtifactError> {
    match document {
        ModelDocument::Linear {
            num_features,
            num_classes,
            weights,
        } => {
            if num_classes == 0 {
                return Err(ArtifactError::NoClasses);
            }
            let expected = (num_features + 1) * num_classes;
            if weights.len() != expected {
                return Err(ArtifactError::WeightCountMismatch {
                    got: weights.len(),
                    expected,
                });
            }
            Ok(SymptomClassifier::Linear(LinearClassifier::new(
                weights.into_boxed_slice(),
                num_features,
                num_classes,
            )))
        }
        ModelDocument::Trees {
            num_features,
            num_classes,
            base_score,
            tree_classes,
            trees,
        } => {
            if num_classes == 0 {
                return Err(ArtifactError::NoClasses);
            }
            if trees.len() != tree_classes.len() {
                return Err(ArtifactError::TreeAssignmentMismatch {
                    trees: trees.len(),
                    assignments: tree_classes.len(),
                });
            }
            if base_score.len() != num_classes {
                return Err(ArtifactError::BaseScoreMismatch {
                    got: base_score.len(),
                    num_classes,
                });
            }
            for (tree, &class) in tree_classes.iter().enumerate() {
                if class as usize >= num_classes {
                    return Err(ArtifactError::TreeClassOutOfRange {
                        tree,
                        class,
                        num_classes,
                    });
                }
            }

            let native = trees
                .iter()
                .enumerate()
                .map(|(idx, tree)| convert_tree(tree, idx))
                .collect::<Result<Vec<_>, _>>()?;

            Ok(SymptomClassifier::Trees(TreeClassifier::new(
                native,
                tree_classes,
                base_score,
                num_features,
                num_classes,
            )))
        }
    }
}

/// Convert one tree document, enforcing parallel-array consistency, child
/// index ranges, and child-after-parent ordering (every root-to-leaf walk
/// strictly descends, so traversal always terminates). A node is a leaf iff
/// its left child is -1.
fn convert_tree(document: &TreeDocument, tree: usize) -> Result<DecisionTree, ArtifactError> {
    let num_nodes = document.left_children.len();
    if num_nodes == 0 {
        return Err(ArtifactError::EmptyTree(tree));
    }

    let check = |field: &'static str, got: usize| {
        if got == num_nodes {
            Ok(())
        } else {
            Err(ArtifactError::NodeArrayMismatch {
                tree,
                field,
                got,
                num_nodes,
            })
        }
    };
    check("split_indices", document.split_indices.len())?;
    check("split_thresholds", document.split_thresholds.len())?;
    check("right_children", document.right_children.len())?;
    check("leaf_values", document.leaf_values.len())?;

    let mut left_children = Vec::with_capacity(num_nodes);
    let mut right_children = Vec::with_capacity(num_nodes);
    let mut is_leaf = Vec::with_capacity(num_nodes);

    for node in 0..num_nodes {
        let left = document.left_children[node];
        let right = document.right_children[node];

        if left == -1 {
            left_children.push(0);
            right_children.push(0);
            is_leaf.push(true);
            continue;
        }

        for child in [left, right] {
            if child < 0 || child as usize >= num_nodes {
                return Err(ArtifactError::InvalidNodeIndex {
                    tree,
                    node,
                    child,
                    num_nodes,
                });
            }
            if child as usize <= node {
                return Err(ArtifactError::ChildBeforeParent { tree, node, child });
            }
        }
        left_children.push(left as u32);
        right_children.push(right as u32);
        is_leaf.push(false);
    }

    Ok(DecisionTree::new(
        document.split_indices.clone(),
        document.split_thresholds.clone(),
        left_children,
        right_children,
        is_leaf,
        document.leaf_values.clone(),
    ))
}
