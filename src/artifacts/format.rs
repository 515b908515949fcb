//! On-disk artifact document shapes.
//!
//! These structs mirror the JSON files byte for byte; structural validation
//! and conversion to native types happen in the parent module.

use serde::{Deserialize, Serialize};

/// `vocabulary.json`: symptom names in feature-index order.
pub type VocabularyDocument = Vec<String>;

/// `labels.json`: disease names in class-index order.
pub type LabelsDocument = Vec<String>;

/// `model.json`: a tagged union over the loadable classifier kinds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "model_type", rename_all = "lowercase")]
pub enum ModelDocument {
    /// Dense linear scorer. `weights` is feature-major, class-minor, with a
    /// trailing bias row: `(num_features + 1) * num_classes` values.
    Linear {
        num_features: usize,
        num_classes: usize,
        weights: Vec<f32>,
    },
    /// Decision-tree ensemble. `tree_classes[i]` is the class tree `i`
    /// scores into; `base_score` holds one starting value per class.
    Trees {
        num_features: usize,
        num_classes: usize,
        base_score: Vec<f32>,
        tree_classes: Vec<u32>,
        trees: Vec<TreeDocument>,
    },
}

/// One tree as parallel per-node arrays, nodes in BFS order with the root at
/// index 0. A node is a leaf iff its left child is `-1`; child indices of
/// leaves are ignored. Split children must sit after their parent node
/// (breadth-first emission guarantees this). `leaf_values` carries the score
/// for leaf nodes and is ignored for split nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeDocument {
    pub split_indices: Vec<u32>,
    pub split_thresholds: Vec<f32>,
    pub left_children: Vec<i32>,
    pub right_children: Vec<i32>,
    pub leaf_values: Vec<f32>,
}
