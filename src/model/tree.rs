//! Decision-tree ensemble classifier.
//!
//! Trees are stored Structure-of-Arrays: parallel flat arrays indexed by node,
//! with child indices local to each tree (0 = root). One-hot inputs carry no
//! missing values, so splits are purely numeric and an out-of-range feature
//! index reads as a cold slot.

use crate::encode::FeatureVector;
use crate::model::Classifier;

// =============================================================================
// SoA tree storage
// =============================================================================

/// A single decision tree as parallel flat arrays.
#[derive(Debug, Clone)]
pub struct DecisionTree {
    /// Split feature index per node
    split_indices: Box<[u32]>,
    /// Split threshold per node
    split_thresholds: Box<[f32]>,
    /// Left child index per node (only valid for non-leaf nodes)
    left_children: Box<[u32]>,
    /// Right child index per node (only valid for non-leaf nodes)
    right_children: Box<[u32]>,
    /// Whether each node is a leaf
    is_leaf: Box<[bool]>,
    /// Leaf score (indexed by node index, only valid for leaf nodes)
    leaf_values: Box<[f32]>,
}

impl DecisionTree {
    /// Create a tree from parallel arrays.
    ///
    /// All arrays must have the same length (number of nodes).
    pub fn new(
        split_indices: Vec<u32>,
        split_thresholds: Vec<f32>,
        left_children: Vec<u32>,
        right_children: Vec<u32>,
        is_leaf: Vec<bool>,
        leaf_values: Vec<f32>,
    ) -> Self {
        let num_nodes = split_indices.len();
        debug_assert_eq!(num_nodes, split_thresholds.len());
        debug_assert_eq!(num_nodes, left_children.len());
        debug_assert_eq!(num_nodes, right_children.len());
        debug_assert_eq!(num_nodes, is_leaf.len());
        debug_assert_eq!(num_nodes, leaf_values.len());

        Self {
            split_indices: split_indices.into_boxed_slice(),
            split_thresholds: split_thresholds.into_boxed_slice(),
            left_children: left_children.into_boxed_slice(),
            right_children: right_children.into_boxed_slice(),
            is_leaf: is_leaf.into_boxed_slice(),
            leaf_values: leaf_values.into_boxed_slice(),
        }
    }

    /// Number of nodes in this tree.
    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.is_leaf.len()
    }

    /// Check if a node is a leaf.
    #[inline]
    pub fn is_leaf(&self, node_idx: u32) -> bool {
        self.is_leaf[node_idx as usize]
    }

    /// Get split feature index for a node.
    #[inline]
    pub fn split_index(&self, node_idx: u32) -> u32 {
        self.split_indices[node_idx as usize]
    }

    /// Get split threshold for a node.
    #[inline]
    pub fn split_threshold(&self, node_idx: u32) -> f32 {
        self.split_thresholds[node_idx as usize]
    }

    /// Get left child index.
    #[inline]
    pub fn left_child(&self, node_idx: u32) -> u32 {
        self.left_children[node_idx as usize]
    }

    /// Get right child index.
    #[inline]
    pub fn right_child(&self, node_idx: u32) -> u32 {
        self.right_children[node_idx as usize]
    }

    /// Get leaf score for a node.
    #[inline]
    pub fn leaf_value(&self, node_idx: u32) -> f32 {
        self.leaf_values[node_idx as usize]
    }

    /// Traverse the tree to the leaf for the given feature row.
    ///
    /// Features beyond the row length read as 0.0 (a cold one-hot slot).
    pub fn predict_row(&self, features: &[f32]) -> f32 {
        let mut idx = 0u32; // Start at root

        while !self.is_leaf(idx) {
            let feat_idx = self.split_index(idx) as usize;
            let fvalue = features.get(feat_idx).copied().unwrap_or(0.0);

            idx = if fvalue < self.split_threshold(idx) {
                self.left_child(idx)
            } else {
                self.right_child(idx)
            };
        }

        self.leaf_value(idx)
    }
}

/// Builder for constructing a [`DecisionTree`] from individual nodes.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    split_indices: Vec<u32>,
    split_thresholds: Vec<f32>,
    left_children: Vec<u32>,
    right_children: Vec<u32>,
    is_leaf: Vec<bool>,
    leaf_values: Vec<f32>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a split node. Returns the node index.
    pub fn add_split(
        &mut self,
        feature_index: u32,
        threshold: f32,
        left_child: u32,
        right_child: u32,
    ) -> u32 {
        let idx = self.split_indices.len() as u32;
        self.split_indices.push(feature_index);
        self.split_thresholds.push(threshold);
        self.left_children.push(left_child);
        self.right_children.push(right_child);
        self.is_leaf.push(false);
        self.leaf_values.push(0.0);
        idx
    }

    /// Add a leaf node. Returns the node index.
    pub fn add_leaf(&mut self, value: f32) -> u32 {
        let idx = self.split_indices.len() as u32;
        self.split_indices.push(0);
        self.split_thresholds.push(0.0);
        self.left_children.push(0);
        self.right_children.push(0);
        self.is_leaf.push(true);
        self.leaf_values.push(value);
        idx
    }

    /// Build the tree.
    pub fn build(self) -> DecisionTree {
        DecisionTree::new(
            self.split_indices,
            self.split_thresholds,
            self.left_children,
            self.right_children,
            self.is_leaf,
            self.leaf_values,
        )
    }
}

// =============================================================================
// Tree ensemble
// =============================================================================

/// Additive ensemble where each tree contributes its leaf score to one class.
///
/// `tree_classes[i]` names the class slot tree `i` accumulates into; scoring
/// starts from `base_score` and sums leaf values per class.
#[derive(Debug, Clone)]
pub struct TreeClassifier {
    trees: Vec<DecisionTree>,
    tree_classes: Box<[u32]>,
    base_score: Box<[f32]>,
    num_features: usize,
    num_classes: usize,
}

impl TreeClassifier {
    /// Creates an ensemble from trees and their class assignments.
    ///
    /// # Panics
    ///
    /// Panics if the shape is inconsistent: class assignments must pair with
    /// trees one-to-one, every assignment must name a valid class, and the
    /// base score must carry one slot per class. Loaders validate artifacts
    /// before construction, so this only fires on programming errors.
    pub fn new(
        trees: Vec<DecisionTree>,
        tree_classes: Vec<u32>,
        base_score: Vec<f32>,
        num_features: usize,
        num_classes: usize,
    ) -> Self {
        assert_eq!(
            trees.len(),
            tree_classes.len(),
            "each tree needs exactly one class assignment"
        );
        assert_eq!(
            base_score.len(),
            num_classes,
            "base score must carry one slot per class"
        );
        assert!(
            tree_classes.iter().all(|&c| (c as usize) < num_classes),
            "tree class assignment out of range"
        );
        TreeClassifier {
            trees,
            tree_classes: tree_classes.into_boxed_slice(),
            base_score: base_score.into_boxed_slice(),
            num_features,
            num_classes,
        }
    }

    /// Number of trees in the ensemble.
    pub fn num_trees(&self) -> usize {
        self.trees.len()
    }
}

impl Classifier for TreeClassifier {
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
        let mut scores = self.base_score.to_vec();
        for (tree, &class) in self.trees.iter().zip(self.tree_classes.iter()) {
            scores[class as usize] += tree.predict_row(row);
        }
        scores
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Build a simple tree:
    ///        [0] feat0 < 0.5
    ///        /          \
    ///    [1] leaf=1.0   [2] feat1 < 0.5
    ///                    /          \
    ///               [3] leaf=2.0   [4] leaf=3.0
    fn build_test_tree() -> DecisionTree {
        let mut builder = TreeBuilder::new();
        builder.add_split(0, 0.5, 1, 2);
        builder.add_leaf(1.0);
        builder.add_split(1, 0.5, 3, 4);
        builder.add_leaf(2.0);
        builder.add_leaf(3.0);
        builder.build()
    }

    /// Depth-1 tree splitting on one feature: cold slot goes left.
    fn stump(feature: u32, cold: f32, hot: f32) -> DecisionTree {
        let mut builder = TreeBuilder::new();
        builder.add_split(feature, 0.5, 1, 2);
        builder.add_leaf(cold);
        builder.add_leaf(hot);
        builder.build()
    }

    #[test]
    fn tree_structure() {
        let tree = build_test_tree();

        assert_eq!(tree.num_nodes(), 5);
        assert!(!tree.is_leaf(0));
        assert_eq!(tree.split_index(0), 0);
        assert_eq!(tree.split_threshold(0), 0.5);
        assert_eq!(tree.left_child(0), 1);
        assert_eq!(tree.right_child(0), 2);
        assert!(tree.is_leaf(1));
        assert_relative_eq!(tree.leaf_value(1), 1.0);
        assert!(tree.is_leaf(3));
        assert!(tree.is_leaf(4));
    }

    #[test]
    fn predict_row_cold_feature_goes_left() {
        let tree = build_test_tree();
        assert_relative_eq!(tree.predict_row(&[0.0, 0.0]), 1.0);
    }

    #[test]
    fn predict_row_hot_then_cold() {
        let tree = build_test_tree();
        assert_relative_eq!(tree.predict_row(&[1.0, 0.0]), 2.0);
    }

    #[test]
    fn predict_row_hot_then_hot() {
        let tree = build_test_tree();
        assert_relative_eq!(tree.predict_row(&[1.0, 1.0]), 3.0);
    }

    #[test]
    fn predict_row_out_of_range_feature_reads_cold() {
        // Split on feature 3 but the row only carries two slots.
        let tree = stump(3, -1.0, 1.0);
        assert_relative_eq!(tree.predict_row(&[1.0, 1.0]), -1.0);
    }

    #[test]
    fn ensemble_accumulates_per_class() {
        // Class 0 watches feature 0, class 1 watches feature 1.
        let ensemble = TreeClassifier::new(
            vec![stump(0, -0.5, 2.0), stump(1, -0.5, 2.0)],
            vec![0, 1],
            vec![0.0, 0.0],
            2,
            2,
        );

        let mut features = FeatureVector::zeros(2);
        features.set_hot(1);

        let scores = ensemble.scores(&features);
        assert_relative_eq!(scores[0], -0.5);
        assert_relative_eq!(scores[1], 2.0);
        assert_eq!(ensemble.predict_index(&features), 1);
    }

    #[test]
    fn ensemble_starts_from_base_score() {
        let ensemble = TreeClassifier::new(
            vec![stump(0, 0.0, 1.0)],
            vec![0],
            vec![0.25, 0.75],
            1,
            2,
        );

        let features = FeatureVector::zeros(1);
        let scores = ensemble.scores(&features);
        assert_relative_eq!(scores[0], 0.25);
        // No tree feeds class 1; the base score carries through.
        assert_relative_eq!(scores[1], 0.75);
    }

    #[test]
    fn multiple_trees_per_class_sum() {
        let ensemble = TreeClassifier::new(
            vec![stump(0, 0.0, 1.0), stump(0, 0.0, 0.5)],
            vec![0, 0],
            vec![0.0],
            1,
            1,
        );

        let mut features = FeatureVector::zeros(1);
        features.set_hot(0);

        let scores = ensemble.scores(&features);
        assert_relative_eq!(scores[0], 1.5);
    }

    #[test]
    #[should_panic(expected = "class assignment")]
    fn mismatched_tree_classes_panic() {
        TreeClassifier::new(vec![stump(0, 0.0, 1.0)], vec![0, 1], vec![0.0], 1, 1);
    }
}
