//! Decision tree classifier
//!
use std::collections::HashMap;

use ndarray::{Array1, ArrayBase, Axis, Data, Ix1, Ix2};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::debug;

use super::Dot;
use super::NodeIter;
use super::{DecisionTreeValidParams, SplitQuality};
use seekcare::{
    dataset::{AsTargets, Records},
    error::Error,
    error::Result,
    traits::*,
    DatasetBase, Float, Label,
};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

/// RowMask tracks observations
///
/// The decision tree algorithm splits observations at a certain split value for a specific feature. The
/// left and right children can then only use a certain number of observations. In order to track
/// that, the observations are masked with a boolean vector, hiding all observations which are not
/// applicable in a lower tree.
struct RowMask {
    mask: Vec<bool>,
    nsamples: usize,
}

impl RowMask {
    /// Generates a RowMask without hidden observations
    fn all(nsamples: usize) -> Self {
        RowMask {
            mask: vec![true; nsamples],
            nsamples,
        }
    }

    /// Generates a RowMask where all observations are hidden
    fn none(nsamples: usize) -> Self {
        RowMask {
            mask: vec![false; nsamples],
            nsamples: 0,
        }
    }

    /// Sets the observation at the specified index as visible
    ///
    /// ### Panics
    ///
    /// If `idx` is out of bounds
    fn mark(&mut self, idx: usize) {
        self.mask[idx] = true;
        self.nsamples += 1;
    }
}

/// Sorted values of observations with indices (always for a particular feature)
struct SortedIndex<'a, F: Float> {
    feature_name: &'a str,
    sorted_values: Vec<(usize, F)>,
}

impl<'a, F: Float> SortedIndex<'a, F> {
    /// Sorts the values of a given feature in ascending order
    ///
    /// ### Returns
    ///
    /// A sorted vector of (index, value) pairs obtained by sorting the observations by
    /// the value of the specified feature.
    fn of_array_column(
        x: &ArrayBase<impl Data<Elem = F>, Ix2>,
        feature_idx: usize,
        feature_name: &'a str,
    ) -> Self {
        let sliced_column: Vec<F> = x.index_axis(Axis(1), feature_idx).to_vec();
        let mut pairs: Vec<(usize, F)> = sliced_column.into_iter().enumerate().collect();
        pairs.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Greater));

        SortedIndex {
            sorted_values: pairs,
            feature_name,
        }
    }

    /// The (index, value) pairs of observations visible in `mask`, still sorted
    fn visible(&self, mask: &RowMask) -> Vec<(usize, F)> {
        self.sorted_values
            .iter()
            .filter(|(idx, _)| mask.mask[*idx])
            .copied()
            .collect()
    }
}

/// Everything a node needs to know about the training set while the tree grows
struct GrowContext<'a, F: Float, L> {
    /// class index of every observation, into the tree's class list
    class_of: Vec<usize>,
    weights: Vec<f32>,
    nclasses: usize,
    total_weight: f32,
    sorted_indices: Vec<SortedIndex<'a, F>>,
    hyperparameters: &'a DecisionTreeValidParams<F, L>,
}

impl<'a, F: Float, L> GrowContext<'a, F, L> {
    /// Summed weight of every class over the visible observations
    fn class_weights(&self, mask: &RowMask) -> Vec<f32> {
        let mut freqs = vec![0.0; self.nclasses];

        for (idx, _) in mask.mask.iter().enumerate().filter(|(_, visible)| **visible) {
            freqs[self.class_of[idx]] += self.weights[idx];
        }

        freqs
    }

    fn impurity(&self, class_weights: &[f32]) -> f32 {
        match self.hyperparameters.split_quality() {
            SplitQuality::Gini => gini_impurity(class_weights),
            SplitQuality::Entropy => entropy(class_weights),
        }
    }
}

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone)]
/// A node in the decision tree
pub struct TreeNode<F, L> {
    feature_idx: usize,
    feature_name: String,
    split_value: F,
    impurity: F,
    impurity_decrease: F,
    class_weights: Vec<f32>,
    left_child: Option<Box<TreeNode<F, L>>>,
    right_child: Option<Box<TreeNode<F, L>>>,
    leaf_node: bool,
    prediction: L,
    depth: usize,
}

impl<F: Float, L: Label> TreeNode<F, L> {
    fn empty_leaf(prediction: L, class_weights: Vec<f32>, impurity: F, depth: usize) -> Self {
        TreeNode {
            feature_idx: 0,
            feature_name: "".to_string(),
            split_value: F::zero(),
            impurity,
            impurity_decrease: F::zero(),
            class_weights,
            left_child: None,
            right_child: None,
            leaf_node: true,
            prediction,
            depth,
        }
    }

    /// Returns true if the node has no children
    pub fn is_leaf(&self) -> bool {
        self.leaf_node
    }

    /// Returns the depth of the node in the decision tree
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Returns `Some(prediction)` for leaf nodes and `None` for internal nodes.
    pub fn prediction(&self) -> Option<L> {
        if self.is_leaf() {
            Some(self.prediction.clone())
        } else {
            None
        }
    }

    /// Returns the most common class among the observations reaching this node
    pub fn majority_class(&self) -> &L {
        &self.prediction
    }

    /// Returns both children, first left then right
    pub fn children(&self) -> Vec<&Option<Box<TreeNode<F, L>>>> {
        vec![&self.left_child, &self.right_child]
    }

    /// Return the split (feature index, value) and its weighted impurity decrease
    pub fn split(&self) -> (usize, F, F) {
        (self.feature_idx, self.split_value, self.impurity_decrease)
    }

    /// Returns the name of the feature used in the split if the node is internal,
    /// `None` otherwise
    pub fn feature_name(&self) -> Option<&String> {
        if self.leaf_node {
            None
        } else {
            Some(&self.feature_name)
        }
    }

    /// Summed sample weight per class, in the order of [`DecisionTree::classes`]
    pub fn class_weights(&self) -> &[f32] {
        &self.class_weights
    }

    /// Summed sample weight reaching this node
    pub fn weight(&self) -> f32 {
        self.class_weights.iter().sum()
    }

    /// Impurity of the observations reaching this node
    pub fn impurity(&self) -> F {
        self.impurity
    }

    /// Recursively fits the node
    fn fit(
        context: &GrowContext<F, L>,
        classes: &[L],
        mask: &RowMask,
        depth: usize,
        rng: &mut SmallRng,
    ) -> Self {
        let hyperparameters = context.hyperparameters;

        // weighted frequencies of the target classes and the modal class as prediction
        let parent_class_freq = context.class_weights(mask);
        let prediction = classes[find_modal_class(&parent_class_freq)].clone();
        let parent_score = context.impurity(&parent_class_freq);
        let total_weight = parent_class_freq.iter().sum::<f32>();

        // return empty leaf when we don't have enough samples or the maximal depth is reached
        if total_weight < hyperparameters.min_weight_split()
            || hyperparameters
                .max_depth()
                .map(|max_depth| depth >= max_depth)
                .unwrap_or(false)
        {
            return Self::empty_leaf(prediction, parent_class_freq, F::cast(parent_score), depth);
        }

        // features are visited in a random order, the first of several equally good splits wins
        let mut feature_order = (0..context.sorted_indices.len()).collect::<Vec<_>>();
        feature_order.shuffle(rng);

        let mut best = None;

        for feature_idx in feature_order {
            let visible = context.sorted_indices[feature_idx].visible(mask);

            let mut right_class_freq = parent_class_freq.clone();
            let mut left_class_freq = vec![0.0; context.nclasses];
            let mut weight_on_right_side = total_weight;
            let mut weight_on_left_side = 0.0;

            // All observations start in the right subtree and are moved one by one, in sorted
            // order, to the left subtree. Every boundary between two distinct values is a
            // candidate split with everything `<= split_value` on the left.
            for pair in visible.windows(2) {
                let (sample_idx, value) = pair[0];
                let next_value = pair[1].1;

                let sample_class = context.class_of[sample_idx];
                let sample_weight = context.weights[sample_idx];

                right_class_freq[sample_class] -= sample_weight;
                weight_on_right_side -= sample_weight;
                left_class_freq[sample_class] += sample_weight;
                weight_on_left_side += sample_weight;

                // equal values have to end up in the same subtree
                if (next_value - value).abs() < F::cast(1e-5) {
                    continue;
                }

                if weight_on_right_side < hyperparameters.min_weight_leaf()
                    || weight_on_left_side < hyperparameters.min_weight_leaf()
                {
                    continue;
                }

                let score = (weight_on_left_side * context.impurity(&left_class_freq)
                    + weight_on_right_side * context.impurity(&right_class_freq))
                    / total_weight;

                let split_value = (value + next_value) / F::cast(2.0);

                best = match best.take() {
                    None => Some((feature_idx, split_value, score)),
                    Some((_, _, best_score)) if score < best_score => {
                        Some((feature_idx, split_value, score))
                    }
                    x => x,
                };
            }
        }

        // The decrease is weighted by the share of the training set reaching this node, so that
        // splits close to the root count more towards feature importance.
        let (best_feature_idx, best_split_value, impurity_decrease) = match best {
            Some((feature_idx, split_value, best_score)) => (
                feature_idx,
                split_value,
                F::cast(total_weight / context.total_weight * (parent_score - best_score)),
            ),
            None => {
                return Self::empty_leaf(
                    prediction,
                    parent_class_freq,
                    F::cast(parent_score),
                    depth,
                )
            }
        };

        if impurity_decrease < hyperparameters.min_impurity_decrease() {
            return Self::empty_leaf(prediction, parent_class_freq, F::cast(parent_score), depth);
        }

        // determine new masks for the left and right subtrees
        let nsamples = mask.mask.len();
        let mut left_mask = RowMask::none(nsamples);
        let mut right_mask = RowMask::none(nsamples);

        for (idx, value) in &context.sorted_indices[best_feature_idx].sorted_values {
            if mask.mask[*idx] {
                if *value <= best_split_value {
                    left_mask.mark(*idx);
                } else {
                    right_mask.mark(*idx);
                }
            }
        }

        // Recurse and refit on left and right subtrees
        let left_child = if left_mask.nsamples > 0 {
            Some(Box::new(TreeNode::fit(
                context,
                classes,
                &left_mask,
                depth + 1,
                rng,
            )))
        } else {
            None
        };

        let right_child = if right_mask.nsamples > 0 {
            Some(Box::new(TreeNode::fit(
                context,
                classes,
                &right_mask,
                depth + 1,
                rng,
            )))
        } else {
            None
        };

        let leaf_node = left_child.is_none() || right_child.is_none();

        TreeNode {
            feature_idx: best_feature_idx,
            feature_name: context.sorted_indices[best_feature_idx]
                .feature_name
                .to_owned(),
            split_value: best_split_value,
            impurity: F::cast(parent_score),
            impurity_decrease,
            class_weights: parent_class_freq,
            left_child,
            right_child,
            leaf_node,
            prediction,
            depth,
        }
    }

    /// Prune tree after fitting it
    ///
    /// This removes parts of the tree which results in the same prediction for
    /// all sub-trees. This is called right after fit to ensure that the tree
    /// is small.
    fn prune(&mut self) -> Option<L> {
        if self.is_leaf() {
            return Some(self.prediction.clone());
        }

        let left = self.left_child.as_mut().and_then(|x| x.prune());
        let right = self.right_child.as_mut().and_then(|x| x.prune());

        match (left, right) {
            (Some(x), Some(y)) => {
                if x == y {
                    self.prediction = x.clone();
                    self.right_child = None;
                    self.left_child = None;
                    self.leaf_node = true;
                    self.impurity_decrease = F::zero();

                    Some(x)
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}

/// A fitted decision tree model for classification.
///
/// ### Structure
/// A decision tree structure is a binary tree where:
/// * Each internal node specifies a decision, represented by a choice of a feature and a "split value" such that all observations for which
/// `feature <= split_value` is true fall in the left subtree, while the others fall in the right subtree.
///
/// * leaf nodes make predictions, and their prediction is the most popular label in the node
///
/// ### Algorithm
///
/// Starting with a single root node, decision trees are trained recursively by applying the following rule to every
/// node considered:
///
/// * Find the best split value for each feature of the observations belonging in the node;
/// * Select the feature (and its best split value) that maximizes the quality of the split. Features are
///   visited in an order drawn from the seeded random source, ties go to the feature visited first;
/// * If the score of the split is sufficiently larger than the score of the unsplit node, then two child nodes are generated, the left one
///   containing all observations with `feature <= split value` and the right one containing the rest.
/// * If no suitable split is found, the node is marked as leaf and its prediction is set to be the most common label in the node;
///
/// The [quality score](enum.SplitQuality.html) used can be specified in the [parameters](struct.DecisionTreeParams.html).
///
/// ### Predictions
///
/// To predict the label of a sample, the tree is traversed from the root to a leaf, choosing between left and right children according to
/// the values of the features of the sample. The final prediction for the sample is the prediction of the reached leaf.
///
/// ### Example
///
/// ```rust
/// use seekcare::prelude::*;
/// use seekcare_trees::DecisionTree;
/// use ndarray::array;
///
/// let dataset = Dataset::new(
///     array![[0., 1.], [1., 1.], [0., 0.], [1., 0.]],
///     array!["No", "Yes", "No", "Yes"],
/// )
/// .with_feature_names(vec!["family_history_Yes", "tech_company_Yes"]);
///
/// let tree = DecisionTree::params().fit(&dataset).unwrap();
/// let accuracy = tree.predict(&dataset).confusion_matrix(&dataset).unwrap().accuracy();
///
/// assert!(accuracy > 0.99);
/// assert_eq!(tree.features(), vec![0]);
/// ```
///
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone)]
pub struct DecisionTree<F: Float, L: Label> {
    root_node: TreeNode<F, L>,
    num_features: usize,
    classes: Vec<L>,
    feature_names: Vec<String>,
}

impl<F: Float, L: Label, D: Data<Elem = F>> PredictInplace<ArrayBase<D, Ix2>, Array1<L>>
    for DecisionTree<F, L>
{
    /// Make predictions for each row of a matrix of features `x`.
    fn predict_inplace<'a>(&'a self, x: &'a ArrayBase<D, Ix2>, y: &mut Array1<L>) {
        assert_eq!(
            x.nrows(),
            y.len(),
            "The number of data points must match the number of output targets."
        );
        assert_eq!(
            x.ncols(),
            self.num_features,
            "The number of features must match the number of features seen during fitting."
        );

        for (row, target) in x.rows().into_iter().zip(y.iter_mut()) {
            *target = make_prediction(&row, &self.root_node);
        }
    }

    fn default_target(&self, x: &ArrayBase<D, Ix2>) -> Array1<L> {
        Array1::from_elem(x.nrows(), self.root_node.prediction.clone())
    }
}

impl<F: Float, L: Label, D, T> Fit<ArrayBase<D, Ix2>, T, Error> for DecisionTreeValidParams<F, L>
where
    D: Data<Elem = F>,
    T: AsTargets<Elem = L>,
{
    type Object = DecisionTree<F, L>;

    /// Fit a decision tree using `hyperparamters` on the dataset consisting of
    /// a matrix of features `x` and an array of labels `y`.
    fn fit(&self, dataset: &DatasetBase<ArrayBase<D, Ix2>, T>) -> Result<Self::Object> {
        let x = dataset.records();
        let targets = dataset.try_single_target()?;

        if x.nrows() == 0 {
            return Err(Error::ModelFitting(
                "cannot fit a decision tree on a dataset without samples".to_string(),
            ));
        }
        if x.nrows() != targets.len() {
            return Err(Error::ModelFitting(format!(
                "{} observations but {} labels",
                x.nrows(),
                targets.len()
            )));
        }

        let weights = (0..x.nrows())
            .map(|idx| dataset.weight_for(idx))
            .collect::<Vec<_>>();
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(Error::ModelFitting(
                "sample weights have to be finite and non-negative".to_string(),
            ));
        }

        let classes = dataset.labels_in_order()?;
        let class_of = {
            let index = classes
                .iter()
                .enumerate()
                .map(|(idx, class)| (class, idx))
                .collect::<HashMap<_, _>>();

            targets.iter().map(|label| index[label]).collect::<Vec<_>>()
        };

        let feature_names = dataset.feature_names();
        let sorted_indices: Vec<_> = (0..(x.ncols()))
            .map(|feature_idx| {
                SortedIndex::of_array_column(x, feature_idx, &feature_names[feature_idx])
            })
            .collect();

        let context = GrowContext {
            class_of,
            total_weight: weights.iter().sum(),
            weights,
            nclasses: classes.len(),
            sorted_indices,
            hyperparameters: self,
        };

        let mut rng = SmallRng::seed_from_u64(self.seed());
        let all_idxs = RowMask::all(x.nrows());
        let mut root_node = TreeNode::fit(&context, &classes, &all_idxs, 0, &mut rng);
        root_node.prune();

        let tree = DecisionTree {
            root_node,
            num_features: x.ncols(),
            classes,
            feature_names,
        };

        debug!(
            samples = x.nrows(),
            depth = tree.max_depth(),
            leaves = tree.num_leaves(),
            seed = self.seed(),
            "fitted decision tree"
        );

        Ok(tree)
    }
}

impl<F: Float, L: Label> DecisionTree<F, L> {
    /// Create a node iterator in depth-first pre-order
    pub fn iter_nodes(&self) -> NodeIter<F, L> {
        // queue of nodes yet to explore
        let queue = vec![&self.root_node];

        NodeIter::new(queue)
    }

    /// Return the indices of the features used by at least one split, in ascending order
    pub fn features(&self) -> Vec<usize> {
        let mut fitted_features = self
            .iter_nodes()
            .filter(|node| !node.is_leaf())
            .map(|node| node.feature_idx)
            .collect::<Vec<_>>();

        fitted_features.sort_unstable();
        fitted_features.dedup();

        fitted_features
    }

    /// Return the summed (weighted) impurity decrease of every feature
    pub fn total_impurity_decrease(&self) -> Vec<F> {
        let mut impurity_decrease = vec![F::zero(); self.num_features];

        for node in self.iter_nodes().filter(|node| !node.leaf_node) {
            impurity_decrease[node.feature_idx] += node.impurity_decrease;
        }

        impurity_decrease
    }

    /// Return the feature importance, i.e. the relative impurity decrease, for each feature
    ///
    /// The importances sum up to one, unless the tree consists of a single leaf. In that case
    /// no feature contributes and all importances are zero.
    pub fn feature_importance(&self) -> Vec<F> {
        let total_impurity_decrease = self.total_impurity_decrease();
        let sum: F = total_impurity_decrease.iter().cloned().sum();

        if sum <= F::zero() {
            return vec![F::zero(); self.num_features];
        }

        total_impurity_decrease
            .into_iter()
            .map(|x| x / sum)
            .collect()
    }

    /// Return root node of the tree
    pub fn root_node(&self) -> &TreeNode<F, L> {
        &self.root_node
    }

    /// Return max depth of the tree
    pub fn max_depth(&self) -> usize {
        self.iter_nodes()
            .fold(0, |max, node| usize::max(max, node.depth))
    }

    /// Return the number of leaves in this tree
    pub fn num_leaves(&self) -> usize {
        self.iter_nodes().filter(|node| node.is_leaf()).count()
    }

    /// Return the number of features the tree was fitted on
    pub fn num_features(&self) -> usize {
        self.num_features
    }

    /// Return the classes seen during fitting, in order of first appearance
    pub fn classes(&self) -> &[L] {
        &self.classes
    }

    /// Return the names of the features the tree was fitted on
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }
}

impl<F: Float, L: Label + std::fmt::Display> DecisionTree<F, L> {
    /// Generates a [`Dot`](struct.Dot.html) structure to print the fitted tree in the Graphviz
    /// language, with the following default parameters:
    ///
    /// * `filled=true`
    /// * `rounded=true`
    /// * `impurity=false`
    ///
    pub fn export_to_dot(&self) -> Dot<F, L> {
        Dot::new(self)
    }
}

/// Classify a sample &x recursively using the tree node `node`.
fn make_prediction<F: Float, L: Label>(
    x: &ArrayBase<impl Data<Elem = F>, Ix1>,
    node: &TreeNode<F, L>,
) -> L {
    match (&node.left_child, &node.right_child) {
        (Some(left), Some(right)) if !node.leaf_node => {
            if x[node.feature_idx] <= node.split_value {
                make_prediction(x, left)
            } else {
                make_prediction(x, right)
            }
        }
        _ => node.prediction.clone(),
    }
}

/// Finds the most frequent class for a vector of class frequencies. If two
/// classes have the same weight then the first class with that frequency is
/// returned.
fn find_modal_class(class_freq: &[f32]) -> usize {
    class_freq
        .iter()
        .enumerate()
        .fold((0, f32::NEG_INFINITY), |(best_idx, best_freq), (idx, freq)| {
            if *freq > best_freq {
                (idx, *freq)
            } else {
                (best_idx, best_freq)
            }
        })
        .0
}

/// Given the class frequencies calculates the gini impurity of the subset.
fn gini_impurity(class_freq: &[f32]) -> f32 {
    let n_samples = class_freq.iter().sum::<f32>();
    if n_samples <= 0.0 {
        return 0.0;
    }

    let purity = class_freq
        .iter()
        .map(|x| x.max(0.0) / n_samples)
        .map(|x| x * x)
        .sum::<f32>();

    (1.0 - purity).max(0.0)
}

/// Given the class frequencies calculates the entropy of the subset.
fn entropy(class_freq: &[f32]) -> f32 {
    let n_samples = class_freq.iter().sum::<f32>();
    if n_samples <= 0.0 {
        return 0.0;
    }

    class_freq
        .iter()
        .map(|x| x / n_samples)
        .map(|x| if x > 0.0 { -x * x.log2() } else { 0.0 })
        .sum()
}
