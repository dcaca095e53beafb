use std::fmt::{self, Display, Write};

use super::{DecisionTree, TreeNode};
use seekcare::{Float, Label};

/// Colours assigned to the classes, in order of first appearance
const PALETTE: [(u8, u8, u8); 8] = [
    (0xe5, 0x81, 0x39),
    (0x39, 0x9d, 0xe5),
    (0x47, 0xe5, 0x39),
    (0xe5, 0x39, 0xc0),
    (0xe5, 0xd7, 0x39),
    (0x39, 0xe5, 0xe2),
    (0x7b, 0x39, 0xe5),
    (0xe5, 0x39, 0x58),
];

/// Struct to print a fitted decision tree in the Graphviz DOT language
///
/// Every node shows its split (internal nodes only), the weight of samples reaching it, the
/// weight per class and the majority class. Filled nodes are coloured by their majority class,
/// paler the less pure they are.
///
/// ### Example
///
/// ```rust
/// use seekcare::prelude::*;
/// use seekcare_trees::DecisionTree;
/// use ndarray::array;
///
/// let dataset = Dataset::new(array![[0.], [1.]], array!["No", "Yes"])
///     .with_feature_names(vec!["family_history_Yes"]);
/// let tree = DecisionTree::params().fit(&dataset).unwrap();
///
/// let dot = tree.export_to_dot().impurity(true).to_string();
/// assert!(dot.starts_with("digraph Tree {"));
/// assert!(dot.contains("family_history_Yes <= 0.5"));
/// ```
pub struct Dot<'a, F: Float, L: Label> {
    tree: &'a DecisionTree<F, L>,
    filled: bool,
    rounded: bool,
    impurity: bool,
    class_names: Option<Vec<String>>,
}

impl<'a, F: Float, L: Label + Display> Dot<'a, F, L> {
    /// Creates a new Dot structure for the decision tree
    /// with the following default parameters:
    ///
    /// * `filled=true`
    /// * `rounded=true`
    /// * `impurity=false`
    /// * class names taken from the labels
    pub fn new(tree: &'a DecisionTree<F, L>) -> Self {
        Dot {
            tree,
            filled: true,
            rounded: true,
            impurity: false,
            class_names: None,
        }
    }

    /// Colour the nodes by their majority class
    pub fn filled(mut self, filled: bool) -> Self {
        self.filled = filled;
        self
    }

    /// Draw nodes as boxes with rounded corners
    pub fn rounded(mut self, rounded: bool) -> Self {
        self.rounded = rounded;
        self
    }

    /// Show the impurity of every node
    pub fn impurity(mut self, impurity: bool) -> Self {
        self.impurity = impurity;
        self
    }

    /// Replace the label of every class, given in the order of [`DecisionTree::classes`]
    pub fn class_names<S: Into<String>>(mut self, names: Vec<S>) -> Self {
        self.class_names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    fn class_name(&self, class: &L) -> String {
        let position = self.tree.classes().iter().position(|x| x == class);

        match (&self.class_names, position) {
            (Some(names), Some(idx)) if idx < names.len() => names[idx].clone(),
            _ => class.to_string(),
        }
    }

    fn fill_color(&self, node: &TreeNode<F, L>) -> String {
        let weights = node.class_weights();
        let total = node.weight();

        let (majority, _) = weights.iter().enumerate().fold(
            (0, f32::NEG_INFINITY),
            |(best, best_weight), (idx, weight)| {
                if *weight > best_weight {
                    (idx, *weight)
                } else {
                    (best, best_weight)
                }
            },
        );

        // purity relative to the runner-up class, zero for an even split
        let alpha = if total > 0.0 {
            let mut proportions = weights.iter().map(|x| x / total).collect::<Vec<_>>();
            proportions.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));

            match proportions.as_slice() {
                [first, second, ..] if *second < 1.0 => (first - second) / (1.0 - second),
                _ => 1.0,
            }
        } else {
            0.0
        };

        let (r, g, b) = PALETTE[majority % PALETTE.len()];
        let blend = |channel: u8| (alpha * channel as f32 + (1.0 - alpha) * 255.0).round() as u8;

        format!("#{:02x}{:02x}{:02x}", blend(r), blend(g), blend(b))
    }

    fn node_label(&self, node: &TreeNode<F, L>) -> String {
        let mut label = String::new();

        if let Some(feature_name) = node.feature_name() {
            let (_, split_value, _) = node.split();
            let _ = write!(label, "{} <= {}\\n", escape(feature_name), split_value);
        }
        if self.impurity {
            let _ = write!(label, "impurity = {:.3}\\n", node.impurity());
        }

        let values = node
            .class_weights()
            .iter()
            .map(|x| x.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let _ = write!(
            label,
            "samples = {}\\nvalue = [{}]\\nclass = {}",
            node.weight(),
            values,
            escape(&self.class_name(node.majority_class()))
        );

        label
    }

    /// Writes `node` and its subtree, returns the id given to `node`
    fn write_subtree(
        &self,
        f: &mut fmt::Formatter,
        node: &TreeNode<F, L>,
        parent: Option<usize>,
        next_id: &mut usize,
    ) -> fmt::Result {
        let id = *next_id;
        *next_id += 1;

        write!(f, "{} [label=\"{}\"", id, self.node_label(node))?;
        if self.filled {
            write!(f, ", fillcolor=\"{}\"", self.fill_color(node))?;
        }
        writeln!(f, "] ;")?;

        if let Some(parent) = parent {
            // only the edges leaving the root are annotated
            match (parent, id) {
                (0, 1) => writeln!(
                    f,
                    "{} -> {} [labeldistance=2.5, labelangle=45, headlabel=\"True\"] ;",
                    parent, id
                )?,
                (0, _) => writeln!(
                    f,
                    "{} -> {} [labeldistance=2.5, labelangle=-45, headlabel=\"False\"] ;",
                    parent, id
                )?,
                _ => writeln!(f, "{} -> {} ;", parent, id)?,
            }
        }

        for child in node.children().into_iter().flatten() {
            self.write_subtree(f, child, Some(id), next_id)?;
        }

        Ok(())
    }
}

impl<'a, F: Float, L: Label + Display> Display for Dot<'a, F, L> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let style = match (self.filled, self.rounded) {
            (true, true) => "style=\"filled, rounded\", ",
            (true, false) => "style=\"filled\", ",
            (false, true) => "style=\"rounded\", ",
            (false, false) => "",
        };

        writeln!(f, "digraph Tree {{")?;
        writeln!(
            f,
            "node [shape=box, {}color=\"black\", fontname=\"helvetica\"] ;",
            style
        )?;
        writeln!(f, "edge [fontname=\"helvetica\"] ;")?;

        let mut next_id = 0;
        self.write_subtree(f, self.tree.root_node(), None, &mut next_id)?;

        writeln!(f, "}}")
    }
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
