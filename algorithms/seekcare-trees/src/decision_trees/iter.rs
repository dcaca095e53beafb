use std::iter::Iterator;

use super::TreeNode;
use seekcare::{Float, Label};

/// Depth-first pre-order iterator of nodes in a decision tree
///
/// A parent is always yielded before its children and the left subtree before the right one.
pub struct NodeIter<'a, F, L> {
    stack: Vec<&'a TreeNode<F, L>>,
}

impl<'a, F, L> NodeIter<'a, F, L> {
    pub fn new(stack: Vec<&'a TreeNode<F, L>>) -> Self {
        NodeIter { stack }
    }
}

impl<'a, F: Float, L: Label> Iterator for NodeIter<'a, F, L> {
    type Item = &'a TreeNode<F, L>;

    fn next(&mut self) -> Option<Self::Item> {
        self.stack.pop().map(|node| {
            node.children()
                .into_iter()
                .rev()
                .filter_map(|x| x.as_ref())
                .for_each(|child| self.stack.push(child));

            node
        })
    }
}
