//!
//! # Decision tree learning
//! `seekcare-trees` provides the classifier used to predict whether a survey respondent seeks
//! treatment, and the means to look at what it learned.
//!
//! # The big picture
//!
//! Decision Trees (DTs) are a non-parametric supervised learning method used for classification.
//! The goal is to create a model that predicts the value of a target variable by learning simple
//! decision rules inferred from the data features. Unlike most other models their decisions can be
//! drawn and read, which makes them a good fit for exploring which workplace and demographic
//! factors go along with seeking treatment.
//!
//! # Current state
//!
//! `seekcare-trees` provides
//!
//! * an [implementation](DecisionTree) of single-tree fitting for classification, with seeded
//!   tie-breaking between equally good splits
//! * [feature importances](DecisionTree::feature_importance) and a [node iterator](NodeIter)
//! * an [export](Dot) to the Graphviz DOT language and [renderers](TreeRenderer) producing files
//!

mod decision_trees;

pub use decision_trees::*;
pub use seekcare::error::Result;
