use approx::assert_abs_diff_eq;
use ndarray::{Array1, Array2};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use seekcare::prelude::*;
use seekcare_trees::{DecisionTree, DotRenderer, SplitQuality, TreeRenderer};

const FEATURES: [&str; 4] = [
    "Age",
    "family_history_Yes",
    "tech_company_Yes",
    "no_employees_1-5",
];

/// Respondents with a family history mostly seek treatment, the other columns are noise
fn survey(nsamples: usize, seed: u64) -> Dataset<f64, String> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut records = Array2::zeros((nsamples, FEATURES.len()));
    let mut targets = Vec::with_capacity(nsamples);

    for mut row in records.rows_mut() {
        let family_history = rng.gen_bool(0.5);
        row[0] = rng.gen_range(18..65) as f64;
        row[1] = family_history as u8 as f64;
        row[2] = rng.gen_bool(0.7) as u8 as f64;
        row[3] = rng.gen_bool(0.2) as u8 as f64;

        let seeks = if family_history {
            rng.gen_bool(0.9)
        } else {
            rng.gen_bool(0.15)
        };
        targets.push(if seeks { "Yes" } else { "No" }.to_string());
    }

    Dataset::new(records, Array1::from(targets)).with_feature_names(FEATURES.to_vec())
}

#[test]
fn family_history_is_the_strongest_factor() -> Result<()> {
    let mut rng = SmallRng::seed_from_u64(42);
    let (train, test) = survey(600, 3).shuffle_split(0.3, &mut rng)?;

    let tree = DecisionTree::params().max_depth(Some(3)).fit(&train)?;
    let accuracy = tree.predict(&test).confusion_matrix(&test)?.accuracy();

    assert!(accuracy > 0.75, "accuracy was {}", accuracy);
    assert_eq!(
        tree.root_node().feature_name().map(|x| x.as_str()),
        Some("family_history_Yes")
    );

    let importance = tree.feature_importance();
    assert_abs_diff_eq!(importance.iter().sum::<f64>(), 1.0, epsilon = 1e-9);
    assert!(importance[1] > 0.5);

    Ok(())
}

#[test]
fn refitting_with_the_same_seed_gives_the_same_tree() -> Result<()> {
    let dataset = survey(300, 11);
    let params = DecisionTree::params()
        .split_quality(SplitQuality::Entropy)
        .seed(1234);

    let first = params.fit(&dataset)?;
    let second = params.fit(&dataset)?;

    assert_eq!(
        first.export_to_dot().to_string(),
        second.export_to_dot().to_string()
    );
    assert_eq!(first.predict(&dataset), second.predict(&dataset));

    Ok(())
}

#[test]
fn depth_limit_bounds_the_nodes() -> Result<()> {
    let dataset = survey(300, 5);

    for depth in 1..=4 {
        let tree = DecisionTree::params().max_depth(Some(depth)).fit(&dataset)?;

        assert!(tree.max_depth() <= depth);
        assert!(tree.num_leaves() <= 1 << depth);
        assert!(tree.iter_nodes().all(|node| node.depth() <= depth));
    }

    Ok(())
}

#[test]
fn nodes_are_visited_parent_first() -> Result<()> {
    let tree = DecisionTree::params()
        .max_depth(Some(3))
        .fit(&survey(200, 8))?;

    let nodes = tree.iter_nodes().collect::<Vec<_>>();

    assert_eq!(nodes[0].depth(), 0);
    assert_eq!(nodes.len(), 2 * tree.num_leaves() - 1);
    for pair in nodes.windows(2) {
        // pre-order never jumps more than one level down
        assert!(pair[1].depth() <= pair[0].depth() + 1);
    }

    Ok(())
}

#[test]
fn rendered_dot_names_the_classes() -> Result<()> {
    let tree = DecisionTree::params()
        .max_depth(Some(2))
        .fit(&survey(200, 21))?;
    let dir = tempfile::tempdir().unwrap();

    let artifact = DotRenderer.render(&tree, &dir.path().join("tree.gv"))?;
    let source = std::fs::read_to_string(artifact).unwrap();

    assert!(source.contains("class = Yes"));
    assert!(source.contains("class = No"));
    assert!(source.contains("family_history_Yes <= 0.5"));

    Ok(())
}
