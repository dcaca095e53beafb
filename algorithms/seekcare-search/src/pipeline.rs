use std::fmt;
use std::path::{Path, PathBuf};

use rand::rngs::SmallRng;
use rand::SeedableRng;
use seekcare::prelude::*;
use seekcare_trees::TreeRenderer;
use tracing::{info, warn};

use crate::{
    best_max_depth, best_test_split, train_models, DepthOutcome, SearchValidParams, SplitOutcome,
    TrainedModels,
};

/// Split search, depth search, final training and rendering in one go
///
/// All randomness comes from a single `SmallRng` seeded with the seed of the search parameters,
/// so two runs with equal seeds on equal data produce equal reports.
///
/// ### Example
///
/// ```rust
/// use ndarray::{Array1, Array2};
/// use seekcare::prelude::*;
/// use seekcare_search::{Pipeline, SearchParams};
///
/// let records = Array2::from_shape_fn((60, 2), |(i, j)| ((i + j) % 2) as f64);
/// let targets = (0..60)
///     .map(|i| if i % 2 == 0 { "No" } else { "Yes" }.to_string())
///     .collect::<Array1<_>>();
/// let dataset = Dataset::new(records, targets);
///
/// let report = Pipeline::new(SearchParams::new().seed(7).check_unwrap())
///     .run(&dataset)
///     .unwrap();
///
/// assert!([0.2, 0.3, 0.4].contains(&report.split().ratio()));
/// assert!(report.depth().depth() != 1);
/// ```
pub struct Pipeline {
    params: SearchValidParams,
    renderer: Option<(Box<dyn TreeRenderer<f64, String>>, PathBuf)>,
}

impl Pipeline {
    pub fn new(params: SearchValidParams) -> Pipeline {
        Pipeline {
            params,
            renderer: None,
        }
    }

    /// Render the depth-limited tree to `path` once it is trained
    pub fn render_with<T, P>(mut self, renderer: T, path: P) -> Pipeline
    where
        T: TreeRenderer<f64, String> + 'static,
        P: Into<PathBuf>,
    {
        self.renderer = Some((Box::new(renderer), path.into()));
        self
    }

    pub fn params(&self) -> &SearchValidParams {
        &self.params
    }

    /// Run every stage on `dataset`
    ///
    /// A failing search or training stage fails the run. A failing renderer does not: its error
    /// is kept in the report next to the accuracies.
    pub fn run(&self, dataset: &Dataset<f64, String>) -> Result<Report> {
        let mut rng = SmallRng::seed_from_u64(self.params.seed());

        info!(
            samples = dataset.nsamples(),
            features = dataset.nfeatures(),
            seed = self.params.seed(),
            "starting search"
        );

        let split = best_test_split(dataset, &self.params, &mut rng)?;
        let (train, test) = dataset.shuffle_split(split.ratio(), &mut rng)?;

        let depth = best_max_depth(&train, &test, &self.params, &mut rng)?;
        let models = train_models(&train, &test, &depth, &self.params, &mut rng)?;

        let (artifact, visualization_error) = match &self.renderer {
            Some((renderer, path)) => match render(renderer.as_ref(), &models, path) {
                Ok(artifact) => (Some(artifact), None),
                Err(err) => (None, Some(err)),
            },
            None => (None, None),
        };

        Ok(Report {
            split,
            depth,
            models,
            artifact,
            visualization_error,
        })
    }
}

fn render(
    renderer: &dyn TreeRenderer<f64, String>,
    models: &TrainedModels,
    path: &Path,
) -> Result<PathBuf> {
    match renderer.render(models.limited(), path) {
        Ok(artifact) => {
            info!(artifact = %artifact.display(), "rendered tree");
            Ok(artifact)
        }
        Err(err) => {
            warn!(error = %err, "could not render tree");
            Err(err)
        }
    }
}

/// What a [`Pipeline`] run found
///
/// Displays as the two accuracy lines
///
/// ```text
/// Best Split: 0.3 Test Accuracy: 0.82
/// Best Max Depth: 4 Test Accuracy: 0.84
/// ```
///
/// where the first accuracy belongs to the unconstrained tree and the second one to the
/// depth-limited tree.
#[derive(Debug)]
pub struct Report {
    split: SplitOutcome,
    depth: DepthOutcome,
    models: TrainedModels,
    artifact: Option<PathBuf>,
    visualization_error: Option<Error>,
}

impl Report {
    pub fn split(&self) -> &SplitOutcome {
        &self.split
    }

    pub fn depth(&self) -> &DepthOutcome {
        &self.depth
    }

    pub fn models(&self) -> &TrainedModels {
        &self.models
    }

    /// The file written by the renderer, if rendering was requested and succeeded
    pub fn artifact(&self) -> Option<&Path> {
        self.artifact.as_deref()
    }

    /// Why rendering failed, if it did
    pub fn visualization_error(&self) -> Option<&Error> {
        self.visualization_error.as_ref()
    }

    /// Feature importances of the depth-limited tree, most important first
    ///
    /// Features the tree never splits on are left out.
    pub fn feature_importance(&self) -> Vec<(String, f64)> {
        let tree = self.models.limited();
        let mut importance = tree
            .feature_names()
            .iter()
            .cloned()
            .zip(tree.feature_importance())
            .filter(|(_, importance)| *importance > 0.0)
            .collect::<Vec<_>>();

        // stable, so equally important features keep their column order
        importance.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        importance
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            "Best Split: {:.1} Test Accuracy: {}",
            self.split.ratio(),
            self.models.unconstrained_accuracy()
        )?;
        write!(
            f,
            "Best Max Depth: {} Test Accuracy: {}",
            self.depth.depth(),
            self.models.limited_accuracy()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SearchParams;
    use ndarray::{Array1, Array2};
    use seekcare_trees::{DecisionTree, DotRenderer};

    /// The label follows the first feature, the second feature is noise
    fn dataset(nsamples: usize) -> Dataset<f64, String> {
        let records = Array2::from_shape_fn((nsamples, 2), |(i, j)| match j {
            0 => (i % 2) as f64,
            _ => ((i * 7) % 3) as f64,
        });
        let targets = (0..nsamples)
            .map(|i| if i % 2 == 1 { "Yes" } else { "No" }.to_string())
            .collect::<Array1<_>>();

        Dataset::new(records, targets).with_feature_names(vec!["family_history_Yes", "noise"])
    }

    struct FailingRenderer;

    impl TreeRenderer<f64, String> for FailingRenderer {
        fn render(&self, _: &DecisionTree<f64, String>, _: &Path) -> Result<PathBuf> {
            Err(Error::Visualization("no backend".to_string()))
        }
    }

    #[test]
    fn report_prints_two_lines() -> Result<()> {
        let report = Pipeline::new(SearchParams::new().check_unwrap()).run(&dataset(50))?;
        let printed = report.to_string();
        let lines = printed.lines().collect::<Vec<_>>();

        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            format!(
                "Best Split: {:.1} Test Accuracy: {}",
                report.split().ratio(),
                report.models().unconstrained_accuracy()
            )
        );
        assert_eq!(
            lines[1],
            format!(
                "Best Max Depth: {} Test Accuracy: {}",
                report.depth().depth(),
                report.models().limited_accuracy()
            )
        );

        Ok(())
    }

    #[test]
    fn importance_names_the_informative_feature() -> Result<()> {
        let report = Pipeline::new(SearchParams::new().check_unwrap()).run(&dataset(50))?;

        assert_eq!(
            report.feature_importance(),
            vec![("family_history_Yes".to_string(), 1.0)]
        );

        Ok(())
    }

    #[test]
    fn renderer_failure_keeps_the_accuracies() -> Result<()> {
        let params = SearchParams::new().seed(9).check_unwrap();

        let plain = Pipeline::new(params).run(&dataset(40))?;
        let failing = Pipeline::new(params)
            .render_with(FailingRenderer, "tree.gv")
            .run(&dataset(40))?;

        assert!(matches!(
            failing.visualization_error(),
            Some(Error::Visualization(_))
        ));
        assert_eq!(failing.artifact(), None);
        assert_eq!(plain.to_string(), failing.to_string());

        Ok(())
    }

    #[test]
    fn renderer_receives_the_limited_tree() -> Result<()> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tree.gv");

        let report = Pipeline::new(SearchParams::new().check_unwrap())
            .render_with(DotRenderer, path.clone())
            .run(&dataset(40))?;

        assert_eq!(report.artifact(), Some(path.as_path()));
        assert!(report.visualization_error().is_none());
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            report.models().limited().export_to_dot().to_string()
        );

        Ok(())
    }

    #[test]
    fn empty_dataset_fails_before_training() {
        let res = Pipeline::new(SearchParams::new().check_unwrap()).run(&dataset(0));

        assert!(matches!(res, Err(Error::EmptyDataset)));
    }
}
