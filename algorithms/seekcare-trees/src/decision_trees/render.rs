//! Turning a fitted tree into an artifact on disk
//!
use std::ffi::OsString;
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use seekcare::error::{Error, Result};
use seekcare::{Float, Label};
use tracing::debug;

use super::DecisionTree;

/// Something that can draw a decision tree to a file
///
/// The renderer receives the location chosen by the caller and returns the path of the artifact
/// it produced, which may differ from the given location (e.g. an added file extension).
/// Failures are reported as [`Error::Visualization`].
pub trait TreeRenderer<F: Float, L: Label> {
    fn render(&self, tree: &DecisionTree<F, L>, path: &Path) -> Result<PathBuf>;
}

/// Writes the Graphviz DOT source of the tree and nothing else
#[derive(Debug, Clone, Default)]
pub struct DotRenderer;

impl<F: Float, L: Label + Display> TreeRenderer<F, L> for DotRenderer {
    fn render(&self, tree: &DecisionTree<F, L>, path: &Path) -> Result<PathBuf> {
        write_dot(tree, path)?;

        Ok(path.to_path_buf())
    }
}

/// Writes the DOT source to the given path and lays it out with the Graphviz `dot` program
///
/// The image is placed next to the source, with the format appended as extension, so rendering
/// to `tree.gv` produces `tree.gv` and `tree.gv.png`.
#[derive(Debug, Clone)]
pub struct GraphvizRenderer {
    program: PathBuf,
    format: String,
}

impl Default for GraphvizRenderer {
    fn default() -> Self {
        GraphvizRenderer {
            program: PathBuf::from("dot"),
            format: "png".to_string(),
        }
    }
}

impl GraphvizRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use another Graphviz layout program, defaults to `dot` from the `PATH`
    pub fn program<P: Into<PathBuf>>(mut self, program: P) -> Self {
        self.program = program.into();
        self
    }

    /// Output format passed to Graphviz as `-T<format>`, defaults to `png`
    pub fn format<S: Into<String>>(mut self, format: S) -> Self {
        self.format = format.into();
        self
    }

    fn image_path(&self, path: &Path) -> PathBuf {
        let mut image = OsString::from(path.as_os_str());
        image.push(".");
        image.push(&self.format);

        PathBuf::from(image)
    }
}

impl<F: Float, L: Label + Display> TreeRenderer<F, L> for GraphvizRenderer {
    fn render(&self, tree: &DecisionTree<F, L>, path: &Path) -> Result<PathBuf> {
        write_dot(tree, path)?;

        let image = self.image_path(path);
        debug!(
            program = %self.program.display(),
            source = %path.display(),
            image = %image.display(),
            "running graphviz"
        );

        let output = Command::new(&self.program)
            .arg(format!("-T{}", self.format))
            .arg(path)
            .arg("-o")
            .arg(&image)
            .output()
            .map_err(|err| {
                Error::Visualization(format!(
                    "could not run `{}`: {}",
                    self.program.display(),
                    err
                ))
            })?;

        if !output.status.success() {
            return Err(Error::Visualization(format!(
                "`{}` exited with {}: {}",
                self.program.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(image)
    }
}

fn write_dot<F: Float, L: Label + Display>(tree: &DecisionTree<F, L>, path: &Path) -> Result<()> {
    let source = tree.export_to_dot().to_string();

    fs::write(path, source).map_err(|err| {
        Error::Visualization(format!("could not write {}: {}", path.display(), err))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use seekcare::{traits::Fit, Dataset};

    fn tree() -> DecisionTree<f64, String> {
        let dataset = Dataset::new(
            array![[0.], [1.], [0.], [1.]],
            array!["No", "Yes", "No", "Yes"].map(|x| x.to_string()),
        )
        .with_feature_names(vec!["family_history_Yes"]);

        DecisionTree::params().fit(&dataset).unwrap()
    }

    #[test]
    fn dot_renderer_writes_the_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tree.gv");

        let artifact = DotRenderer.render(&tree(), &path).unwrap();

        assert_eq!(artifact, path);
        let source = fs::read_to_string(&artifact).unwrap();
        assert!(source.contains("family_history_Yes <= 0.5"));
    }

    #[test]
    fn image_path_appends_the_format() {
        let renderer = GraphvizRenderer::new().format("svg");

        assert_eq!(
            renderer.image_path(Path::new("out/tree.gv")),
            PathBuf::from("out/tree.gv.svg")
        );
    }

    #[test]
    fn missing_graphviz_is_a_visualization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tree.gv");
        let renderer = GraphvizRenderer::new().program(dir.path().join("no-such-dot"));

        let res = renderer.render(&tree(), &path);

        assert!(matches!(res, Err(Error::Visualization(_))));
        // the source is written before graphviz is invoked
        assert!(path.exists());
    }

    #[test]
    fn unwritable_location_is_a_visualization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("tree.gv");

        let res = DotRenderer.render(&tree(), &path);

        assert!(matches!(res, Err(Error::Visualization(_))));
    }
}
