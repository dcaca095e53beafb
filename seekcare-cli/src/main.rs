use std::path::PathBuf;
use std::time::Duration;

use seekcare::ParamGuard;
use seekcare_search::{Pipeline, SearchParams};
use seekcare_trees::{DotRenderer, GraphvizRenderer};
use structopt::StructOpt;
use tracing::info;

mod logging;

/// Predict from a mental-health survey whether respondents seek treatment
///
/// Prints the best test split and the best depth limit with their test accuracies, the most
/// important features and where the depth-limited tree was rendered to.
#[derive(Debug, StructOpt)]
#[structopt(name = "seekcare")]
struct Options {
    /// Survey as CSV, gzipped if the name ends with `.gz`
    #[structopt(parse(from_os_str))]
    input: PathBuf,
    #[structopt(short = "o", long = "output", default_value = "tree.gv", parse(from_os_str))]
    /// Where the DOT source of the tree is written, the image gets the extension `.png` appended
    output: PathBuf,
    #[structopt(short = "s", long = "seed", default_value = "0")]
    /// Seed of the partitions and of the tie-breaking between equally good splits
    seed: u64,
    #[structopt(long = "dot-only")]
    /// Only write the DOT source, do not run Graphviz
    dot_only: bool,
    #[structopt(long = "no-render")]
    /// Do not render the tree at all
    no_render: bool,
    #[structopt(long = "time-budget-secs")]
    /// Give up if a search takes longer than this many seconds
    time_budget_secs: Option<u64>,
    #[structopt(short = "k", long = "top-features", default_value = "5")]
    /// Number of feature importances to print
    top_features: usize,
}

impl Options {
    fn search_params(&self) -> SearchParams {
        SearchParams::new()
            .seed(self.seed)
            .time_budget(self.time_budget_secs.map(Duration::from_secs))
    }

    fn pipeline(&self) -> Result<Pipeline, seekcare::error::Error> {
        let pipeline = Pipeline::new(self.search_params().check()?);

        let pipeline = match (self.no_render, self.dot_only) {
            (true, _) => pipeline,
            (false, true) => pipeline.render_with(DotRenderer, &self.output),
            (false, false) => pipeline.render_with(GraphvizRenderer::new(), &self.output),
        };

        Ok(pipeline)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let opt = Options::from_args();
    logging::init()?;

    let dataset = seekcare_datasets::load_survey(&opt.input)?;
    info!(input = %opt.input.display(), "loaded survey");

    let report = opt.pipeline()?.run(&dataset)?;

    println!("{}", report);

    let importance = report.feature_importance();
    if !importance.is_empty() {
        println!();
        println!("Feature importance:");
        for (name, value) in importance.iter().take(opt.top_features) {
            println!("  {:<40} {:.4}", name, value);
        }
    }

    // rendering problems were logged by the pipeline and do not fail the run
    if let Some(artifact) = report.artifact() {
        println!();
        println!("Tree rendered to {}", artifact.display());
    }

    Ok(())
}
