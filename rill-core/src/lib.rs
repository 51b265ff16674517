#[macro_use]
pub mod error;

pub mod graph;
pub mod language;
pub mod pass;
pub mod semantic_analysis;
mod style;
pub mod type_system;

pub use error::AnalysisResult;
pub use language::{NodeId, NodeKind, Traversal, Tree};
pub use pass::{Pass, PassKind, PassName, PassRegistry};
pub use style::{StyleChecker, STYLE_CHECKING_PASS};
pub use type_system::{unify, TypeInfo, TypeSubstMap, UnificationError};

use itertools::Itertools;
use rayon::prelude::*;
use rill_error::error::AnalysisError;
use rill_error::report::Report;
use vec1::Vec1;

/// Runs the registered passes over one file's tree, in scheduler order.
///
/// Diagnostics accumulate across passes; the first pass that fails (an
/// `Error` report, or a `Crash` from an internal fault) stops the remaining
/// passes for this file, and everything reported up to that point is
/// returned together.
pub fn analyze_module(tree: Tree, registry: &PassRegistry) -> AnalysisResult<Tree> {
    let layers = match registry.sorted_layers() {
        Ok(layers) => layers,
        Err(fault) => return error::err(Vec1::new(Report::from(fault))),
    };
    run_layers(tree, &layers)
}

/// Runs the registered passes over every file of a program. Files are
/// independent, so they are analyzed in parallel; a failing file never
/// affects its siblings. Scheduling problems (a dependency cycle, an
/// unregistered prerequisite) are reported once, before any file runs.
pub fn analyze_program(
    trees: Vec<Tree>,
    registry: &PassRegistry,
) -> Result<Vec<AnalysisResult<Tree>>, AnalysisError> {
    let layers = registry.sorted_layers()?;
    Ok(trees
        .into_par_iter()
        .map(|tree| run_layers(tree, &layers))
        .collect())
}

fn run_layers(mut tree: Tree, layers: &[Vec<&dyn Pass>]) -> AnalysisResult<Tree> {
    let mut reports: Vec<Report> = Vec::new();
    'layers: for (depth, layer) in layers.iter().enumerate() {
        tracing::debug!(
            layer = depth,
            passes = %layer.iter().map(|pass| pass.name()).join(", "),
            "running pass layer"
        );
        for pass in layer {
            let (outcome, mut pass_reports) = pass.run(&mut tree).into_parts();
            reports.append(&mut pass_reports);
            if outcome.is_none() {
                tracing::warn!(
                    pass = pass.name(),
                    "pass failed; skipping the remaining passes for this file"
                );
                break 'layers;
            }
        }
    }
    error::ok(tree, reports)
}
