//! The pass abstraction and the registry that schedules passes.
//!
//! A pass is either an analyzer (diagnostics only) or a transformer (may
//! rewrite nodes). Each pass declares which passes must have run before it;
//! the registry turns those edges into a layered schedule, so passes that
//! consume another pass's output always run after it, and passes inside one
//! layer are mutually independent.

use crate::error::AnalysisResult;
use crate::graph::{DepGraph, GraphError};
use crate::language::Tree;
use crate::semantic_analysis::{ReferenceResolver, ScopeTagger, TypeCheck};
use crate::style::StyleChecker;

use indexmap::IndexMap;
use rill_error::error::AnalysisError;

pub type PassName = &'static str;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassKind {
    /// Only reports diagnostics (and may annotate metadata); never replaces
    /// nodes.
    Analyzer,
    /// May replace subtrees through the rewrite protocol.
    Transformer,
}

pub trait Pass: Send + Sync {
    fn name(&self) -> PassName;

    fn kind(&self) -> PassKind;

    /// The passes whose output this pass consumes.
    fn runs_after(&self) -> &'static [PassName] {
        &[]
    }

    /// Applies the pass to one file's tree.
    fn run(&self, tree: &mut Tree) -> AnalysisResult<()>;
}

/// The set of registered passes, in registration order. The dependency
/// graph over them is rebuilt from scratch for every schedule request.
#[derive(Default)]
pub struct PassRegistry {
    passes: IndexMap<PassName, Box<dyn Pass>>,
}

impl PassRegistry {
    pub fn new() -> PassRegistry {
        PassRegistry {
            passes: IndexMap::new(),
        }
    }

    /// The standard Rill pipeline: scope tagging, style lints, reference
    /// resolution, type checking.
    pub fn with_default_passes() -> PassRegistry {
        let mut registry = PassRegistry::new();
        registry.register(Box::new(ScopeTagger));
        registry.register(Box::new(StyleChecker));
        registry.register(Box::new(ReferenceResolver));
        registry.register(Box::new(TypeCheck));
        registry
    }

    /// Registers a pass, replacing any earlier pass with the same name.
    pub fn register(&mut self, pass: Box<dyn Pass>) {
        self.passes.insert(pass.name(), pass);
    }

    pub fn get(&self, name: PassName) -> Option<&dyn Pass> {
        self.passes.get(name).map(|pass| pass.as_ref())
    }

    pub fn names(&self) -> impl Iterator<Item = PassName> + '_ {
        self.passes.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.passes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }

    /// Computes the layered execution order for the registered passes.
    pub fn sorted_layers(&self) -> Result<Vec<Vec<&dyn Pass>>, AnalysisError> {
        let mut graph: DepGraph<PassName> = DepGraph::new();
        for name in self.passes.keys() {
            graph.add_node(*name);
        }
        for (name, pass) in &self.passes {
            for dependency in pass.runs_after() {
                if !self.passes.contains_key(dependency) {
                    return Err(AnalysisError::UnknownPass {
                        name: dependency.to_string(),
                    });
                }
                graph.add_edge(*dependency, *name);
            }
        }
        let layers = graph.sorted_layers().map_err(|error| match error {
            GraphError::Cycle { nodes } => AnalysisError::DependencyCycle { passes: nodes },
            GraphError::NotFound { node } => AnalysisError::UnknownPass { name: node },
        })?;
        Ok(layers
            .into_iter()
            .map(|layer| {
                layer
                    .into_iter()
                    .map(|name| self.passes[name].as_ref())
                    .collect()
            })
            .collect())
    }
}
