//! A reusable directed dependency graph over opaque node identities.
//!
//! An edge `a -> b` records that `b` depends on `a`, i.e. `b` must be
//! evaluated after `a`. The pass scheduler is the main consumer, but nothing
//! here knows about passes; any hashable, printable identity works.

use graph_cycles::Cycles;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;
use rustc_hash::{FxHashMap, FxHashSet};
use std::fmt::Display;
use std::hash::Hash;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("The dependency graph contains a cycle between: {}.", nodes.join(", "))]
    Cycle { nodes: Vec<String> },
    #[error("Node \"{node}\" is not present in the dependency graph.")]
    NotFound { node: String },
}

#[derive(Debug, Clone, Default)]
pub struct DepGraph<N: Clone + Eq + Hash + Display> {
    graph: DiGraph<N, ()>,
    index_of: FxHashMap<N, NodeIndex>,
}

impl<N: Clone + Eq + Hash + Display> DepGraph<N> {
    pub fn new() -> Self {
        DepGraph {
            graph: DiGraph::new(),
            index_of: FxHashMap::default(),
        }
    }

    /// Inserts `node` if it is not already present.
    pub fn add_node(&mut self, node: N) -> NodeIndex {
        if let Some(ix) = self.index_of.get(&node) {
            return *ix;
        }
        let ix = self.graph.add_node(node.clone());
        self.index_of.insert(node, ix);
        ix
    }

    /// Records that `to` must be evaluated after `from`. Both endpoints are
    /// inserted if missing; a duplicate edge is not added twice.
    pub fn add_edge(&mut self, from: N, to: N) {
        let from = self.add_node(from);
        let to = self.add_node(to);
        self.graph.update_edge(from, to, ());
    }

    pub fn contains(&self, node: &N) -> bool {
        self.index_of.contains_key(node)
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Computes a layered evaluation order over the whole graph: each layer
    /// is a set of mutually independent nodes, and every edge points from an
    /// earlier layer to a later one. The order of nodes inside a layer is
    /// unspecified.
    pub fn sorted_layers(&self) -> Result<Vec<Vec<N>>, GraphError> {
        let all: FxHashSet<NodeIndex> = self.graph.node_indices().collect();
        let layers = self.layered(&all)?;
        Ok(layers
            .into_iter()
            .map(|layer| {
                layer
                    .into_iter()
                    .map(|ix| self.graph[ix].clone())
                    .collect()
            })
            .collect())
    }

    /// The list of nodes reachable from `root`, root first, in dependency
    /// order. Fails with [GraphError::NotFound] if `root` is not in the
    /// graph, or [GraphError::Cycle] if the reachable region is cyclic.
    pub fn top_sort(&self, root: &N) -> Result<Vec<N>, GraphError> {
        let root_ix = match self.index_of.get(root) {
            Some(ix) => *ix,
            None => {
                return Err(GraphError::NotFound {
                    node: root.to_string(),
                })
            }
        };
        let mut reachable = FxHashSet::default();
        let mut dfs = Dfs::new(&self.graph, root_ix);
        while let Some(ix) = dfs.next(&self.graph) {
            reachable.insert(ix);
        }
        let layers = self.layered(&reachable)?;
        Ok(layers
            .into_iter()
            .flatten()
            .map(|ix| self.graph[ix].clone())
            .collect())
    }

    /// Kahn's algorithm restricted to `subset`: repeatedly strip the set of
    /// nodes with no incoming edges from inside the subset. A non-empty
    /// remainder with no such node means the subset contains a cycle.
    fn layered(&self, subset: &FxHashSet<NodeIndex>) -> Result<Vec<Vec<NodeIndex>>, GraphError> {
        let mut in_degree: FxHashMap<NodeIndex, usize> = subset
            .iter()
            .map(|ix| {
                let degree = self
                    .graph
                    .neighbors_directed(*ix, petgraph::Direction::Incoming)
                    .filter(|pred| subset.contains(pred))
                    .count();
                (*ix, degree)
            })
            .collect();
        let mut alive: FxHashSet<NodeIndex> = subset.clone();
        let mut layers = Vec::new();
        while !alive.is_empty() {
            // Walk node_indices() rather than the hash set so layers come out
            // in insertion order.
            let layer: Vec<NodeIndex> = self
                .graph
                .node_indices()
                .filter(|ix| alive.contains(ix) && in_degree[ix] == 0)
                .collect();
            if layer.is_empty() {
                return Err(GraphError::Cycle {
                    nodes: self.cycle_members(&alive),
                });
            }
            for ix in &layer {
                alive.remove(ix);
                for succ in self
                    .graph
                    .neighbors_directed(*ix, petgraph::Direction::Outgoing)
                {
                    if alive.contains(&succ) {
                        if let Some(degree) = in_degree.get_mut(&succ) {
                            *degree -= 1;
                        }
                    }
                }
            }
            layers.push(layer);
        }
        Ok(layers)
    }

    /// The printable names of one offending cycle among `stuck`, found with
    /// Johnson's algorithm. Falls back to the whole stuck set if the search
    /// reports nothing inside it.
    fn cycle_members(&self, stuck: &FxHashSet<NodeIndex>) -> Vec<String> {
        for cycle in self.graph.cycles() {
            if cycle.iter().all(|ix| stuck.contains(ix)) {
                return cycle.iter().map(|ix| self.graph[*ix].to_string()).collect();
            }
        }
        stuck.iter().map(|ix| self.graph[*ix].to_string()).collect()
    }
}
