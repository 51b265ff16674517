//! The arena-backed syntax tree and its rewrite protocol.
//!
//! Nodes live in a flat arena and refer to each other through [NodeId]
//! handles; each slot carries a back-reference to its parent. Replacing a
//! subtree swaps a single child slot in the parent, so the rest of the tree
//! is untouched and sibling order is preserved. Detached slots stay in the
//! arena but are no longer reachable from the root.

use super::node::NodeKind;
use crate::error::AnalysisResult;
use crate::semantic_analysis::Scope;

use rill_error::error::AnalysisError;
use rill_error::report::Report;
use rill_types::Span;
use std::{path::PathBuf, sync::Arc};

/// A handle into a [Tree]'s node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
    parent: Option<NodeId>,
    scope: Option<Arc<Scope>>,
}

impl Node {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn scope(&self) -> Option<&Arc<Scope>> {
        self.scope.as_ref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Traversal {
    PreOrder,
    PostOrder,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    nodes: Vec<Node>,
    root: Option<NodeId>,
    path: Option<Arc<PathBuf>>,
}

impl Tree {
    pub fn new(path: Option<Arc<PathBuf>>) -> Tree {
        Tree {
            nodes: Vec::new(),
            root: None,
            path,
        }
    }

    pub fn path(&self) -> Option<&Arc<PathBuf>> {
        self.path.as_ref()
    }

    /// Inserts a node into the arena and adopts the children its kind refers
    /// to. Trees are built bottom-up: children must already be in the arena
    /// and must not belong to another parent yet.
    pub fn insert(&mut self, kind: NodeKind, span: Span) -> NodeId {
        let id = NodeId(self.nodes.len());
        for child in kind.children() {
            let child = &mut self.nodes[child.0];
            assert!(
                child.parent.is_none(),
                "a node cannot be adopted by two parents"
            );
            child.parent = Some(id);
        }
        self.nodes.push(Node {
            kind,
            span,
            parent: None,
            scope: None,
        });
        id
    }

    pub fn set_root(&mut self, id: NodeId) {
        assert!(
            self.nodes[id.0].parent.is_none(),
            "the root of a tree cannot have a parent"
        );
        self.root = Some(id);
    }

    /// The unique reachable node without a parent.
    pub fn root(&self) -> NodeId {
        self.root.expect("the tree root must be set before use")
    }

    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    pub fn span(&self, id: NodeId) -> Span {
        self.nodes[id.0].span.clone()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn scope(&self, id: NodeId) -> Option<&Arc<Scope>> {
        self.nodes[id.0].scope.as_ref()
    }

    pub(crate) fn set_scope(&mut self, id: NodeId, scope: Arc<Scope>) {
        self.nodes[id.0].scope = Some(scope);
    }

    /// The number of slots in the arena, including detached ones.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every node reachable from the root, in the requested order.
    pub fn flatten(&self, order: Traversal) -> Vec<NodeId> {
        let root = self.root();
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![root];
        match order {
            Traversal::PreOrder => {
                while let Some(id) = stack.pop() {
                    out.push(id);
                    let children = self.nodes[id.0].kind.children();
                    for child in children.into_iter().rev() {
                        stack.push(child);
                    }
                }
            }
            Traversal::PostOrder => {
                while let Some(id) = stack.pop() {
                    out.push(id);
                    for child in self.nodes[id.0].kind.children() {
                        stack.push(child);
                    }
                }
                out.reverse();
            }
        }
        out
    }

    /// Swaps `old` for `new` in old's parent, by identity. The parent keeps
    /// all of its other children in order; `new` takes over old's position
    /// and parent back-reference, and `old` is detached. Replacing the root
    /// re-points the tree at `new`.
    pub fn replace(&mut self, old: NodeId, new: NodeId) -> Result<(), AnalysisError> {
        if self.nodes[new.0].parent.is_some() {
            return Err(AnalysisError::Internal(
                "a replacement node must not already have a parent",
                self.span(new),
            ));
        }
        let parent = match self.nodes[old.0].parent {
            Some(parent) => parent,
            None => {
                if self.root == Some(old) {
                    self.root = Some(new);
                    return Ok(());
                }
                return Err(AnalysisError::Internal(
                    "cannot replace a detached node",
                    self.span(old),
                ));
            }
        };
        if !self.nodes[parent.0].kind.replace_child(old, new) {
            return Err(AnalysisError::Internal(
                "a node's parent does not list it as a child",
                self.span(old),
            ));
        }
        self.nodes[new.0].parent = Some(parent);
        self.nodes[old.0].parent = None;
        Ok(())
    }

    /// Runs one rewrite pass over the tree: post-order, so children are
    /// visited before their parents, with the root transformed last. The
    /// callback returns `None` to keep a node (the identity transform for
    /// variants the pass has no interest in) or the id of a freshly inserted
    /// replacement. A failing callback is recovered per node so diagnostics
    /// keep accumulating, except for a crash, which aborts the remainder of
    /// the rewrite.
    pub fn transform<F>(&mut self, mut f: F) -> AnalysisResult<()>
    where
        F: FnMut(&mut Tree, NodeId) -> AnalysisResult<Option<NodeId>>,
    {
        let mut reports: Vec<Report> = Vec::new();
        for id in self.flatten(Traversal::PostOrder) {
            let node_result = f(self, id);
            let replacement = check!(node_result, None, reports);
            if reports.iter().any(|report| report.is_crash()) {
                return crate::error::ok((), reports);
            }
            if let Some(new) = replacement {
                if let Err(fault) = self.replace(id, new) {
                    reports.push(Report::from(fault));
                    return crate::error::ok((), reports);
                }
            }
        }
        crate::error::ok((), reports)
    }
}
