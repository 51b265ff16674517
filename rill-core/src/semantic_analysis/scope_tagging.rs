//! Tags every node with the lexical scope it belongs to.
//!
//! The tagger carries a single current-scope cursor down the tree. A node is
//! tagged with the cursor value in force when it is visited, before any
//! scope its own children introduce: a block node belongs to its enclosing
//! scope, while the statements inside it belong to the scope the block
//! opens.

use crate::error::{ok, AnalysisResult};
use crate::language::{NodeId, NodeKind, Tree};
use crate::pass::{Pass, PassKind, PassName};
use crate::semantic_analysis::scope::Scope;

use rill_types::Ident;
use std::sync::Arc;

pub const SCOPE_TAGGING_PASS: PassName = "scope_tagging";

pub struct ScopeTagger;

impl Pass for ScopeTagger {
    fn name(&self) -> PassName {
        SCOPE_TAGGING_PASS
    }

    fn kind(&self) -> PassKind {
        PassKind::Analyzer
    }

    fn run(&self, tree: &mut Tree) -> AnalysisResult<()> {
        let root = tree.root();
        let bootstrap = match tree.kind(root) {
            NodeKind::Module(module) => Scope::global(module.name.clone()),
            // A bare tree with no module wrapper, e.g. in tests or a REPL
            // fragment.
            _ => Scope::global(Ident::new_no_span("<main>".to_string())),
        };
        let mut tagger = Tagger { next_local: 0 };
        tagger.tag(tree, root, bootstrap);
        ok((), vec![])
    }
}

struct Tagger {
    next_local: usize,
}

impl Tagger {
    fn fresh_local(&mut self, parent: Arc<Scope>) -> Arc<Scope> {
        let id = self.next_local;
        self.next_local += 1;
        Scope::local(parent, id)
    }

    fn tag(&mut self, tree: &mut Tree, node: NodeId, current: Arc<Scope>) {
        tree.set_scope(node, current.clone());
        let child_scope = match tree.kind(node) {
            // A module resets the cursor to a fresh global scope.
            NodeKind::Module(module) => Scope::global(module.name.clone()),
            // Items open an object scope at the top level and a local scope
            // anywhere deeper.
            NodeKind::FunctionDeclaration(_)
            | NodeKind::StructDeclaration(_)
            | NodeKind::EnumDeclaration(_)
            | NodeKind::TraitDeclaration(_) => {
                let name = tree
                    .kind(node)
                    .declared_name()
                    .cloned()
                    .unwrap_or_else(|| Ident::new_no_span("<anonymous>".to_string()));
                if matches!(&*current, Scope::Global { .. }) {
                    Scope::object(current, name)
                } else {
                    self.fresh_local(current)
                }
            }
            // Every block opens a local scope for its contents.
            NodeKind::CodeBlock(_) => self.fresh_local(current),
            _ => current,
        };
        for child in tree.kind(node).children() {
            self.tag(tree, child, child_scope.clone());
        }
    }
}
