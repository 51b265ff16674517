//! Builds the flat declaration index a resolution run works from.
//!
//! The index is rebuilt every time it is needed; it is only valid for the
//! exact tree it was collected from, since a rewrite may detach or replace
//! binding sites.

use crate::error::{ok, AnalysisResult};
use crate::language::{NodeId, NodeKind, Traversal, Tree};
use crate::semantic_analysis::scope::Scope;

use rill_error::error::AnalysisError;
use rill_error::report::Report;
use rill_error::warning::Warning;
use rill_types::{Ident, Span, Spanned};
use rustc_hash::FxHashMap;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind {
    Variable,
    Parameter,
    Function,
    Struct,
    StructField,
    Enum,
    EnumVariant,
    Trait,
}

impl DeclarationKind {
    /// Variable bindings are visible only to uses that textually follow
    /// them; every other kind of declaration is visible across its whole
    /// scope regardless of position.
    pub fn is_order_dependent(&self) -> bool {
        matches!(self, DeclarationKind::Variable)
    }
}

/// A single named binding site, recorded with the scope that owns it.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub name: Ident,
    pub node: NodeId,
    pub scope: Arc<Scope>,
    pub kind: DeclarationKind,
    /// The nearest enclosing declaration node, if any.
    pub enclosing: Option<NodeId>,
}

/// All declarations of a tree, keyed by name. A name may be bound many
/// times across different scopes.
pub type DeclarationIndex = im::OrdMap<Ident, Vec<Declaration>>;

/// Collects every binding site of the tagged tree. Duplicate definitions
/// and shadowing are diagnosed here; the index still records every site so
/// resolution can keep going and surface more diagnostics.
pub fn collect_declarations(tree: &Tree) -> AnalysisResult<DeclarationIndex> {
    let mut reports = Vec::new();
    let index = collect_declarations_into(tree, &mut reports);
    ok(index, reports)
}

pub(crate) fn collect_declarations_into(
    tree: &Tree,
    reports: &mut Vec<Report>,
) -> DeclarationIndex {
    let mut index = DeclarationIndex::default();
    let mut module_spans: FxHashMap<Ident, Span> = FxHashMap::default();
    for id in tree.flatten(Traversal::PreOrder) {
        let node = tree.get(id);
        let scope = match node.scope() {
            Some(scope) => scope.clone(),
            None => {
                reports.push(Report::from(AnalysisError::Internal(
                    "encountered an untagged node while collecting declarations",
                    node.span.clone(),
                )));
                return index;
            }
        };
        let kind = match &node.kind {
            NodeKind::Module(module) => {
                if module_spans.contains_key(&module.name) {
                    reports.push(Report::from(AnalysisError::MultipleDefinitionsOfModule {
                        name: module.name.clone(),
                        span: node.span.clone(),
                    }));
                } else {
                    module_spans.insert(module.name.clone(), node.span.clone());
                }
                continue;
            }
            NodeKind::FunctionDeclaration(_) => DeclarationKind::Function,
            NodeKind::Parameter(_) => DeclarationKind::Parameter,
            NodeKind::StructDeclaration(_) => DeclarationKind::Struct,
            NodeKind::StructField(_) => DeclarationKind::StructField,
            NodeKind::EnumDeclaration(_) => DeclarationKind::Enum,
            NodeKind::EnumVariant(_) => DeclarationKind::EnumVariant,
            NodeKind::TraitDeclaration(_) => DeclarationKind::Trait,
            NodeKind::VariableDeclaration(_) => DeclarationKind::Variable,
            _ => continue,
        };
        let name = match node.kind.declared_name() {
            Some(name) => name.clone(),
            None => continue,
        };
        if let Some(existing) = index.get(&name) {
            // Re-declaring a variable in the very same scope is an error;
            // function-like duplicates are legal here and only become an
            // ambiguity if a reference cannot tell them apart.
            if kind == DeclarationKind::Variable
                && existing
                    .iter()
                    .any(|d| d.kind == DeclarationKind::Variable && d.scope == scope)
            {
                reports.push(Report::from(AnalysisError::MultipleDefinitionsOfName {
                    name: name.clone(),
                    span: name.span(),
                }));
            }
            if matches!(kind, DeclarationKind::Variable | DeclarationKind::Parameter) {
                let shadows = existing.iter().any(|d| d.scope.is_superscope_of(&scope));
                assert_or_warn!(
                    !shadows,
                    reports,
                    name.span(),
                    Warning::ShadowsOtherSymbol { name: name.clone() }
                );
            }
        }
        let declaration = Declaration {
            name: name.clone(),
            node: id,
            scope,
            kind,
            enclosing: enclosing_declaration(tree, id),
        };
        index.entry(name).or_insert_with(Vec::new).push(declaration);
    }
    index
}

/// Walks the parent chain to the nearest node that is itself a declaration.
fn enclosing_declaration(tree: &Tree, id: NodeId) -> Option<NodeId> {
    let mut cursor = tree.parent(id);
    while let Some(ancestor) = cursor {
        match tree.kind(ancestor) {
            NodeKind::FunctionDeclaration(_)
            | NodeKind::StructDeclaration(_)
            | NodeKind::EnumDeclaration(_)
            | NodeKind::TraitDeclaration(_)
            | NodeKind::VariableDeclaration(_) => return Some(ancestor),
            _ => cursor = tree.parent(ancestor),
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::*;
    use crate::pass::Pass;
    use crate::semantic_analysis::scope_tagging::ScopeTagger;
    use rill_error::report::Severity;
    use std::sync::Arc as StdArc;

    fn ident(name: &str) -> Ident {
        Ident::new_no_span(name.to_string())
    }

    fn sp(src: &StdArc<str>, start: usize, end: usize) -> Span {
        Span::new(src.clone(), start, end, None).unwrap()
    }

    fn val(tree: &mut Tree, src: &StdArc<str>, name: &str, start: usize, end: usize) -> NodeId {
        let literal = tree.insert(
            NodeKind::Literal(Literal::Integer(0)),
            sp(src, end - 1, end),
        );
        tree.insert(
            NodeKind::VariableDeclaration(VariableDeclaration {
                name: ident(name),
                ascription: None,
                body: literal,
            }),
            sp(src, start, end),
        )
    }

    #[test]
    fn bindings_are_recorded_with_their_scope() {
        let src: StdArc<str> = " ".repeat(64).into();
        let mut tree = Tree::new(None);
        let variable = val(&mut tree, &src, "answer", 0, 10);
        let block = tree.insert(
            NodeKind::CodeBlock(CodeBlock {
                contents: vec![variable],
            }),
            sp(&src, 0, 12),
        );
        let module = tree.insert(
            NodeKind::Module(ModuleDeclaration {
                name: ident("demo"),
                body: vec![block],
            }),
            sp(&src, 0, 14),
        );
        tree.set_root(module);
        assert!(ScopeTagger.run(&mut tree).is_ok());
        let index = match collect_declarations(&tree) {
            AnalysisResult::Pure(index) => index,
            other => panic!("expected a clean collection, got {:?}", other.reports()),
        };
        let declarations = index.get(&ident("answer")).unwrap();
        assert_eq!(declarations.len(), 1);
        assert_eq!(declarations[0].kind, DeclarationKind::Variable);
        assert_eq!(declarations[0].node, variable);
        assert!(matches!(&*declarations[0].scope, Scope::Local { .. }));
    }

    #[test]
    fn redeclaring_a_variable_in_the_same_scope_is_an_error() {
        let src: StdArc<str> = " ".repeat(64).into();
        let mut tree = Tree::new(None);
        let first = val(&mut tree, &src, "x", 0, 8);
        let second = val(&mut tree, &src, "x", 10, 18);
        let block = tree.insert(
            NodeKind::CodeBlock(CodeBlock {
                contents: vec![first, second],
            }),
            sp(&src, 0, 20),
        );
        tree.set_root(block);
        assert!(ScopeTagger.run(&mut tree).is_ok());
        let result = collect_declarations(&tree);
        assert!(!result.is_ok());
        assert!(result.reports()[0]
            .message
            .contains("defined multiple times"));
    }

    #[test]
    fn duplicate_modules_are_an_error() {
        let src: StdArc<str> = " ".repeat(64).into();
        let mut tree = Tree::new(None);
        let first = tree.insert(
            NodeKind::Module(ModuleDeclaration {
                name: ident("demo"),
                body: vec![],
            }),
            sp(&src, 0, 10),
        );
        let second = tree.insert(
            NodeKind::Module(ModuleDeclaration {
                name: ident("demo"),
                body: vec![],
            }),
            sp(&src, 12, 22),
        );
        let root = tree.insert(
            NodeKind::CodeBlock(CodeBlock {
                contents: vec![first, second],
            }),
            sp(&src, 0, 24),
        );
        tree.set_root(root);
        assert!(ScopeTagger.run(&mut tree).is_ok());
        let result = collect_declarations(&tree);
        assert!(!result.is_ok());
        assert!(result.reports()[0]
            .message
            .contains("Module \"demo\" is defined multiple times"));
    }

    #[test]
    fn shadowing_an_outer_binding_warns() {
        let src: StdArc<str> = " ".repeat(64).into();
        let mut tree = Tree::new(None);
        let outer = val(&mut tree, &src, "x", 0, 8);
        let inner = val(&mut tree, &src, "x", 12, 20);
        let inner_block = tree.insert(
            NodeKind::CodeBlock(CodeBlock {
                contents: vec![inner],
            }),
            sp(&src, 10, 22),
        );
        let outer_block = tree.insert(
            NodeKind::CodeBlock(CodeBlock {
                contents: vec![outer, inner_block],
            }),
            sp(&src, 0, 24),
        );
        tree.set_root(outer_block);
        assert!(ScopeTagger.run(&mut tree).is_ok());
        let result = collect_declarations(&tree);
        assert!(result.is_ok());
        let reports = result.reports();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].severity, Severity::Warning);
        assert!(reports[0].message.contains("shadows another symbol"));
    }
}
