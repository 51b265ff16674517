//! Resolves every use of a name to exactly one declaration.
//!
//! Resolution is a rewrite: a name use that resolves is replaced with a
//! [ResolvedReference] pointing at its binding site, through the tree's
//! standard rewrite protocol. A use that does not resolve is reported and
//! left in place so the rest of the file keeps producing diagnostics.

use crate::error::{ok, AnalysisResult};
use crate::language::{NodeKind, ResolvedReference, Tree};
use crate::pass::{Pass, PassKind, PassName};
use crate::semantic_analysis::declarations::{collect_declarations_into, Declaration, DeclarationIndex};
use crate::semantic_analysis::scope::Scope;
use crate::semantic_analysis::scope_tagging::SCOPE_TAGGING_PASS;

use rill_error::error::AnalysisError;
use rill_error::report::Report;
use rill_types::{Ident, Span};
use std::sync::Arc;

pub const REFERENCE_RESOLUTION_PASS: PassName = "reference_resolution";

pub struct ReferenceResolver;

impl Pass for ReferenceResolver {
    fn name(&self) -> PassName {
        REFERENCE_RESOLUTION_PASS
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformer
    }

    fn runs_after(&self) -> &'static [PassName] {
        &[SCOPE_TAGGING_PASS]
    }

    fn run(&self, tree: &mut Tree) -> AnalysisResult<()> {
        let mut reports = Vec::new();
        let index = collect_declarations_into(tree, &mut reports);
        if reports.iter().any(|report| report.is_crash()) {
            return ok((), reports);
        }
        let transform_result = tree.transform(|tree, id| {
            let name = match tree.kind(id) {
                NodeKind::VariableExpression(expr) => expr.name.clone(),
                _ => return ok(None, vec![]),
            };
            let span = tree.span(id);
            let scope = match tree.scope(id) {
                Some(scope) => scope.clone(),
                None => {
                    return ok(
                        None,
                        vec![Report::from(AnalysisError::Internal(
                            "encountered an untagged reference during resolution",
                            span,
                        ))],
                    )
                }
            };
            match resolve_symbol(tree, &index, &scope, &name, &span) {
                Ok(declaration) => {
                    let new = tree.insert(
                        NodeKind::ResolvedReference(ResolvedReference {
                            name,
                            declaration: declaration.node,
                        }),
                        span,
                    );
                    ok(Some(new), vec![])
                }
                Err(error) => ok(None, vec![Report::from(error)]),
            }
        });
        let (_, mut transform_reports) = transform_result.into_parts();
        reports.append(&mut transform_reports);
        ok((), reports)
    }
}

/// Finds the single declaration a reference picks out, or says why it
/// cannot. Visibility: the declaration's scope must be the reference's
/// scope or an enclosing one, and a variable binding must textually precede
/// the use. When several declarations of the name are visible, the
/// narrowest enclosing scope wins; only same-depth survivors are an
/// ambiguity.
fn resolve_symbol(
    tree: &Tree,
    index: &DeclarationIndex,
    scope: &Arc<Scope>,
    name: &Ident,
    span: &Span,
) -> Result<Declaration, AnalysisError> {
    let undeclared = || AnalysisError::UnknownSymbol {
        name: name.clone(),
        span: span.clone(),
    };
    let candidates = index.get(name).ok_or_else(undeclared)?;
    let visible: Vec<&Declaration> = candidates
        .iter()
        .filter(|decl| decl.scope.is_visible_from(scope))
        .filter(|decl| {
            !decl.kind.is_order_dependent() || tree.span(decl.node).start() < span.start()
        })
        .collect();
    if visible.is_empty() {
        return Err(undeclared());
    }
    let deepest_depth = visible
        .iter()
        .map(|decl| decl.scope.depth())
        .max()
        .unwrap_or(0);
    let mut deepest: Vec<&Declaration> = visible
        .into_iter()
        .filter(|decl| decl.scope.depth() == deepest_depth)
        .collect();
    if deepest.len() > 1 && deepest.iter().all(|decl| decl.kind.is_order_dependent()) {
        // Several preceding bindings of the same name: the closest one wins.
        deepest.sort_by_key(|decl| tree.span(decl.node).start());
        return Ok(deepest[deepest.len() - 1].clone());
    }
    match deepest.as_slice() {
        [single] => Ok((*single).clone()),
        colliding => Err(AnalysisError::AmbiguousReference {
            name: name.clone(),
            span: span.clone(),
            candidates: colliding.iter().map(|decl| tree.span(decl.node)).collect(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::*;
    use rill_error::report::Severity;
    use std::sync::Arc as StdArc;

    fn ident(name: &str) -> Ident {
        Ident::new_no_span(name.to_string())
    }

    fn sp(src: &StdArc<str>, start: usize, end: usize) -> Span {
        Span::new(src.clone(), start, end, None).unwrap()
    }

    fn resolve(tree: &mut Tree) -> AnalysisResult<()> {
        let tagging = crate::semantic_analysis::ScopeTagger.run(tree);
        assert!(tagging.is_ok());
        ReferenceResolver.run(tree)
    }

    /// `val y = "test"; val x = 'y'; x`
    #[test]
    fn a_reference_resolves_to_the_closest_preceding_binding() {
        let src: StdArc<str> = " ".repeat(64).into();
        let mut tree = Tree::new(None);
        let lit_y = tree.insert(
            NodeKind::Literal(Literal::String("test".to_string())),
            sp(&src, 8, 14),
        );
        let val_y = tree.insert(
            NodeKind::VariableDeclaration(VariableDeclaration {
                name: ident("y"),
                ascription: None,
                body: lit_y,
            }),
            sp(&src, 0, 14),
        );
        let lit_x = tree.insert(
            NodeKind::Literal(Literal::Character('y')),
            sp(&src, 24, 27),
        );
        let val_x = tree.insert(
            NodeKind::VariableDeclaration(VariableDeclaration {
                name: ident("x"),
                ascription: None,
                body: lit_x,
            }),
            sp(&src, 16, 27),
        );
        let reference = tree.insert(
            NodeKind::VariableExpression(VariableExpression { name: ident("x") }),
            sp(&src, 29, 30),
        );
        let block = tree.insert(
            NodeKind::CodeBlock(CodeBlock {
                contents: vec![val_y, val_x, reference],
            }),
            sp(&src, 0, 32),
        );
        tree.set_root(block);
        assert!(resolve(&mut tree).is_ok());
        let contents = match tree.kind(tree.root()) {
            NodeKind::CodeBlock(block) => block.contents.clone(),
            _ => panic!("expected the block root"),
        };
        match tree.kind(contents[2]) {
            NodeKind::ResolvedReference(resolved) => {
                assert_eq!(resolved.declaration, val_x);
                assert_eq!(resolved.name, ident("x"));
            }
            other => panic!("expected a resolved reference, got a {}", other.friendly_name()),
        }
    }

    #[test]
    fn a_use_before_the_variable_is_declared_does_not_resolve() {
        let src: StdArc<str> = " ".repeat(64).into();
        let mut tree = Tree::new(None);
        let reference = tree.insert(
            NodeKind::VariableExpression(VariableExpression { name: ident("x") }),
            sp(&src, 0, 1),
        );
        let literal = tree.insert(NodeKind::Literal(Literal::Integer(1)), sp(&src, 12, 13));
        let val_x = tree.insert(
            NodeKind::VariableDeclaration(VariableDeclaration {
                name: ident("x"),
                ascription: None,
                body: literal,
            }),
            sp(&src, 4, 13),
        );
        let block = tree.insert(
            NodeKind::CodeBlock(CodeBlock {
                contents: vec![reference, val_x],
            }),
            sp(&src, 0, 15),
        );
        tree.set_root(block);
        let result = resolve(&mut tree);
        assert!(!result.is_ok());
        assert!(result.reports()[0]
            .message
            .contains("Symbol \"x\" does not exist in this scope"));
    }

    fn empty_fn(tree: &mut Tree, src: &StdArc<str>, name: &str, start: usize, end: usize) -> NodeId {
        let body = tree.insert(
            NodeKind::CodeBlock(CodeBlock { contents: vec![] }),
            sp(src, end - 2, end),
        );
        tree.insert(
            NodeKind::FunctionDeclaration(FunctionDeclaration {
                name: ident(name),
                parameters: vec![],
                return_ascription: None,
                body,
            }),
            sp(src, start, end),
        )
    }

    #[test]
    fn a_function_is_visible_before_its_declaration() {
        let src: StdArc<str> = " ".repeat(64).into();
        let mut tree = Tree::new(None);
        let callee = tree.insert(
            NodeKind::VariableExpression(VariableExpression { name: ident("helper") }),
            sp(&src, 2, 8),
        );
        let call = tree.insert(
            NodeKind::FunctionApplication(FunctionApplication {
                callee,
                arguments: vec![],
            }),
            sp(&src, 2, 10),
        );
        let block = tree.insert(
            NodeKind::CodeBlock(CodeBlock {
                contents: vec![call],
            }),
            sp(&src, 0, 12),
        );
        let main = tree.insert(
            NodeKind::FunctionDeclaration(FunctionDeclaration {
                name: ident("main"),
                parameters: vec![],
                return_ascription: None,
                body: block,
            }),
            sp(&src, 0, 12),
        );
        // `helper` is declared after `main` in the module body.
        let helper = empty_fn(&mut tree, &src, "helper", 20, 30);
        let module = tree.insert(
            NodeKind::Module(ModuleDeclaration {
                name: ident("demo"),
                body: vec![main, helper],
            }),
            sp(&src, 0, 32),
        );
        tree.set_root(module);
        assert!(resolve(&mut tree).is_ok());
        let call_node = match tree.kind(tree.root()) {
            NodeKind::Module(module) => module.body[0],
            _ => panic!("expected the module root"),
        };
        let body = match tree.kind(call_node) {
            NodeKind::FunctionDeclaration(decl) => decl.body,
            _ => panic!("expected main"),
        };
        let call = tree.kind(body).children()[0];
        let resolved_callee = match tree.kind(call) {
            NodeKind::FunctionApplication(app) => app.callee,
            other => panic!("expected the call, got a {}", other.friendly_name()),
        };
        match tree.kind(resolved_callee) {
            NodeKind::ResolvedReference(resolved) => assert_eq!(resolved.declaration, helper),
            other => panic!("expected a resolved callee, got a {}", other.friendly_name()),
        }
    }

    #[test]
    fn two_same_depth_candidates_are_ambiguous() {
        let src: StdArc<str> = " ".repeat(64).into();
        let mut tree = Tree::new(None);
        let first = empty_fn(&mut tree, &src, "get", 0, 10);
        let second = empty_fn(&mut tree, &src, "get", 12, 22);
        let reference = tree.insert(
            NodeKind::VariableExpression(VariableExpression { name: ident("get") }),
            sp(&src, 30, 33),
        );
        let main_body = tree.insert(
            NodeKind::CodeBlock(CodeBlock {
                contents: vec![reference],
            }),
            sp(&src, 28, 35),
        );
        let main = tree.insert(
            NodeKind::FunctionDeclaration(FunctionDeclaration {
                name: ident("main"),
                parameters: vec![],
                return_ascription: None,
                body: main_body,
            }),
            sp(&src, 24, 35),
        );
        let module = tree.insert(
            NodeKind::Module(ModuleDeclaration {
                name: ident("demo"),
                body: vec![first, second, main],
            }),
            sp(&src, 0, 40),
        );
        tree.set_root(module);
        let result = resolve(&mut tree);
        assert!(!result.is_ok());
        let report = &result.reports()[0];
        assert_eq!(report.severity, Severity::Error);
        assert!(report.message.contains("Multiple definitions of \"get\""));
        // The use site plus both colliding declaration sites.
        assert_eq!(report.spans.len(), 3);
    }

    #[test]
    fn an_inner_binding_shadows_an_outer_one() {
        let src: StdArc<str> = " ".repeat(64).into();
        let mut tree = Tree::new(None);
        let outer_lit = tree.insert(NodeKind::Literal(Literal::Integer(1)), sp(&src, 8, 9));
        let outer = tree.insert(
            NodeKind::VariableDeclaration(VariableDeclaration {
                name: ident("x"),
                ascription: None,
                body: outer_lit,
            }),
            sp(&src, 0, 9),
        );
        let inner_lit = tree.insert(NodeKind::Literal(Literal::Integer(2)), sp(&src, 20, 21));
        let inner = tree.insert(
            NodeKind::VariableDeclaration(VariableDeclaration {
                name: ident("x"),
                ascription: None,
                body: inner_lit,
            }),
            sp(&src, 12, 21),
        );
        let reference = tree.insert(
            NodeKind::VariableExpression(VariableExpression { name: ident("x") }),
            sp(&src, 24, 25),
        );
        let inner_block = tree.insert(
            NodeKind::CodeBlock(CodeBlock {
                contents: vec![inner, reference],
            }),
            sp(&src, 10, 27),
        );
        let outer_block = tree.insert(
            NodeKind::CodeBlock(CodeBlock {
                contents: vec![outer, inner_block],
            }),
            sp(&src, 0, 29),
        );
        tree.set_root(outer_block);
        let result = resolve(&mut tree);
        // The shadowing warning from collection is carried through.
        assert!(result.is_ok());
        assert_eq!(result.reports().len(), 1);
        assert_eq!(result.reports()[0].severity, Severity::Warning);
        let inner_contents = match tree.kind(inner_block) {
            NodeKind::CodeBlock(block) => block.contents.clone(),
            _ => panic!("expected the inner block"),
        };
        match tree.kind(inner_contents[1]) {
            NodeKind::ResolvedReference(resolved) => assert_eq!(resolved.declaration, inner),
            other => panic!("expected a resolved reference, got a {}", other.friendly_name()),
        }
    }

    /// A function declared at the bottom of a block is still visible to
    /// statements above it, while variables stay position-ordered.
    #[test]
    fn a_nested_function_is_block_wide_visible() {
        let src: StdArc<str> = " ".repeat(64).into();
        let mut tree = Tree::new(None);
        let callee = tree.insert(
            NodeKind::VariableExpression(VariableExpression { name: ident("local") }),
            sp(&src, 10, 15),
        );
        let call = tree.insert(
            NodeKind::FunctionApplication(FunctionApplication {
                callee,
                arguments: vec![],
            }),
            sp(&src, 10, 17),
        );
        let val_a = tree.insert(
            NodeKind::VariableDeclaration(VariableDeclaration {
                name: ident("a"),
                ascription: None,
                body: call,
            }),
            sp(&src, 2, 17),
        );
        let local_fn = empty_fn(&mut tree, &src, "local", 20, 30);
        let block = tree.insert(
            NodeKind::CodeBlock(CodeBlock {
                contents: vec![val_a, local_fn],
            }),
            sp(&src, 0, 32),
        );
        tree.set_root(block);
        assert!(resolve(&mut tree).is_ok());
        let contents = match tree.kind(tree.root()) {
            NodeKind::CodeBlock(block) => block.contents.clone(),
            _ => panic!("expected the block root"),
        };
        let call = match tree.kind(contents[0]) {
            NodeKind::VariableDeclaration(decl) => decl.body,
            _ => panic!("expected the variable declaration"),
        };
        let resolved_callee = match tree.kind(call) {
            NodeKind::FunctionApplication(app) => app.callee,
            _ => panic!("expected the call"),
        };
        match tree.kind(resolved_callee) {
            NodeKind::ResolvedReference(resolved) => assert_eq!(resolved.declaration, local_fn),
            other => panic!("expected a resolved callee, got a {}", other.friendly_name()),
        }
    }
}
