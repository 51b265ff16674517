//! The type-checking pass.
//!
//! Works over a resolved tree: every name use is a [ResolvedReference] by
//! the time this pass runs. Each expression gets a type term, bindings
//! without an ascription get a fresh type variable, and one substitution is
//! threaded through the whole file. Unification failures are recoverable:
//! they are reported and checking continues with whatever the substitution
//! already knows.

use crate::error::{ok, AnalysisResult};
use crate::language::{FunctionDeclaration, NodeId, NodeKind, Tree};
use crate::pass::{Pass, PassKind, PassName};
use crate::semantic_analysis::resolution::REFERENCE_RESOLUTION_PASS;
use crate::type_system::{unify, TypeInfo, TypeSubstMap, TypeVar, UnificationError};

use rill_error::error::AnalysisError;
use rill_error::report::Report;
use rill_error::type_error::TypeError;
use rill_types::Span;
use rustc_hash::FxHashMap;

pub const TYPE_CHECKING_PASS: PassName = "type_checking";

pub struct TypeCheck;

impl Pass for TypeCheck {
    fn name(&self) -> PassName {
        TYPE_CHECKING_PASS
    }

    fn kind(&self) -> PassKind {
        PassKind::Analyzer
    }

    fn runs_after(&self) -> &'static [PassName] {
        &[REFERENCE_RESOLUTION_PASS]
    }

    fn run(&self, tree: &mut Tree) -> AnalysisResult<()> {
        let root = tree.root();
        let mut checker = TypeChecker::new(tree);
        checker.check_node(root);
        ok((), checker.reports)
    }
}

struct TypeChecker<'t> {
    tree: &'t Tree,
    subst: TypeSubstMap,
    /// Value types of binding sites, so every reference to a binding sees
    /// the same term.
    node_types: FxHashMap<NodeId, TypeInfo>,
    next_var: usize,
    reports: Vec<Report>,
    crashed: bool,
}

impl<'t> TypeChecker<'t> {
    fn new(tree: &'t Tree) -> TypeChecker<'t> {
        // Fresh variables must not collide with variables already written in
        // ascriptions.
        let next_var = tree
            .flatten(crate::language::Traversal::PreOrder)
            .into_iter()
            .flat_map(|id| ascriptions_of(tree.kind(id)))
            .filter_map(|ty| max_var(&ty))
            .max()
            .map(|n| n + 1)
            .unwrap_or(0);
        TypeChecker {
            tree,
            subst: TypeSubstMap::new(),
            node_types: FxHashMap::default(),
            next_var,
            reports: Vec::new(),
            crashed: false,
        }
    }

    fn fresh(&mut self) -> TypeInfo {
        let var = TypeVar(self.next_var);
        self.next_var += 1;
        TypeInfo::Var(var)
    }

    fn unify_or_report(&mut self, received: TypeInfo, expected: TypeInfo, span: Span, help: &str) {
        match unify(&received, &expected) {
            Ok(subst) => {
                let prior = std::mem::take(&mut self.subst);
                self.subst = prior.compose(subst);
            }
            Err(UnificationError::CannotUnify { .. }) => {
                self.reports
                    .push(Report::from(AnalysisError::TypeError(TypeError::MismatchedType {
                        expected: self.subst.apply(&expected).to_string(),
                        received: self.subst.apply(&received).to_string(),
                        help_text: help.to_string(),
                        span,
                    })));
            }
            Err(UnificationError::InfiniteType { var, ty }) => {
                self.reports
                    .push(Report::from(AnalysisError::TypeError(TypeError::InfiniteType {
                        var: var.to_string(),
                        ty: ty.to_string(),
                        span,
                    })));
            }
        }
    }

    /// The value type of a binding site, computed once and cached.
    fn binding_type(&mut self, id: NodeId) -> TypeInfo {
        if let Some(ty) = self.node_types.get(&id) {
            return ty.clone();
        }
        let tree = self.tree;
        let ty = match tree.kind(id) {
            NodeKind::Parameter(param) => param
                .ascription
                .clone()
                .unwrap_or_else(|| self.fresh()),
            NodeKind::StructField(field) => field.ascription.clone(),
            NodeKind::VariableDeclaration(decl) => decl
                .ascription
                .clone()
                .unwrap_or_else(|| self.fresh()),
            NodeKind::FunctionDeclaration(decl) => return self.function_type(id, decl),
            // Referencing a type-level item as a value; give it an opaque
            // variable and let the surrounding context constrain it.
            _ => self.fresh(),
        };
        self.node_types.insert(id, ty.clone());
        ty
    }

    fn function_type(&mut self, id: NodeId, decl: &FunctionDeclaration) -> TypeInfo {
        if let Some(ty) = self.node_types.get(&id) {
            return ty.clone();
        }
        let params: Vec<TypeInfo> = decl
            .parameters
            .iter()
            .map(|param| self.binding_type(*param))
            .collect();
        let ret = decl
            .return_ascription
            .clone()
            .unwrap_or_else(|| self.fresh());
        let ty = TypeInfo::function(params, ret);
        self.node_types.insert(id, ty.clone());
        ty
    }

    fn check_node(&mut self, id: NodeId) -> TypeInfo {
        if self.crashed {
            return TypeInfo::unit();
        }
        let tree = self.tree;
        match tree.kind(id) {
            NodeKind::Literal(literal) => literal.type_info(),
            NodeKind::TupleExpression(expr) => {
                let items = expr.fields.iter().map(|field| self.check_node(*field));
                TypeInfo::Tuple(items.collect())
            }
            NodeKind::CodeBlock(block) => {
                let mut last = TypeInfo::unit();
                for content in &block.contents {
                    last = self.check_node(*content);
                }
                last
            }
            NodeKind::VariableDeclaration(decl) => {
                let body_ty = self.check_node(decl.body);
                let declared = self.binding_type(id);
                self.unify_or_report(
                    body_ty,
                    declared,
                    tree.span(decl.body),
                    "the initializer must match the variable's annotation",
                );
                TypeInfo::unit()
            }
            NodeKind::Parameter(_) | NodeKind::StructField(_) | NodeKind::EnumVariant(_) => {
                self.binding_type(id);
                TypeInfo::unit()
            }
            NodeKind::Module(_)
            | NodeKind::StructDeclaration(_)
            | NodeKind::EnumDeclaration(_)
            | NodeKind::TraitDeclaration(_) => {
                for child in tree.kind(id).children() {
                    self.check_node(child);
                }
                TypeInfo::unit()
            }
            NodeKind::FunctionDeclaration(decl) => {
                let fn_ty = self.function_type(id, decl);
                let ret_ty = return_type_of(&fn_ty, decl.parameters.len());
                let body_ty = self.check_node(decl.body);
                self.unify_or_report(
                    body_ty,
                    ret_ty,
                    tree.span(decl.body),
                    "the function body must produce the declared return type",
                );
                TypeInfo::unit()
            }
            NodeKind::IfExpression(expr) => {
                let cond_ty = self.check_node(expr.condition);
                self.unify_or_report(
                    cond_ty,
                    TypeInfo::boolean(),
                    tree.span(expr.condition),
                    "an `if` condition must be a bool",
                );
                let then_ty = self.check_node(expr.then);
                match expr.r#else {
                    Some(r#else) => {
                        let else_ty = self.check_node(r#else);
                        self.unify_or_report(
                            else_ty,
                            then_ty.clone(),
                            tree.span(r#else),
                            "the branches of an `if` must have the same type",
                        );
                        self.subst.apply(&then_ty)
                    }
                    None => TypeInfo::unit(),
                }
            }
            NodeKind::WhileLoop(expr) => {
                let cond_ty = self.check_node(expr.condition);
                self.unify_or_report(
                    cond_ty,
                    TypeInfo::boolean(),
                    tree.span(expr.condition),
                    "a `while` condition must be a bool",
                );
                self.check_node(expr.body);
                TypeInfo::unit()
            }
            NodeKind::FunctionApplication(expr) => {
                let callee_ty = self.check_node(expr.callee);
                let args: Vec<TypeInfo> = expr
                    .arguments
                    .iter()
                    .map(|arg| self.check_node(*arg))
                    .collect();
                let ret = self.fresh();
                let expected = TypeInfo::function(args, ret.clone());
                self.unify_or_report(
                    callee_ty,
                    expected,
                    tree.span(id),
                    "the arguments of this call do not match the callee",
                );
                self.subst.apply(&ret)
            }
            NodeKind::ResolvedReference(reference) => {
                let ty = self.binding_type(reference.declaration);
                self.subst.apply(&ty)
            }
            NodeKind::VariableExpression(_) => {
                // Resolution rewrites every name use; meeting one here means
                // the pass order is broken, which is a fault, not a user
                // error.
                self.reports.push(Report::from(AnalysisError::Internal(
                    "encountered an unresolved reference during type checking",
                    tree.span(id),
                )));
                self.crashed = true;
                TypeInfo::unit()
            }
        }
    }
}

/// Peels the parameter arrows off a function type to reach its return type.
fn return_type_of(ty: &TypeInfo, parameters: usize) -> TypeInfo {
    let mut cursor = ty;
    let mut remaining = parameters.max(1);
    while remaining > 0 {
        match cursor {
            TypeInfo::Fn(_, output) => {
                cursor = output;
                remaining -= 1;
            }
            _ => break,
        }
    }
    cursor.clone()
}

fn ascriptions_of(kind: &NodeKind) -> Vec<TypeInfo> {
    match kind {
        NodeKind::Parameter(param) => param.ascription.iter().cloned().collect(),
        NodeKind::StructField(field) => vec![field.ascription.clone()],
        NodeKind::VariableDeclaration(decl) => decl.ascription.iter().cloned().collect(),
        NodeKind::FunctionDeclaration(decl) => decl.return_ascription.iter().cloned().collect(),
        _ => vec![],
    }
}

fn max_var(ty: &TypeInfo) -> Option<usize> {
    match ty {
        TypeInfo::Constant(_) => None,
        TypeInfo::Var(TypeVar(n)) => Some(*n),
        TypeInfo::Fn(input, output) => max_var(input).max(max_var(output)),
        TypeInfo::Tuple(items) => items.iter().filter_map(max_var).max(),
    }
}
