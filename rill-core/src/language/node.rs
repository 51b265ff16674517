use super::tree::NodeId;
use crate::type_system::TypeInfo;

use rill_types::Ident;

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Integer(i64),
    Boolean(bool),
    String(String),
    Character(char),
}

impl Literal {
    pub fn type_info(&self) -> TypeInfo {
        match self {
            Literal::Integer(_) => TypeInfo::integer(),
            Literal::Boolean(_) => TypeInfo::boolean(),
            Literal::String(_) => TypeInfo::string_slice(),
            Literal::Character(_) => TypeInfo::character(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModuleDeclaration {
    pub name: Ident,
    pub body: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDeclaration {
    pub name: Ident,
    pub parameters: Vec<NodeId>,
    pub return_ascription: Option<TypeInfo>,
    pub body: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: Ident,
    pub ascription: Option<TypeInfo>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructDeclaration {
    pub name: Ident,
    pub fields: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructField {
    pub name: Ident,
    pub ascription: TypeInfo,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumDeclaration {
    pub name: Ident,
    pub variants: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumVariant {
    pub name: Ident,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TraitDeclaration {
    pub name: Ident,
    pub interface: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclaration {
    pub name: Ident,
    pub ascription: Option<TypeInfo>,
    pub body: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CodeBlock {
    pub contents: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfExpression {
    pub condition: NodeId,
    pub then: NodeId,
    pub r#else: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileLoop {
    pub condition: NodeId,
    pub body: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionApplication {
    pub callee: NodeId,
    pub arguments: Vec<NodeId>,
}

/// A use of a name, before resolution has connected it to a declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableExpression {
    pub name: Ident,
}

/// A use of a name after resolution. `declaration` is a cross-reference to
/// the binding site, not an owned child.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedReference {
    pub name: Ident,
    pub declaration: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TupleExpression {
    pub fields: Vec<NodeId>,
}

/// The variants a tree node can take. Passes match on the variants they care
/// about and pass everything else through unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Module(ModuleDeclaration),
    FunctionDeclaration(FunctionDeclaration),
    Parameter(Parameter),
    StructDeclaration(StructDeclaration),
    StructField(StructField),
    EnumDeclaration(EnumDeclaration),
    EnumVariant(EnumVariant),
    TraitDeclaration(TraitDeclaration),
    VariableDeclaration(VariableDeclaration),
    CodeBlock(CodeBlock),
    IfExpression(IfExpression),
    WhileLoop(WhileLoop),
    FunctionApplication(FunctionApplication),
    VariableExpression(VariableExpression),
    ResolvedReference(ResolvedReference),
    TupleExpression(TupleExpression),
    Literal(Literal),
}

impl NodeKind {
    /// The owned children of this node, in source order. Cross-reference
    /// links (a resolved reference's declaration) are not children.
    pub fn children(&self) -> Vec<NodeId> {
        use NodeKind::*;
        match self {
            Module(decl) => decl.body.clone(),
            FunctionDeclaration(decl) => {
                let mut children = decl.parameters.clone();
                children.push(decl.body);
                children
            }
            StructDeclaration(decl) => decl.fields.clone(),
            EnumDeclaration(decl) => decl.variants.clone(),
            TraitDeclaration(decl) => decl.interface.clone(),
            VariableDeclaration(decl) => vec![decl.body],
            CodeBlock(block) => block.contents.clone(),
            IfExpression(expr) => {
                let mut children = vec![expr.condition, expr.then];
                children.extend(expr.r#else);
                children
            }
            WhileLoop(expr) => vec![expr.condition, expr.body],
            FunctionApplication(expr) => {
                let mut children = vec![expr.callee];
                children.extend(expr.arguments.iter().copied());
                children
            }
            TupleExpression(expr) => expr.fields.clone(),
            Parameter(_) | StructField(_) | EnumVariant(_) | VariableExpression(_)
            | ResolvedReference(_) | Literal(_) => vec![],
        }
    }

    fn child_slots_mut(&mut self) -> Vec<&mut NodeId> {
        use NodeKind::*;
        match self {
            Module(decl) => decl.body.iter_mut().collect(),
            FunctionDeclaration(decl) => decl
                .parameters
                .iter_mut()
                .chain(std::iter::once(&mut decl.body))
                .collect(),
            StructDeclaration(decl) => decl.fields.iter_mut().collect(),
            EnumDeclaration(decl) => decl.variants.iter_mut().collect(),
            TraitDeclaration(decl) => decl.interface.iter_mut().collect(),
            VariableDeclaration(decl) => vec![&mut decl.body],
            CodeBlock(block) => block.contents.iter_mut().collect(),
            IfExpression(expr) => {
                let mut slots = vec![&mut expr.condition, &mut expr.then];
                slots.extend(expr.r#else.iter_mut());
                slots
            }
            WhileLoop(expr) => vec![&mut expr.condition, &mut expr.body],
            FunctionApplication(expr) => std::iter::once(&mut expr.callee)
                .chain(expr.arguments.iter_mut())
                .collect(),
            TupleExpression(expr) => expr.fields.iter_mut().collect(),
            Parameter(_) | StructField(_) | EnumVariant(_) | VariableExpression(_)
            | ResolvedReference(_) | Literal(_) => vec![],
        }
    }

    /// Swaps the child slot holding `old` for `new`, leaving every other
    /// child untouched and sibling order intact.
    pub(crate) fn replace_child(&mut self, old: NodeId, new: NodeId) -> bool {
        for slot in self.child_slots_mut() {
            if *slot == old {
                *slot = new;
                return true;
            }
        }
        false
    }

    /// The name this node binds, for the variants that are binding sites.
    pub fn declared_name(&self) -> Option<&Ident> {
        use NodeKind::*;
        match self {
            Module(decl) => Some(&decl.name),
            FunctionDeclaration(decl) => Some(&decl.name),
            Parameter(decl) => Some(&decl.name),
            StructDeclaration(decl) => Some(&decl.name),
            StructField(decl) => Some(&decl.name),
            EnumDeclaration(decl) => Some(&decl.name),
            EnumVariant(decl) => Some(&decl.name),
            TraitDeclaration(decl) => Some(&decl.name),
            VariableDeclaration(decl) => Some(&decl.name),
            _ => None,
        }
    }

    pub fn friendly_name(&self) -> &'static str {
        use NodeKind::*;
        match self {
            Module(_) => "module",
            FunctionDeclaration(_) => "function declaration",
            Parameter(_) => "parameter",
            StructDeclaration(_) => "struct declaration",
            StructField(_) => "struct field",
            EnumDeclaration(_) => "enum declaration",
            EnumVariant(_) => "enum variant",
            TraitDeclaration(_) => "trait declaration",
            VariableDeclaration(_) => "variable declaration",
            CodeBlock(_) => "code block",
            IfExpression(_) => "if expression",
            WhileLoop(_) => "while loop",
            FunctionApplication(_) => "function application",
            VariableExpression(_) => "variable reference",
            ResolvedReference(_) => "resolved reference",
            TupleExpression(_) => "tuple expression",
            Literal(_) => "literal",
        }
    }
}
