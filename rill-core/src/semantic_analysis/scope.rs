//! The lexical scope hierarchy.
//!
//! A scope's identity is its whole parent chain: two scopes are equal iff
//! they were built over equal chains. Parents are shared through [Arc], so
//! tagging every node in a subtree with the same scope is cheap.

use rill_types::Ident;
use std::{fmt, sync::Arc};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    /// The scope of a module's top level.
    Global { module: Ident },
    /// The scope a top-level item (function, struct, enum, trait) introduces
    /// for its members. Carries the declaring item's name so sibling items
    /// do not collapse into one scope.
    Object { parent: Arc<Scope>, name: Ident },
    /// Any nested scope: a code block, or an item declared below the top
    /// level. The `id` is unique per tagging run.
    Local { parent: Arc<Scope>, id: usize },
}

impl Scope {
    pub fn global(module: Ident) -> Arc<Scope> {
        Arc::new(Scope::Global { module })
    }

    pub fn object(parent: Arc<Scope>, name: Ident) -> Arc<Scope> {
        debug_assert!(matches!(&*parent, Scope::Global { .. }));
        Arc::new(Scope::Object { parent, name })
    }

    pub fn local(parent: Arc<Scope>, id: usize) -> Arc<Scope> {
        Arc::new(Scope::Local { parent, id })
    }

    pub fn parent(&self) -> Option<&Arc<Scope>> {
        match self {
            Scope::Global { .. } => None,
            Scope::Object { parent, .. } => Some(parent),
            Scope::Local { parent, .. } => Some(parent),
        }
    }

    /// Nesting depth; a global scope is at depth zero.
    pub fn depth(&self) -> usize {
        match self.parent() {
            None => 0,
            Some(parent) => 1 + parent.depth(),
        }
    }

    /// True iff `other`'s parent chain contains `self` (strictly).
    pub fn is_superscope_of(&self, other: &Scope) -> bool {
        let mut cursor = other.parent();
        while let Some(scope) = cursor {
            if &**scope == self {
                return true;
            }
            cursor = scope.parent();
        }
        false
    }

    /// A declaration in `self` is visible to a reference sitting in
    /// `reference`: either the same scope, or an enclosing one.
    pub fn is_visible_from(&self, reference: &Scope) -> bool {
        self == reference || self.is_superscope_of(reference)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Scope::Global { module } => write!(f, "{module}"),
            Scope::Object { parent, name } => write!(f, "{parent}::{name}"),
            Scope::Local { parent, id } => write!(f, "{parent}::<block {id}>"),
        }
    }
}
