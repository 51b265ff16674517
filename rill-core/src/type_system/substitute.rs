use super::info::{TypeInfo, TypeVar};

use rustc_hash::FxHashMap;

/// A finite partial mapping from type variables to type terms, produced by
/// unification. Application is simultaneous: every bound variable in the
/// input is replaced, and replacement recurses into the substituted terms
/// until no bound variable remains. The maps built by unification never bind
/// a variable to a term that reaches back to it (the occurs check rules that
/// out), so the recursion is well-founded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeSubstMap {
    mapping: FxHashMap<TypeVar, TypeInfo>,
}

impl TypeSubstMap {
    pub fn new() -> TypeSubstMap {
        TypeSubstMap {
            mapping: FxHashMap::default(),
        }
    }

    pub fn singleton(var: TypeVar, ty: TypeInfo) -> TypeSubstMap {
        let mut mapping = FxHashMap::default();
        mapping.insert(var, ty);
        TypeSubstMap { mapping }
    }

    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }

    pub fn len(&self) -> usize {
        self.mapping.len()
    }

    pub fn get(&self, var: &TypeVar) -> Option<&TypeInfo> {
        self.mapping.get(var)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TypeVar, &TypeInfo)> {
        self.mapping.iter()
    }

    /// Rewrites every variable bound by this map inside `ty`, chasing
    /// through the substituted terms.
    pub fn apply(&self, ty: &TypeInfo) -> TypeInfo {
        match ty {
            TypeInfo::Constant(_) => ty.clone(),
            TypeInfo::Var(v) => match self.mapping.get(v) {
                Some(bound) => self.apply(bound),
                None => ty.clone(),
            },
            TypeInfo::Fn(input, output) => TypeInfo::Fn(
                Box::new(self.apply(input)),
                Box::new(self.apply(output)),
            ),
            TypeInfo::Tuple(items) => {
                TypeInfo::Tuple(items.iter().map(|item| self.apply(item)).collect())
            }
        }
    }

    /// Composes two substitutions: the result behaves like applying `self`
    /// first and `later` second. Right-hand sides already bound by `self`
    /// are rewritten through `later`, and `later` wins on overlapping
    /// variables, so the composed map stays fully chased.
    pub fn compose(self, later: TypeSubstMap) -> TypeSubstMap {
        let mut mapping: FxHashMap<TypeVar, TypeInfo> = self
            .mapping
            .into_iter()
            .map(|(var, ty)| (var, later.apply(&ty)))
            .collect();
        for (var, ty) in later.mapping {
            mapping.insert(var, ty);
        }
        TypeSubstMap { mapping }
    }
}
