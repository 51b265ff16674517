use super::info::{TypeInfo, TypeVar};

/// Helper struct to aid in checking whether a type variable occurs free
/// inside a type term. Binding a variable to a term containing itself would
/// produce an infinite type, so unification runs this first.
pub(crate) struct OccursCheck {
    var: TypeVar,
}

impl OccursCheck {
    pub(crate) fn new(var: TypeVar) -> OccursCheck {
        OccursCheck { var }
    }

    pub(crate) fn check(&self, ty: &TypeInfo) -> bool {
        match ty {
            TypeInfo::Constant(_) => false,
            TypeInfo::Var(v) => *v == self.var,
            TypeInfo::Fn(input, output) => self.check(input) || self.check(output),
            TypeInfo::Tuple(items) => items.iter().any(|item| self.check(item)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_the_variable_under_nesting() {
        let ty = TypeInfo::Fn(
            Box::new(TypeInfo::integer()),
            Box::new(TypeInfo::Tuple(vec![TypeInfo::Var(TypeVar(3))])),
        );
        assert!(OccursCheck::new(TypeVar(3)).check(&ty));
        assert!(!OccursCheck::new(TypeVar(4)).check(&ty));
    }
}
