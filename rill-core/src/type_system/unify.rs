//! Structural unification over monomorphic type terms (Algorithm U).
//!
//! This is a pure function from two terms to either a substitution or an
//! error; it knows nothing about syntax trees or files. The type-checking
//! pass decides what a failure means for the file it is analyzing.

use super::info::{TypeInfo, TypeVar};
use super::occurs_check::OccursCheck;
use super::substitute::TypeSubstMap;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnificationError {
    #[error("Cannot unify the type {received} with the type {expected}.")]
    CannotUnify {
        received: TypeInfo,
        expected: TypeInfo,
    },
    #[error("Cannot construct the infinite type {var} = {ty}.")]
    InfiniteType { var: TypeVar, ty: TypeInfo },
}

/// Attempts to make `received` and `expected` equivalent, producing the
/// substitution that witnesses the equivalence. The outcome is symmetric:
/// `unify(a, b)` and `unify(b, a)` yield substitutions that agree after
/// application, though not necessarily identical maps.
pub fn unify(received: &TypeInfo, expected: &TypeInfo) -> Result<TypeSubstMap, UnificationError> {
    match (received, expected) {
        (TypeInfo::Constant(a), TypeInfo::Constant(b)) => {
            if a == b {
                Ok(TypeSubstMap::new())
            } else {
                Err(UnificationError::CannotUnify {
                    received: received.clone(),
                    expected: expected.clone(),
                })
            }
        }
        (TypeInfo::Var(a), TypeInfo::Var(b)) if a == b => Ok(TypeSubstMap::new()),
        (TypeInfo::Var(var), term) | (term, TypeInfo::Var(var)) => bind(*var, term),
        (TypeInfo::Fn(in_1, out_1), TypeInfo::Fn(in_2, out_2)) => {
            let s_1 = unify(in_1, in_2)?;
            let s_2 = unify(&s_1.apply(out_1), &s_1.apply(out_2))?;
            Ok(s_1.compose(s_2))
        }
        (TypeInfo::Tuple(items_1), TypeInfo::Tuple(items_2)) => {
            if items_1.len() != items_2.len() {
                return Err(UnificationError::CannotUnify {
                    received: received.clone(),
                    expected: expected.clone(),
                });
            }
            let mut subst = TypeSubstMap::new();
            for (item_1, item_2) in items_1.iter().zip(items_2.iter()) {
                let s = unify(&subst.apply(item_1), &subst.apply(item_2))?;
                subst = subst.compose(s);
            }
            Ok(subst)
        }
        _ => Err(UnificationError::CannotUnify {
            received: received.clone(),
            expected: expected.clone(),
        }),
    }
}

/// Binds `var` to `term` after the occurs check.
fn bind(var: TypeVar, term: &TypeInfo) -> Result<TypeSubstMap, UnificationError> {
    if OccursCheck::new(var).check(term) {
        return Err(UnificationError::InfiniteType {
            var,
            ty: term.clone(),
        });
    }
    Ok(TypeSubstMap::singleton(var, term.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::type_system::TypeConstant;

    fn var(n: usize) -> TypeInfo {
        TypeInfo::Var(TypeVar(n))
    }

    #[test]
    fn identical_constants_unify_with_the_empty_substitution() {
        let subst = unify(&TypeInfo::integer(), &TypeInfo::integer()).unwrap();
        assert!(subst.is_empty());
    }

    #[test]
    fn distinct_constants_do_not_unify() {
        assert!(matches!(
            unify(&TypeInfo::integer(), &TypeInfo::boolean()),
            Err(UnificationError::CannotUnify { .. })
        ));
    }

    #[test]
    fn a_variable_unifies_with_itself_trivially() {
        let subst = unify(&var(1), &var(1)).unwrap();
        assert!(subst.is_empty());
    }

    #[test]
    fn binding_is_symmetric_in_outcome() {
        let forward = unify(&var(1), &TypeInfo::integer()).unwrap();
        let backward = unify(&TypeInfo::integer(), &var(1)).unwrap();
        assert_eq!(forward.get(&TypeVar(1)), Some(&TypeInfo::integer()));
        assert_eq!(forward.apply(&var(1)), backward.apply(&var(1)));
    }

    #[test]
    fn the_occurs_check_rejects_infinite_types() {
        let recursive = TypeInfo::Fn(Box::new(var(1)), Box::new(TypeInfo::unit()));
        assert!(matches!(
            unify(&var(1), &recursive),
            Err(UnificationError::InfiniteType { var: TypeVar(1), .. })
        ));
    }

    #[test]
    fn function_types_unify_argument_then_result() {
        // (t1 -> int -> ()) against (t1 -> t2 -> ()) pins t2 to int.
        let received = TypeInfo::function(vec![var(1), TypeInfo::integer()], TypeInfo::unit());
        let expected = TypeInfo::function(vec![var(1), var(2)], TypeInfo::unit());
        let subst = unify(&received, &expected).unwrap();
        assert_eq!(subst.get(&TypeVar(2)), Some(&TypeInfo::integer()));
    }

    #[test]
    fn substitutions_from_the_input_thread_into_the_output() {
        // Unifying (t1 -> t1) with (int -> t2) must give t2 = int, not t1.
        let received = TypeInfo::Fn(Box::new(var(1)), Box::new(var(1)));
        let expected = TypeInfo::Fn(Box::new(TypeInfo::integer()), Box::new(var(2)));
        let subst = unify(&received, &expected).unwrap();
        assert_eq!(subst.apply(&var(2)), TypeInfo::integer());
        assert_eq!(subst.apply(&var(1)), TypeInfo::integer());
    }

    #[test]
    fn arity_mismatch_surfaces_on_the_trailing_arrow() {
        // A two-parameter function against a one-parameter one collapses to
        // unifying the trailing `int -> ()` arrow with `()`.
        let received = TypeInfo::function(
            vec![TypeInfo::boolean(), TypeInfo::integer()],
            TypeInfo::unit(),
        );
        let expected = TypeInfo::function(vec![TypeInfo::boolean()], TypeInfo::unit());
        match unify(&received, &expected) {
            Err(UnificationError::CannotUnify { received, .. }) => {
                assert_eq!(
                    received,
                    TypeInfo::Fn(Box::new(TypeInfo::integer()), Box::new(TypeInfo::unit()))
                );
            }
            other => panic!("expected a unification failure, got {other:?}"),
        }
    }

    #[test]
    fn tuples_unify_element_wise() {
        let received = TypeInfo::Tuple(vec![var(1), TypeInfo::boolean()]);
        let expected = TypeInfo::Tuple(vec![TypeInfo::integer(), var(2)]);
        let subst = unify(&received, &expected).unwrap();
        assert_eq!(subst.get(&TypeVar(1)), Some(&TypeInfo::integer()));
        assert_eq!(subst.get(&TypeVar(2)), Some(&TypeInfo::boolean()));
    }

    #[test]
    fn tuple_arity_mismatch_cannot_unify() {
        let received = TypeInfo::Tuple(vec![TypeInfo::integer()]);
        let expected = TypeInfo::unit();
        assert!(matches!(
            unify(&received, &expected),
            Err(UnificationError::CannotUnify { .. })
        ));
    }

    #[test]
    fn shape_mismatch_cannot_unify() {
        let received = TypeInfo::Fn(Box::new(TypeInfo::integer()), Box::new(TypeInfo::unit()));
        let expected = TypeInfo::Constant(TypeConstant::Integer);
        assert!(matches!(
            unify(&received, &expected),
            Err(UnificationError::CannotUnify { .. })
        ));
    }
}
