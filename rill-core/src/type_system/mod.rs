mod info;
mod occurs_check;
mod substitute;
mod unify;

pub use info::{TypeConstant, TypeInfo, TypeVar};
pub use substitute::TypeSubstMap;
pub use unify::{unify, UnificationError};
