pub mod declarations;
pub mod resolution;
pub mod scope;
pub mod scope_tagging;
pub mod type_check;

pub use declarations::{collect_declarations, Declaration, DeclarationIndex, DeclarationKind};
pub use resolution::{ReferenceResolver, REFERENCE_RESOLUTION_PASS};
pub use scope::Scope;
pub use scope_tagging::{ScopeTagger, SCOPE_TAGGING_PASS};
pub use type_check::{TypeCheck, TYPE_CHECKING_PASS};
