use crate::type_error::TypeError;

use rill_types::{Ident, Span};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq, Hash)]
pub enum AnalysisError {
    #[error("A cyclic dependency was found between the passes: {}.", passes.join(", "))]
    DependencyCycle { passes: Vec<String> },
    #[error("Pass \"{name}\" is not registered.")]
    UnknownPass { name: String },

    #[error("Symbol \"{name}\" does not exist in this scope.")]
    UnknownSymbol { name: Ident, span: Span },
    #[error("Multiple definitions of \"{name}\" are visible from here.")]
    AmbiguousReference {
        name: Ident,
        span: Span,
        candidates: Vec<Span>,
    },
    #[error("Name \"{name}\" is defined multiple times in this scope.")]
    MultipleDefinitionsOfName { name: Ident, span: Span },
    #[error("Module \"{name}\" is defined multiple times.")]
    MultipleDefinitionsOfModule { name: Ident, span: Span },

    #[error("{0}")]
    TypeError(TypeError),

    #[error(
        "Internal compiler error: {0}\nPlease file an issue on the repository and include the \
         code that triggered this error."
    )]
    Internal(&'static str, Span),
    #[error(
        "Internal compiler error: {0}\nPlease file an issue on the repository and include the \
         code that triggered this error."
    )]
    InternalOwned(String, Span),
}

impl AnalysisError {
    /// Every source location this error refers to. The primary location
    /// comes first; `AmbiguousReference` additionally carries the site of
    /// every colliding declaration.
    pub fn spans(&self) -> Vec<Span> {
        use AnalysisError::*;
        match self {
            DependencyCycle { .. } | UnknownPass { .. } => vec![],
            UnknownSymbol { span, .. } => vec![span.clone()],
            AmbiguousReference {
                span, candidates, ..
            } => std::iter::once(span.clone())
                .chain(candidates.iter().cloned())
                .collect(),
            MultipleDefinitionsOfName { span, .. } => vec![span.clone()],
            MultipleDefinitionsOfModule { span, .. } => vec![span.clone()],
            TypeError(err) => err.spans(),
            Internal(_, span) => vec![span.clone()],
            InternalOwned(_, span) => vec![span.clone()],
        }
    }

    /// An internal fault is unrecoverable and aborts the current file's
    /// pipeline; everything else is collected and analysis continues.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            AnalysisError::Internal(..) | AnalysisError::InternalOwned(..)
        )
    }
}
