use rill_types::Span;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeError {
    #[error(
        "Mismatched types.\n\
         expected: {expected}\n\
         found:    {received}.\n\
         {help}",
         help = if !help_text.is_empty() { format!("help: {}", help_text) } else { String::new() }
    )]
    MismatchedType {
        expected: String,
        received: String,
        help_text: String,
        span: Span,
    },
    #[error(
        "This expression's type refers to itself: the type variable {var} occurs inside {ty}."
    )]
    InfiniteType { var: String, ty: String, span: Span },
}

impl TypeError {
    pub fn spans(&self) -> Vec<Span> {
        use TypeError::*;
        match self {
            MismatchedType { span, .. } => vec![span.clone()],
            InfiniteType { span, .. } => vec![span.clone()],
        }
    }
}
