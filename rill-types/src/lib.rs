pub mod ident;
pub mod span;
pub mod style;

pub use ident::{Ident, Named};
pub use span::Span;

/// Anything that carries a source location.
pub trait Spanned {
    fn span(&self) -> Span;
}
