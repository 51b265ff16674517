use serde::{Deserialize, Serialize};
use std::{fmt, path::PathBuf, sync::Arc};

/// A byte range into a shared source string, together with the path of the
/// file the source came from (if any). Cloning a [Span] is cheap; the source
/// text itself is shared.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Span {
    src: Arc<str>,
    start: usize,
    end: usize,
    path: Option<Arc<PathBuf>>,
}

impl Span {
    pub fn new(src: Arc<str>, start: usize, end: usize, path: Option<Arc<PathBuf>>) -> Option<Span> {
        if src.get(start..end).is_none() {
            return None;
        }
        Some(Span {
            src,
            start,
            end,
            path,
        })
    }

    /// Covers the whole of `src`.
    pub fn from_string(src: String, path: Option<Arc<PathBuf>>) -> Span {
        let src: Arc<str> = src.into();
        let end = src.len();
        Span {
            src,
            start: 0,
            end,
            path,
        }
    }

    /// A zero-length span into an empty, pathless source. Used for synthetic
    /// nodes that have no surface syntax.
    pub fn dummy() -> Span {
        Span {
            src: "".into(),
            start: 0,
            end: 0,
            path: None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.src[self.start..self.end]
    }

    pub fn src(&self) -> &Arc<str> {
        &self.src
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn path(&self) -> Option<&Arc<PathBuf>> {
        self.path.as_ref()
    }

    pub fn is_dummy(&self) -> bool {
        self.src.is_empty() && self.path.is_none()
    }

    /// Both spans must come from the same source string.
    pub fn join(lhs: &Span, rhs: &Span) -> Span {
        assert!(Arc::ptr_eq(&lhs.src, &rhs.src));
        assert_eq!(lhs.path, rhs.path);
        Span {
            src: lhs.src.clone(),
            start: lhs.start.min(rhs.start),
            end: lhs.end.max(rhs.end),
            path: lhs.path.clone(),
        }
    }

    /// Shrinks the span to exclude leading and trailing whitespace.
    pub fn trim(self) -> Span {
        let text = self.as_str();
        let trimmed_start = text.len() - text.trim_start().len();
        let trimmed_end = text.trim_end().len() + trimmed_start;
        Span {
            src: self.src,
            start: self.start + trimmed_start,
            end: self.start + trimmed_end,
            path: self.path,
        }
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_struct("Span")
            .field("start", &self.start)
            .field("end", &self.end)
            .field("as_str", &self.as_str())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_spans() {
        let src: Arc<str> = "val answer = 42".into();
        let lhs = Span::new(src.clone(), 0, 3, None).unwrap();
        let rhs = Span::new(src.clone(), 4, 10, None).unwrap();
        let joined = Span::join(&lhs, &rhs);
        assert_eq!(joined.as_str(), "val answer");
    }

    #[test]
    fn trim_strips_surrounding_whitespace() {
        let span = Span::from_string("  answer  ".to_string(), None).trim();
        assert_eq!(span.as_str(), "answer");
    }

    #[test]
    fn out_of_bounds_span_is_rejected() {
        let src: Arc<str> = "val".into();
        assert!(Span::new(src, 0, 17, None).is_none());
    }
}
