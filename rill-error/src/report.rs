use crate::{error::AnalysisError, warning::AnalysisWarning};

use rill_types::{Span, Spanned};
use std::{path::PathBuf, sync::Arc};

/// How bad a [Report] is. `Error` and `Crash` mark the file they belong to
/// as failed; `Note` and `Warning` do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Note,
    Warning,
    Error,
    Crash,
}

impl Severity {
    pub fn is_failure(&self) -> bool {
        *self >= Severity::Error
    }
}

/// A single rendered diagnostic: the file it belongs to, zero or more source
/// locations, a severity, and the user-facing message. This is the unit the
/// diagnostic pretty-printer consumes; the message text is final by the time
/// a [Report] is built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Report {
    pub path: Option<Arc<PathBuf>>,
    pub spans: Vec<Span>,
    pub severity: Severity,
    pub message: String,
}

impl Report {
    pub fn note(message: String, span: Span) -> Report {
        Report {
            path: span.path().cloned(),
            spans: vec![span],
            severity: Severity::Note,
            message,
        }
    }

    pub fn is_failure(&self) -> bool {
        self.severity.is_failure()
    }

    pub fn is_crash(&self) -> bool {
        self.severity == Severity::Crash
    }
}

impl From<&AnalysisError> for Report {
    fn from(err: &AnalysisError) -> Report {
        let spans = err.spans();
        let severity = if err.is_internal() {
            Severity::Crash
        } else {
            Severity::Error
        };
        Report {
            path: spans.first().and_then(|span| span.path().cloned()),
            spans,
            severity,
            message: err.to_string(),
        }
    }
}

impl From<AnalysisError> for Report {
    fn from(err: AnalysisError) -> Report {
        Report::from(&err)
    }
}

impl From<&AnalysisWarning> for Report {
    fn from(warning: &AnalysisWarning) -> Report {
        let span = warning.span();
        Report {
            path: span.path().cloned(),
            spans: vec![span],
            severity: Severity::Warning,
            message: warning.to_friendly_warning_string(),
        }
    }
}

impl From<AnalysisWarning> for Report {
    fn from(warning: AnalysisWarning) -> Report {
        Report::from(&warning)
    }
}
