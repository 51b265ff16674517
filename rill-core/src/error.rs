//! Tools for accumulating and recovering from Rill analysis errors.
//!
//! Every fallible analysis step returns an [AnalysisResult]: either a pure
//! value, a value together with non-fatal diagnostics, or a failure carrying
//! everything that was diagnosed before the step gave up. The [check!] macro
//! unwraps a nested result into a surrounding accumulation context so that a
//! pass can substitute a recovery value and keep producing diagnostics for
//! the rest of the file.

use rill_error::report::Report;
use vec1::Vec1;

macro_rules! check {
    ($fn_expr: expr, $error_recovery: expr, $reports: ident $(,)?) => {{
        let res = $fn_expr;
        let (value, mut res_reports) = res.into_parts();
        $reports.append(&mut res_reports);
        match value {
            None => $error_recovery,
            Some(value) => value,
        }
    }};
}

macro_rules! assert_or_warn {
    ($bool_expr: expr, $reports: ident, $span: expr, $warning: expr $(,)?) => {{
        if !$bool_expr {
            use rill_error::warning::AnalysisWarning;
            $reports.push(rill_error::report::Report::from(AnalysisWarning {
                span: $span,
                warning_content: $warning,
            }));
        }
    }};
}

/// Denotes a recovered or non-error state. Reports of `Error` or `Crash`
/// severity force the result into [AnalysisResult::Failed] regardless of the
/// value produced.
pub fn ok<T>(value: T, reports: Vec<Report>) -> AnalysisResult<T> {
    match Vec1::try_from_vec(reports) {
        Err(_) => AnalysisResult::Pure(value),
        Ok(reports) => {
            if reports.iter().any(|report| report.is_failure()) {
                AnalysisResult::Failed(reports)
            } else {
                AnalysisResult::WithWarnings(value, reports)
            }
        }
    }
}

/// Denotes a non-recoverable state. At least one of `reports` must have a
/// failure severity.
pub fn err<T>(reports: Vec1<Report>) -> AnalysisResult<T> {
    debug_assert!(reports.iter().any(|report| report.is_failure()));
    AnalysisResult::Failed(reports)
}

/// The result of an analysis step: a value, a value plus the warnings
/// produced along the way, or a failure. The diagnostics lists are never
/// empty, are ordered as reported, and [AnalysisResult::Failed] holds iff at
/// least one report has `Error` or `Crash` severity.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisResult<T> {
    Pure(T),
    WithWarnings(T, Vec1<Report>),
    Failed(Vec1<Report>),
}

impl<T> AnalysisResult<T> {
    pub fn is_ok(&self) -> bool {
        !matches!(self, AnalysisResult::Failed(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            AnalysisResult::Pure(value) => Some(value),
            AnalysisResult::WithWarnings(value, _) => Some(value),
            AnalysisResult::Failed(_) => None,
        }
    }

    pub fn reports(&self) -> &[Report] {
        match self {
            AnalysisResult::Pure(_) => &[],
            AnalysisResult::WithWarnings(_, reports) => reports,
            AnalysisResult::Failed(reports) => reports,
        }
    }

    /// Splits the result into its value (if any) and its diagnostics.
    pub fn into_parts(self) -> (Option<T>, Vec<Report>) {
        match self {
            AnalysisResult::Pure(value) => (Some(value), vec![]),
            AnalysisResult::WithWarnings(value, reports) => (Some(value), reports.into_vec()),
            AnalysisResult::Failed(reports) => (None, reports.into_vec()),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> AnalysisResult<U> {
        match self {
            AnalysisResult::Pure(value) => AnalysisResult::Pure(f(value)),
            AnalysisResult::WithWarnings(value, reports) => {
                AnalysisResult::WithWarnings(f(value), reports)
            }
            AnalysisResult::Failed(reports) => AnalysisResult::Failed(reports),
        }
    }

    /// Monadic bind. Diagnostics from both steps are concatenated in order;
    /// `f` runs only if the prior step was not already a failure.
    pub fn flat_map<U, F: FnOnce(T) -> AnalysisResult<U>>(self, f: F) -> AnalysisResult<U> {
        match self {
            AnalysisResult::Pure(value) => f(value),
            AnalysisResult::WithWarnings(value, reports) => {
                let mut reports = reports.into_vec();
                let (next_value, mut next_reports) = f(value).into_parts();
                reports.append(&mut next_reports);
                match next_value {
                    Some(next_value) => ok(next_value, reports),
                    None => match Vec1::try_from_vec(reports) {
                        Ok(reports) => AnalysisResult::Failed(reports),
                        // The prior step's warnings alone are non-empty.
                        Err(_) => unreachable!("a failed step carries at least one report"),
                    },
                }
            }
            AnalysisResult::Failed(reports) => AnalysisResult::Failed(reports),
        }
    }
}

impl<T> From<Result<T, rill_error::error::AnalysisError>> for AnalysisResult<T> {
    fn from(res: Result<T, rill_error::error::AnalysisError>) -> Self {
        match res {
            Ok(value) => AnalysisResult::Pure(value),
            Err(e) => AnalysisResult::Failed(Vec1::new(Report::from(e))),
        }
    }
}
