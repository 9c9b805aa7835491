//! Batch outcome accounting

use std::fmt;

use crate::observability::ObservationScope;

use super::errors::OpsResult;

/// What one CRUD batch did
///
/// `requested` counts loop iterations, so
/// `applied + skipped + failed == requested` once the batch has run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Iterations the user asked for
    pub requested: usize,
    /// Iterations whose engine operations all succeeded
    pub applied: usize,
    /// Iterations skipped for an out-of-range attribute index
    pub skipped: usize,
    /// Iterations where an engine operation failed
    pub failed: usize,
    /// Rows appended, removed or updated
    pub rows_affected: usize,
}

impl BatchReport {
    pub fn new(requested: usize) -> Self {
        Self {
            requested,
            ..Self::default()
        }
    }

    pub fn is_balanced(&self) -> bool {
        self.applied + self.skipped + self.failed == self.requested
    }

    /// Close `scope` with this report's counters
    pub(crate) fn complete_scope(&self, scope: ObservationScope<'_>) {
        let requested = self.requested.to_string();
        let applied = self.applied.to_string();
        let skipped = self.skipped.to_string();
        let failed = self.failed.to_string();
        let rows = self.rows_affected.to_string();
        scope.complete_with_fields(&[
            ("requested", requested.as_str()),
            ("applied", applied.as_str()),
            ("skipped", skipped.as_str()),
            ("failed", failed.as_str()),
            ("rows_affected", rows.as_str()),
        ]);
    }
}

/// Close `scope` according to how the batch ended, passing the result through
pub(crate) fn finish_batch(
    scope: ObservationScope<'_>,
    result: OpsResult<BatchReport>,
) -> OpsResult<BatchReport> {
    match &result {
        Ok(report) => report.complete_scope(scope),
        Err(err) => scope.fail(&err.to_string()),
    }
    result
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} iterations applied, {} skipped, {} failed, {} rows affected",
            self.applied, self.requested, self.skipped, self.failed, self.rows_affected
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balance() {
        let mut report = BatchReport::new(3);
        assert!(!report.is_balanced());
        report.applied = 1;
        report.skipped = 1;
        report.failed = 1;
        assert!(report.is_balanced());
    }

    #[test]
    fn test_display() {
        let report = BatchReport {
            requested: 2,
            applied: 2,
            skipped: 0,
            failed: 0,
            rows_affected: 2,
        };
        assert_eq!(
            report.to_string(),
            "2 of 2 iterations applied, 0 skipped, 0 failed, 2 rows affected"
        );
    }
}
