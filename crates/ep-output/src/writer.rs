//! The `OutputWriter` trait implemented by all backend writers.

use crate::{DailyCountRow, OutputResult, RunSummaryRow};

/// A sink for simulation reports.
///
/// Errors surface to the observer, which keeps the first one for
/// [`SimOutputObserver::take_error`][crate::SimOutputObserver::take_error].
pub trait OutputWriter {
    /// Write one community's counts for one reporting day.
    fn write_daily_counts(&mut self, row: &DailyCountRow) -> OutputResult<()>;

    /// Write the outcome of one run.
    fn write_run_summary(&mut self, row: &RunSummaryRow) -> OutputResult<()>;

    /// Push buffered rows to the underlying files.  May be called repeatedly.
    fn flush(&mut self) -> OutputResult<()>;
}
