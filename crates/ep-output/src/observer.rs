//! `SimOutputObserver<W>`: bridges `SimObserver` to an `OutputWriter`.

use ep_community::{CommunityStats, ContainmentStage};
use ep_core::{CommunityId, Tick};
use ep_sim::{RunSummary, SimObserver};

use crate::row::{DailyCountRow, RunSummaryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes daily counts and run summaries to any
/// [`OutputWriter`] backend.
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After the run returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    run:        usize,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, run: 0, last_error: None }
    }

    /// Take the stored write error (if any) after the run returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                log::warn!("output writer failed: {e}");
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_new_day(&mut self, day: u64, community: CommunityId, stats: &CommunityStats) {
        let row = DailyCountRow::new(self.run, day, community, stats);
        let result = self.writer.write_daily_counts(&row);
        self.store_err(result);
    }

    fn on_stage_change(&mut self, run: usize, _stage: ContainmentStage) {
        self.run = run;
    }

    fn on_run_end(&mut self, summary: &RunSummary) {
        let result = self
            .writer
            .write_run_summary(&RunSummaryRow::from(summary))
            .and_then(|()| self.writer.flush());
        self.store_err(result);
    }

    fn on_sim_end(&mut self, _final_tick: Tick) {
        let result = self.writer.flush();
        self.store_err(result);
    }
}
