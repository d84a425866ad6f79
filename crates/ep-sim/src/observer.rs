//! Simulation observer trait for progress reporting and data collection.

use ep_community::{CommunityStats, ContainmentStage};
use ep_core::{CommunityId, Tick};

use crate::RunSummary;

/// Callbacks invoked by [`Simulation`][crate::Simulation] at key points in
/// the tick loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: epidemic curve printer
///
/// ```rust,ignore
/// struct Curve;
///
/// impl SimObserver for Curve {
///     fn on_new_day(&mut self, day: u64, community: CommunityId, stats: &CommunityStats) {
///         println!("{community} day {day}: {} infectious", stats.infectious);
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the start of each tick, before the clock advances.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called at the end of each tick with the number of new infections.
    fn on_tick_end(&mut self, _tick: Tick, _new_infections: usize) {}

    /// Called once per community on every reporting day
    /// (`config.output_interval_days`), after that day's first tick.
    fn on_new_day(&mut self, _day: u64, _community: CommunityId, _stats: &CommunityStats) {}

    /// Called when a containment comparison starts run `run` under `stage`.
    fn on_stage_change(&mut self, _run: usize, _stage: ContainmentStage) {}

    /// Called after each run of a containment comparison.
    fn on_run_end(&mut self, _summary: &RunSummary) {}

    /// Called once when a `run*` call returns.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
