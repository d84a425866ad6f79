//! Top-level run configuration.

use crate::{EpiError, EpiResult, Weekday};

/// Run configuration consumed by `ep-sim`.
///
/// Typically built in code or loaded from JSON by the application crate
/// (enable the `serde` feature) and passed to the simulation builder.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Worker thread count passed to Rayon.  `None` uses all logical cores.
    pub num_threads: Option<usize>,

    /// Weekday of simulated day 0.
    pub start_weekday: Weekday,

    /// Number of communities to generate.
    pub community_count: usize,

    /// Persons per generated community.
    pub population_size: usize,

    /// Persons contaminated at tick 0 in every community.
    pub initial_infections: usize,

    /// Report community statistics every N days.  0 disables daily reports.
    pub output_interval_days: u64,
}

impl SimConfig {
    /// Reject settings the simulation cannot start from.
    pub fn validate(&self) -> EpiResult<()> {
        if self.community_count == 0 {
            return Err(EpiError::Config("community_count must be at least 1".into()));
        }
        if self.community_count > u16::MAX as usize {
            return Err(EpiError::Config(format!(
                "community_count {} exceeds {}",
                self.community_count,
                u16::MAX
            )));
        }
        if self.population_size == 0 {
            return Err(EpiError::Config("population_size must be at least 1".into()));
        }
        if self.num_threads == Some(0) {
            return Err(EpiError::Config("num_threads must be at least 1 when set".into()));
        }
        Ok(())
    }

    /// `true` if `day` is a reporting day.
    #[inline]
    pub fn is_report_day(&self, day: u64) -> bool {
        self.output_interval_days > 0 && day % self.output_interval_days == 0
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed:                 42,
            num_threads:          None,
            start_weekday:        Weekday::Monday,
            community_count:      1,
            population_size:      1_000,
            initial_infections:   5,
            output_interval_days: 1,
        }
    }
}
