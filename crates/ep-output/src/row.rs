//! Plain data row types written by output backends.

use ep_community::CommunityStats;
use ep_core::CommunityId;
use ep_sim::RunSummary;

/// One community's counts on one reporting day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyCountRow {
    /// Index of the run within a containment comparison.
    pub run:               usize,
    pub day:               u64,
    pub community:         u16,
    pub susceptible:       usize,
    pub exposed:           usize,
    pub infectious:        usize,
    pub recovered:         usize,
    pub dead:              usize,
    pub quarantined_now:   usize,
    pub infection_max:     usize,
    pub positive_tests:    u64,
    pub quarantined_total: u64,
}

impl DailyCountRow {
    pub fn new(run: usize, day: u64, community: CommunityId, stats: &CommunityStats) -> Self {
        Self {
            run,
            day,
            community:         community.0,
            susceptible:       stats.susceptible,
            exposed:           stats.exposed,
            infectious:        stats.infectious,
            recovered:         stats.recovered,
            dead:              stats.dead,
            quarantined_now:   stats.quarantined_now,
            infection_max:     stats.infection_max,
            positive_tests:    stats.positive_tests,
            quarantined_total: stats.quarantined_total,
        }
    }
}

/// Totals of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummaryRow {
    pub run:            usize,
    pub stage:          &'static str,
    pub days:           u64,
    pub population:     usize,
    pub infection_max:  usize,
    pub dead:           usize,
    pub positive_tests: u64,
    pub quarantined:    u64,
}

impl From<&RunSummary> for RunSummaryRow {
    fn from(s: &RunSummary) -> Self {
        Self {
            run:            s.run,
            stage:          s.stage.as_str(),
            days:           s.days,
            population:     s.population,
            infection_max:  s.infection_max,
            dead:           s.dead,
            positive_tests: s.positive_tests,
            quarantined:    s.quarantined,
        }
    }
}
