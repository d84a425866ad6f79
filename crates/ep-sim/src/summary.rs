use ep_community::{CommunityStats, ContainmentStage};

/// Outcome of one run, summed over all communities.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RunSummary {
    /// Index of the run within a containment comparison; 0 for a single run.
    pub run:            usize,
    pub stage:          ContainmentStage,
    /// Whole days simulated.
    pub days:           u64,
    pub population:     usize,
    /// Persons ever infected: dead, recovered, or currently infectious.
    pub infection_max:  usize,
    pub dead:           usize,
    pub positive_tests: u64,
    pub quarantined:    u64,
}

impl RunSummary {
    pub(crate) fn from_stats<'a>(
        run:   usize,
        stage: ContainmentStage,
        days:  u64,
        stats: impl IntoIterator<Item = &'a CommunityStats>,
    ) -> Self {
        stats.into_iter().fold(
            RunSummary {
                run,
                stage,
                days,
                population:     0,
                infection_max:  0,
                dead:           0,
                positive_tests: 0,
                quarantined:    0,
            },
            |mut acc, s| {
                acc.population     += s.population;
                acc.infection_max  += s.infection_max;
                acc.dead           += s.dead;
                acc.positive_tests += s.positive_tests;
                acc.quarantined    += s.quarantined_total;
                acc
            },
        )
    }
}
