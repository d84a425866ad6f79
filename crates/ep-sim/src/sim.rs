//! The `Simulation` struct and its tick loop.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use ep_community::{Community, CommunityStats, ContainmentStage, DailyRoutine, Person, Populator};
use ep_core::{CommunityId, SimClock, SimConfig, SimRng, Tick};
use ep_disease::{Disease, Infection};
use rayon::ThreadPool;
use rayon::prelude::*;

use crate::{RunControl, RunSummary, SimError, SimObserver, SimResult, contacts};

/// How often a paused loop re-checks its control flags.
const PAUSE_POLL: Duration = Duration::from_millis(10);

/// Stream offset for initial-infection draws, apart from population streams.
const SEEDING_STREAM: u64 = 0x5eed;

// ── Simulation ────────────────────────────────────────────────────────────────

/// The simulation orchestrator.
///
/// Owns 1..N communities, the disease, the outside carrier that infects
/// travelers, and a Rayon pool sized by `config.num_threads`.  Each tick:
///
/// 1. advance the clock;
/// 2. update every person of every community in parallel;
/// 3. resolve contacts per place (see [`contacts`]).
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Simulation {
    /// Global configuration (seed, population size, reporting interval, …).
    pub config: SimConfig,

    /// Hourly clock; tick 0 is midnight of day 0.
    pub clock: SimClock,

    pub(crate) disease:         Arc<Disease>,
    pub(crate) routine:         DailyRoutine,
    pub(crate) populator:       Box<dyn Populator>,
    pub(crate) communities:     Vec<Community>,
    pub(crate) travel_infecter: Infection,
    pub(crate) stage:           ContainmentStage,
    pub(crate) control:         RunControl,
    pub(crate) pool:            ThreadPool,
}

impl Simulation {
    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn communities(&self) -> &[Community] {
        &self.communities
    }

    pub fn community(&self, id: CommunityId) -> Option<&Community> {
        self.communities.iter().find(|c| c.id() == id)
    }

    pub fn disease(&self) -> &Arc<Disease> {
        &self.disease
    }

    /// The fixed outside carrier travelers are exposed to.  Its spread count
    /// tallies infections caught while away.
    pub fn travel_infecter(&self) -> &Infection {
        &self.travel_infecter
    }

    pub fn stage(&self) -> ContainmentStage {
        self.stage
    }

    pub fn stats(&self) -> Vec<CommunityStats> {
        self.communities.iter().map(Community::stats).collect()
    }

    /// Totals of the current run, labelled as run `run`.
    pub fn summary(&self, run: usize) -> RunSummary {
        RunSummary::from_stats(run, self.stage, self.clock.day(), &self.stats())
    }

    // ── Run control ───────────────────────────────────────────────────────

    /// A handle sharing this simulation's stop / pause flags.
    pub fn control(&self) -> RunControl {
        self.control.clone()
    }

    pub fn stop(&self) {
        self.control.stop();
    }

    pub fn pause(&self) {
        self.control.pause();
    }

    pub fn resume(&self) {
        self.control.resume();
    }

    /// Put `stage`'s measures into force in every community from the next
    /// tick on.
    pub fn set_containment(&mut self, stage: ContainmentStage) {
        self.stage = stage;
        for community in &self.communities {
            community.apply_stage(stage);
        }
    }

    // ── Running ───────────────────────────────────────────────────────────

    /// Run until stopped through [`RunControl::stop`].
    ///
    /// Blocks while paused.  A stop requested before the call is discarded.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        self.control.rearm();
        log::info!("run started at {}", self.clock);
        while self.wait_while_paused() {
            self.step(observer)?;
        }
        log::info!("run stopped at {}", self.clock);
        observer.on_sim_end(self.clock.current_tick);
        Ok(())
    }

    /// Run `days` whole days from the current tick, or until stopped.
    pub fn run_for_days<O: SimObserver>(&mut self, days: u64, observer: &mut O) -> SimResult<()> {
        self.control.rearm();
        let end = self.clock.current_tick.offset(SimClock::ticks_for_days(days));
        log::info!("running {days} days from {}", self.clock);
        while self.clock.current_tick < end && self.wait_while_paused() {
            self.step(observer)?;
        }
        observer.on_sim_end(self.clock.current_tick);
        Ok(())
    }

    /// Run `runs` experiments of `days` days each, rebuilding the communities
    /// from the populator before every run and cycling through the
    /// containment ladder (`none`, masks, +work from home, +shop closure,
    /// +lockdown, then `none` again).
    ///
    /// Every run starts from the configured seed, so runs differ only in the
    /// measures applied.  A stop ends the comparison after the current run.
    pub fn compare_containment_measures<O: SimObserver>(
        &mut self,
        days:     u64,
        runs:     usize,
        observer: &mut O,
    ) -> SimResult<Vec<RunSummary>> {
        let mut summaries = Vec::with_capacity(runs);
        for run in 0..runs {
            let stage = ContainmentStage::for_run(run);
            self.reset(stage)?;
            observer.on_stage_change(run, stage);
            self.run_for_days(days, observer)?;

            let summary = self.summary(run);
            log::info!(
                "run {run} ({stage}): infected {} dead {} positive tests {} quarantined {}",
                summary.infection_max,
                summary.dead,
                summary.positive_tests,
                summary.quarantined
            );
            observer.on_run_end(&summary);
            summaries.push(summary);

            if self.control.is_stopped() {
                log::info!("comparison stopped after run {run}");
                break;
            }
        }
        Ok(summaries)
    }

    /// Rebuild every community, rewind the clock and reseed infections, with
    /// `stage` in force.
    pub fn reset(&mut self, stage: ContainmentStage) -> SimResult<()> {
        self.communities = generate_communities(&self.config, self.populator.as_ref(), &self.routine)?;
        self.clock = SimClock::new(self.config.start_weekday);
        self.travel_infecter = Infection::carrier(Arc::clone(&self.disease));
        self.set_containment(stage);
        seed_infections(&self.communities, &self.disease, self.config.initial_infections, self.config.seed);
        Ok(())
    }

    /// Advance one tick.  Returns the number of new infections.
    pub fn step<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<usize> {
        observer.on_tick_start(self.clock.current_tick);

        let is_new_day = self.clock.advance();
        let ctx = self.clock.hour_context(is_new_day);

        // ── Persons (parallel) ────────────────────────────────────────────
        for community in &self.communities {
            let view = community.view();
            let mut population = community.write_population();
            let people: &mut [Person] = &mut population;
            self.pool
                .install(|| people.par_iter_mut().try_for_each(|p| p.update(&view, ctx)))?;
        }

        // ── Contacts ──────────────────────────────────────────────────────
        let mut infected = 0;
        for community in &self.communities {
            infected += contacts::resolve(
                &self.pool,
                community,
                &mut self.travel_infecter,
                self.config.seed,
                ctx.tick,
            );
        }

        if is_new_day && self.config.is_report_day(ctx.day) {
            for community in &self.communities {
                let stats = community.stats();
                log::info!(
                    "{} day {}: S {} E {} I {} R {} dead {} quarantined {}",
                    community.id(),
                    ctx.day,
                    stats.susceptible,
                    stats.exposed,
                    stats.infectious,
                    stats.recovered,
                    stats.dead,
                    stats.quarantined_now
                );
                observer.on_new_day(ctx.day, community.id(), &stats);
            }
        }

        observer.on_tick_end(ctx.tick, infected);
        Ok(infected)
    }

    /// Block while paused.  Returns `false` once a stop was requested.
    fn wait_while_paused(&self) -> bool {
        loop {
            if self.control.is_stopped() {
                return false;
            }
            if !self.control.is_paused() {
                return true;
            }
            thread::sleep(PAUSE_POLL);
        }
    }
}

// ── Setup helpers ─────────────────────────────────────────────────────────────

/// Build `config.community_count` communities.  Community `i` draws from
/// child stream `i` of the configured seed.
pub(crate) fn generate_communities(
    config:    &SimConfig,
    populator: &dyn Populator,
    routine:   &DailyRoutine,
) -> SimResult<Vec<Community>> {
    let mut root = SimRng::new(config.seed);
    (0..config.community_count)
        .map(|i| {
            let id = u16::try_from(i)
                .map(CommunityId)
                .map_err(|_| SimError::Config(format!("community index {i} out of range")))?;
            let mut rng = root.child(i as u64);
            let person_seed: u64 = rng.random();
            Ok(populator.populate(id, config.population_size, person_seed, routine.clone(), &mut rng)?)
        })
        .collect()
}

/// Contaminate `count` distinct random persons in every community.  Returns
/// the number actually infected.
pub(crate) fn seed_infections(
    communities: &[Community],
    disease:     &Arc<Disease>,
    count:       usize,
    seed:        u64,
) -> usize {
    let mut root = SimRng::new(seed);
    let mut seeded = 0;
    for community in communities {
        let mut rng = root.child(SEEDING_STREAM ^ community.id().0 as u64);
        let mut population = community.write_population();
        if count > population.len() {
            log::warn!(
                "{}: {count} initial infections requested for {} persons",
                community.id(),
                population.len()
            );
        }
        let mut order: Vec<usize> = (0..population.len()).collect();
        rng.shuffle(&mut order);
        for &i in order.iter().take(count) {
            if population[i].contaminate(disease) {
                seeded += 1;
            }
        }
    }
    log::info!("seeded {seeded} initial infections at {}", Tick::ZERO);
    seeded
}
